//! Derives the four subkeys a Nigori client needs from a username, server
//! name, and password, then exposes the encryption/permutation/signing
//! operations built on top of them.
//!
//! A per-user salt `s_user` is derived first, then three 128-bit subkeys
//! are derived from the password under that salt at fixed, distinct
//! iteration counts so that `k_user`, `k_enc`, and `k_mac` are independent
//! even though they share a KDF input.

use crate::codec::concat;
use crate::envelope::{self, Envelope};
use crate::error::CryptoError;
use crate::pbkdf2::pbkdf2;
use crate::schnorr::{Signature, SchnorrSigner};
use crate::secret::Key16;

const SALT_ITERATIONS: u32 = 1000;
const USER_KEY_ITERATIONS: u32 = 1001;
const ENC_KEY_ITERATIONS: u32 = 1002;
const MAC_KEY_ITERATIONS: u32 = 1003;
const SALT_LEN: usize = 8;

const USER_SALT_LABEL: &[u8] = b"user salt";

/// Holds `k_user`, `k_enc`, and `k_mac`; `s_user` is kept only long enough
/// to derive them and is not retained.
pub struct KeyDeriver {
	k_user: Key16,
	k_enc: Key16,
	k_mac: Key16,
}

impl KeyDeriver {
	/// Derives all three subkeys from `(username, server_name, password)`.
	pub fn new(username: &[u8], server_name: &[u8], password: &[u8]) -> Result<Self, CryptoError> {
		let user_id = concat(&[username, server_name]);
		let s_user = pbkdf2(&user_id, USER_SALT_LABEL, SALT_ITERATIONS, SALT_LEN)?;

		let k_user = pbkdf2(password, &s_user, USER_KEY_ITERATIONS, 16)?;
		let k_enc = pbkdf2(password, &s_user, ENC_KEY_ITERATIONS, 16)?;
		let k_mac = pbkdf2(password, &s_user, MAC_KEY_ITERATIONS, 16)?;

		Ok(KeyDeriver {
			k_user: Key16::from_slice(&k_user).expect("pbkdf2 dk_len matches Key16"),
			k_enc: Key16::from_slice(&k_enc).expect("pbkdf2 dk_len matches Key16"),
			k_mac: Key16::from_slice(&k_mac).expect("pbkdf2 dk_len matches Key16"),
		})
	}

	/// Encrypts `plaintext` with a fresh random IV, for record values.
	pub fn encrypt(&self, plaintext: &[u8]) -> Envelope {
		envelope::encrypt_randomized(&self.k_enc, &self.k_mac, plaintext)
	}

	/// Encrypts `plaintext` deterministically (zero IV), for record names
	/// that must be recoverable by value rather than by listing.
	pub fn permute(&self, plaintext: &[u8]) -> Envelope {
		envelope::encrypt_deterministic(&self.k_enc, &self.k_mac, plaintext)
	}

	pub fn decrypt(&self, envelope: &Envelope) -> Result<Vec<u8>, CryptoError> {
		envelope::decrypt(&self.k_enc, &self.k_mac, envelope)
	}

	/// Builds the Schnorr signer keyed on `k_user`, used to sign auth tokens.
	pub fn signer(&self) -> SchnorrSigner {
		SchnorrSigner::new(self.k_user.as_bytes())
	}

	pub fn sign(&self, message: &[u8]) -> Signature {
		self.signer().sign(message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_inputs_derive_identical_keys() {
		let a = KeyDeriver::new(b"alice", b"nigori.example", b"hunter2").unwrap();
		let b = KeyDeriver::new(b"alice", b"nigori.example", b"hunter2").unwrap();

		assert_eq!(a.k_user.as_bytes(), b.k_user.as_bytes());
		assert_eq!(a.k_enc.as_bytes(), b.k_enc.as_bytes());
		assert_eq!(a.k_mac.as_bytes(), b.k_mac.as_bytes());
	}

	#[test]
	fn different_usernames_derive_different_keys() {
		let a = KeyDeriver::new(b"alice", b"nigori.example", b"hunter2").unwrap();
		let b = KeyDeriver::new(b"bob", b"nigori.example", b"hunter2").unwrap();

		assert_ne!(a.k_user.as_bytes(), b.k_user.as_bytes());
	}

	#[test]
	fn subkeys_are_pairwise_distinct() {
		let deriver = KeyDeriver::new(b"alice", b"nigori.example", b"hunter2").unwrap();
		assert_ne!(deriver.k_user.as_bytes(), deriver.k_enc.as_bytes());
		assert_ne!(deriver.k_enc.as_bytes(), deriver.k_mac.as_bytes());
		assert_ne!(deriver.k_user.as_bytes(), deriver.k_mac.as_bytes());
	}

	#[test]
	fn encrypt_then_decrypt_roundtrips() {
		let deriver = KeyDeriver::new(b"alice", b"nigori.example", b"hunter2").unwrap();
		let envelope = deriver.encrypt(b"a secret record value");
		assert_eq!(deriver.decrypt(&envelope).unwrap(), b"a secret record value");
	}

	#[test]
	fn permute_is_deterministic() {
		let deriver = KeyDeriver::new(b"alice", b"nigori.example", b"hunter2").unwrap();
		let a = deriver.permute(b"record-name");
		let b = deriver.permute(b"record-name");
		assert_eq!(a, b);
	}

	#[test]
	fn signer_produces_verifiable_signatures() {
		use crate::schnorr::SchnorrVerifier;

		let deriver = KeyDeriver::new(b"alice", b"nigori.example", b"hunter2").unwrap();
		let signer = deriver.signer();
		let signature = deriver.sign(b"auth token");
		let verifier = SchnorrVerifier::new(signer.public_key());

		assert!(verifier.verify(b"auth token", &signature).is_ok());
	}
}
