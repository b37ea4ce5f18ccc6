//! Schnorr signatures over a fixed 1024-bit prime-order-160-bit-subgroup
//! group, using OpenSSL's J-PAKE parameters.
//!
//! `SchnorrSigner` holds the private scalar and never leaves the trust
//! boundary it's constructed in; `SchnorrVerifier` only ever sees the
//! public key.

use crate::codec::{bin2int, int2bin};
use crate::error::CryptoError;
use crate::hash::HashWrapper;
use num_bigint::BigUint;
use num_traits::Zero;
use once_cell::sync::Lazy;
use rand::{rngs::OsRng, RngCore};

/// A Schnorr signature: `(e, s)` as produced by [`SchnorrSigner::sign`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
	pub e: [u8; 32],
	pub s: Vec<u8>,
}

struct GroupParams {
	p: BigUint,
	q: BigUint,
	g: BigUint,
}

fn parse_hex(hex: &str) -> BigUint {
	BigUint::parse_bytes(hex.as_bytes(), 16).expect("group constant is valid hex")
}

static GROUP: Lazy<GroupParams> = Lazy::new(|| GroupParams {
	p: parse_hex(
		"fd7f53811d75122952df4a9c2eece4e7f611b7523cef4400c31e3f80b6512669455d402251fb593d8d58fabfc5f5ba30f6cb9b556cd7813b801d346ff26660b76b9950a5a49f9fe8047b1022c24fbba9d7feb7c61bf83b57e7c6a8a6150f04fb83f6d3c51ec3023554135a169132f675f3ae2b61d72aeff22203199dd14801c7",
	),
	q: parse_hex("9760508f15230bccb292b982a2eb840bf0581cf5"),
	g: parse_hex(
		"f7e1a085d69b3ddecbbcab5c36b857b97994afbbfa3aea82f9574c0b3d0782675159578ebad4594fe67107108180b449167123e84c281613b7cf09328cc8a6e13c167a8b547c8d28e0a3ae1e2bb3a675916ea37f0bfa213562f1fb627a01243bcca4f1bea8519089a883dfe15ae59f06928b665e807b552564014c3bfecf492a",
	),
});

fn challenge(message: &[u8], r: &BigUint) -> [u8; 32] {
	let mut h = HashWrapper::new();
	h.add(message).add(&int2bin(r));
	h.digest()
}

/// Holds the private scalar `x`; derives the public key `y = g^x mod p`.
pub struct SchnorrSigner {
	x: BigUint,
}

impl SchnorrSigner {
	/// `x` is reduced mod `q`; in practice it is the 128-bit `k_user` subkey,
	/// already well below `q`.
	pub fn new(x_bytes: &[u8]) -> Self {
		SchnorrSigner {
			x: bin2int(x_bytes) % &GROUP.q,
		}
	}

	pub fn public_key(&self) -> BigUint {
		GROUP.g.modpow(&self.x, &GROUP.p)
	}

	/// Signs `message`, drawing a fresh nonce from the OS CSPRNG for every call.
	pub fn sign(&self, message: &[u8]) -> Signature {
		let k = random_scalar_below_q();
		let r = GROUP.g.modpow(&k, &GROUP.p);
		let e = challenge(message, &r);
		let e_int = bin2int(&e);

		// s = (k - x*e) mod q, computed over non-negative residues since BigUint has no sign.
		let xe = (&self.x * &e_int) % &GROUP.q;
		let s = if k >= xe { (&k - &xe) % &GROUP.q } else { (&k + &GROUP.q - &xe) % &GROUP.q };

		Signature { e, s: int2bin(&s) }
	}
}

/// Holds only a public key; verifies signatures against it.
pub struct SchnorrVerifier {
	public_key: BigUint,
}

impl SchnorrVerifier {
	pub fn new(public_key: BigUint) -> Self {
		SchnorrVerifier { public_key }
	}

	pub fn from_bytes(public_key_bytes: &[u8]) -> Self {
		Self::new(bin2int(public_key_bytes))
	}

	pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
		let s = bin2int(&signature.s);
		let r = (GROUP.g.modpow(&s, &GROUP.p) * self.public_key.modpow(&bin2int(&signature.e), &GROUP.p)) % &GROUP.p;
		let recomputed_e = challenge(message, &r);

		if recomputed_e == signature.e {
			Ok(())
		} else {
			Err(CryptoError::VerifyError)
		}
	}
}

/// Draws a uniform scalar in `[0, q)` via rejection sampling on 160 random bits.
fn random_scalar_below_q() -> BigUint {
	let mut buf = [0u8; 20];
	loop {
		OsRng.fill_bytes(&mut buf);
		let k = bin2int(&buf);
		if k < GROUP.q && !k.is_zero() {
			return k;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sign_then_verify_round_trips() {
		let signer = SchnorrSigner::new(&[0x42u8; 16]);
		let verifier = SchnorrVerifier::new(signer.public_key());
		let signature = signer.sign(b"hello nigori");

		assert!(verifier.verify(b"hello nigori", &signature).is_ok());
	}

	#[test]
	fn tampered_message_fails() {
		let signer = SchnorrSigner::new(&[0x42u8; 16]);
		let verifier = SchnorrVerifier::new(signer.public_key());
		let signature = signer.sign(b"hello nigori");

		assert!(verifier.verify(b"goodbye nigori", &signature).is_err());
	}

	#[test]
	fn tampered_s_fails() {
		let signer = SchnorrSigner::new(&[0x42u8; 16]);
		let verifier = SchnorrVerifier::new(signer.public_key());
		let mut signature = signer.sign(b"hello nigori");
		let last = signature.s.last_mut().unwrap();
		*last ^= 1;

		assert!(verifier.verify(b"hello nigori", &signature).is_err());
	}

	#[test]
	fn tampered_e_fails() {
		let signer = SchnorrSigner::new(&[0x42u8; 16]);
		let verifier = SchnorrVerifier::new(signer.public_key());
		let mut signature = signer.sign(b"hello nigori");
		signature.e[0] ^= 1;

		assert!(verifier.verify(b"hello nigori", &signature).is_err());
	}

	#[test]
	fn wrong_key_fails() {
		let signer = SchnorrSigner::new(&[0x42u8; 16]);
		let other_signer = SchnorrSigner::new(&[0x99u8; 16]);
		let verifier = SchnorrVerifier::new(other_signer.public_key());
		let signature = signer.sign(b"hello nigori");

		assert!(verifier.verify(b"hello nigori", &signature).is_err());
	}

	#[test]
	fn successive_signatures_use_fresh_nonces() {
		let signer = SchnorrSigner::new(&[0x11u8; 16]);
		let a = signer.sign(b"same message");
		let b = signer.sign(b"same message");

		assert_ne!(a.s, b.s);
	}
}
