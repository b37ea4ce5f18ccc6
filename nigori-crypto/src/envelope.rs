//! Authenticated envelope: AES-128-CBC encrypt-then-MAC, with both a
//! randomized mode (fresh IV per call, used for record values) and a
//! deterministic "permute" mode (all-zero IV, used only for record names).
//!
//! The MAC is HMAC-SHA-256 with a full 32-byte tag (see DESIGN.md, Open
//! Question 1); legacy DES-mode envelopes are not implemented at all —
//! [`decrypt_legacy`] documents that refusal rather than silently
//! accepting them.

use crate::error::CryptoError;
use crate::secret::Key16;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;

const IV_LEN: usize = 16;
const TAG_LEN: usize = 32;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// `IV || ciphertext || tag`, as stored on the wire (base64url-encoded by the caller).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
	pub iv: [u8; IV_LEN],
	pub ciphertext: Vec<u8>,
	pub tag: [u8; TAG_LEN],
}

impl Envelope {
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len() + TAG_LEN);
		out.extend_from_slice(&self.iv);
		out.extend_from_slice(&self.ciphertext);
		out.extend_from_slice(&self.tag);
		out
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
		if bytes.len() < IV_LEN + TAG_LEN {
			return Err(CryptoError::DecryptFailure);
		}

		let (iv, rest) = bytes.split_at(IV_LEN);
		let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

		Ok(Envelope {
			iv: iv.try_into().expect("split at IV_LEN"),
			ciphertext: ciphertext.to_vec(),
			tag: tag.try_into().expect("split at TAG_LEN from the end"),
		})
	}
}

fn mac_ciphertext(mac_key: &Key16, ciphertext: &[u8]) -> [u8; TAG_LEN] {
	let mut mac = HmacSha256::new_from_slice(mac_key.as_ref()).expect("HMAC accepts any key length");
	mac.update(ciphertext);
	mac.finalize().into_bytes().into()
}

fn encrypt_with_iv(enc_key: &Key16, mac_key: &Key16, plaintext: &[u8], iv: [u8; IV_LEN]) -> Envelope {
	let ciphertext = Aes128CbcEnc::new(enc_key.as_bytes().into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
	let tag = mac_ciphertext(mac_key, &ciphertext);

	Envelope { iv, ciphertext, tag }
}

/// Encrypts with a freshly drawn random IV. Two calls with equal plaintext
/// differ with overwhelming probability.
pub fn encrypt_randomized(enc_key: &Key16, mac_key: &Key16, plaintext: &[u8]) -> Envelope {
	let mut iv = [0u8; IV_LEN];
	OsRng.fill_bytes(&mut iv);
	encrypt_with_iv(enc_key, mac_key, plaintext, iv)
}

/// Encrypts with an all-zero IV, so the same plaintext always yields the
/// same envelope. Used only for deterministic name permutation.
pub fn encrypt_deterministic(enc_key: &Key16, mac_key: &Key16, plaintext: &[u8]) -> Envelope {
	encrypt_with_iv(enc_key, mac_key, plaintext, [0u8; IV_LEN])
}

/// Verifies the MAC and decrypts. The MAC is checked, in constant time,
/// before the ciphertext is touched; any failure (short input, MAC
/// mismatch, bad padding) returns the same opaque [`CryptoError::DecryptFailure`].
pub fn decrypt(enc_key: &Key16, mac_key: &Key16, envelope: &Envelope) -> Result<Vec<u8>, CryptoError> {
	let expected_tag = mac_ciphertext(mac_key, &envelope.ciphertext);
	if !bool::from(expected_tag.ct_eq(&envelope.tag)) {
		return Err(CryptoError::DecryptFailure);
	}

	Aes128CbcDec::new(enc_key.as_bytes().into(), &envelope.iv.into())
		.decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
		.map_err(|_| CryptoError::DecryptFailure)
}

/// The legacy DES/HMAC-MD5 envelope format is not implemented. This always
/// fails so callers get an explicit, documented refusal rather than silent
/// misinterpretation of old data.
pub fn decrypt_legacy(_bytes: &[u8]) -> Result<Vec<u8>, CryptoError> {
	Err(CryptoError::UnsupportedEnvelopeVersion)
}
