//! RFC 2898 PBKDF2-HMAC-SHA1, parameterized by password, salt, iteration
//! count, and output length.
//!
//! Delegates the `F`/HMAC loop to the RustCrypto `pbkdf2` crate, adding
//! only the explicit `dkLen` bound RFC 2898 requires before calling into it.

use crate::error::CryptoError;
use sha1::Sha1;

const H_LEN: u64 = 20; // SHA-1 digest size

/// Derives `dk_len` bytes from `(password, salt)` using `iterations` rounds
/// of PBKDF2-HMAC-SHA1.
pub fn pbkdf2(password: &[u8], salt: &[u8], iterations: u32, dk_len: usize) -> Result<Vec<u8>, CryptoError> {
	if dk_len as u64 > (u32::MAX as u64) * H_LEN {
		return Err(CryptoError::DerivedKeyTooLong);
	}

	let mut out = vec![0u8; dk_len];
	pbkdf2::pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut out);
	Ok(out)
}
