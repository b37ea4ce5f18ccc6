use thiserror::Error;

/// Errors surfaced by the cryptographic core.
///
/// Envelope decryption failures (bad length, MAC mismatch, bad padding) are
/// deliberately collapsed into a single `DecryptFailure` variant, so a
/// caller can never learn *why* decryption failed (see DESIGN.md).
#[derive(Debug, Error)]
pub enum CryptoError {
	/// A value handed to `int2bin`/`pad_int2bin` did not fit in the requested width.
	#[error("integer does not fit in the requested byte width")]
	EncodingTooWide,
	/// `unconcat` saw a length prefix that overruns the remaining bytes.
	#[error("length-prefixed frame is truncated")]
	TruncatedFrame,
	/// PBKDF2 was asked to derive more bytes than `(2^32 - 1) * hLen`.
	#[error("derived key length exceeds PBKDF2's bound")]
	DerivedKeyTooLong,
	/// Extended binary GCD found `gcd(z, m) != 1`; `z` has no inverse mod `m`.
	#[error("value is not invertible modulo the given modulus")]
	CannotInvert,
	/// An envelope was too short, failed its MAC, or unpadded incorrectly.
	#[error("decryption failed")]
	DecryptFailure,
	/// Decryption was asked for the legacy DES/HMAC-MD5 envelope format, which
	/// this crate does not implement.
	#[error("unsupported envelope version")]
	UnsupportedEnvelopeVersion,
	/// A Schnorr signature did not verify.
	#[error("signature does not verify")]
	VerifyError,
	/// Threshold parameters (k, n, or a share index) are invalid for the fixed field.
	#[error("invalid threshold parameters for the secret-sharing field")]
	BadShamirParameters,
}
