use nigori_crypto::CryptoError;
use thiserror::Error;

/// Errors surfaced by the client protocol layer, wrapping the cryptographic
/// core's errors and adding the failure modes of talking to a record store.
#[derive(Debug, Error)]
pub enum NigoriError {
	#[error("cryptography error: {0}")]
	Crypto(CryptoError),
	/// The store answered with a non-200 status.
	#[error("protocol error: {status} {reason}")]
	Protocol { status: u16, reason: String },
	/// The store rejected an auth token as a replay.
	#[error("server rejected token as a replay")]
	Replay,
	/// A Schnorr signature did not verify.
	#[error("signature does not verify")]
	Verify,
	/// Transport-level failure talking to the store.
	#[error("transport error: {0}")]
	Transport(String),
	/// A response body could not be parsed as the expected JSON shape.
	#[error("malformed response: {0}")]
	MalformedResponse(String),
	/// Threshold split parameters were invalid (e.g. fewer servers than `k`).
	#[error("invalid threshold split parameters")]
	InvalidSplit,
}

impl From<CryptoError> for NigoriError {
	fn from(error: CryptoError) -> NigoriError {
		match error {
			CryptoError::VerifyError => NigoriError::Verify,
			other => NigoriError::Crypto(other),
		}
	}
}
