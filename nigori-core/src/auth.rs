//! Builds the per-request auth token: `t = "<unix_seconds>:<20-bit rand>"`,
//! signed under `k_user` via Schnorr.

use nigori_crypto::key_deriver::KeyDeriver;
use rand::{rngs::OsRng, Rng};
use std::time::{SystemTime, UNIX_EPOCH};

/// `(user, t, e, s)`, still in raw bytes — base64url-encoding happens only
/// at the HTTP transport boundary.
#[derive(Clone, Debug)]
pub struct AuthParams {
	pub user: String,
	pub t: String,
	pub e: Vec<u8>,
	pub s: Vec<u8>,
}

/// Builds and signs a fresh token for `user` under the given key bundle.
pub fn build_auth_params(deriver: &KeyDeriver, user: &str) -> AuthParams {
	let t = token_string();
	let signature = deriver.sign(t.as_bytes());

	AuthParams {
		user: user.to_string(),
		t,
		e: signature.e.to_vec(),
		s: signature.s,
	}
}

fn token_string() -> String {
	let seconds = SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock is after the Unix epoch").as_secs();
	let nonce: u32 = OsRng.gen_range(0..(1u32 << 20));
	format!("{seconds}:{nonce}")
}
