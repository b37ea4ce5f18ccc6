//! Length-prefixed SHA-256, giving unambiguous domain separation between
//! sequences of inputs: two different `add()` call sequences cannot collide
//! unless SHA-256 itself does.

use crate::codec::length_of;
use sha2::{Digest, Sha256};

#[derive(Default)]
pub struct HashWrapper {
	hasher: Sha256,
}

impl HashWrapper {
	pub fn new() -> Self {
		Self::default()
	}

	/// Feeds `x` into the hash, preceded by its 4-byte big-endian length.
	pub fn add(&mut self, x: &[u8]) -> &mut Self {
		self.hasher.update(length_of(x));
		self.hasher.update(x);
		self
	}

	pub fn digest(self) -> [u8; 32] {
		self.hasher.finalize().into()
	}
}
