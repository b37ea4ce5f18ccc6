//! Record names and the version history the store returns for them.

use serde::{Deserialize, Serialize};

/// Reserved type tag for the split-descriptor records created by
/// [`crate::split::create_split`].
pub const RECORD_TYPE_SPLIT_SERVERS: u32 = 1;
pub const RECORD_TYPE_GENERIC: u32 = 0;

/// `(type-tag, name)`, the plaintext record name before permutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordName {
	pub type_tag: u32,
	pub name: Vec<u8>,
}

impl RecordName {
	pub fn new(type_tag: u32, name: impl Into<Vec<u8>>) -> Self {
		RecordName { type_tag, name: name.into() }
	}

	/// Canonical plaintext bytes fed to [`nigori_crypto::key_deriver::KeyDeriver::permute`].
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(4 + self.name.len());
		out.extend_from_slice(&self.type_tag.to_be_bytes());
		out.extend_from_slice(&self.name);
		out
	}
}

/// One version of a record as surfaced by the store: a monotonic counter,
/// the server-recorded creation time, and the decrypted value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordVersion {
	pub version: u32,
	pub total_versions: u32,
	pub creation_time: u64,
	pub value: Vec<u8>,
}
