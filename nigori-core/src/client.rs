//! Composes the cryptographic core and a [`RecordStore`] into the
//! register/authenticate/add-record/list-records/get-record operations a
//! Nigori session actually performs.

use crate::auth::build_auth_params;
use crate::config::NigoriClientConfig;
use crate::error::NigoriError;
use crate::identity::{Password, UserIdentity};
use crate::record::{RecordName, RecordVersion};
use crate::store::RecordStore;
use nigori_crypto::codec::int2bin;
use nigori_crypto::envelope::Envelope;
use nigori_crypto::key_deriver::KeyDeriver;

/// A Nigori session bound to one user identity and one record store.
///
/// Holds `KeyDeriver` rather than re-deriving it per call — PBKDF2 is
/// expensive enough that paying its cost once at construction and reusing
/// the derived key bundle for the session's lifetime matters.
pub struct NigoriClient<S: RecordStore> {
	identity: UserIdentity,
	deriver: KeyDeriver,
	config: NigoriClientConfig,
	store: S,
}

impl<S: RecordStore> NigoriClient<S> {
	pub fn new(identity: UserIdentity, password: &Password, config: NigoriClientConfig, store: S) -> Result<Self, NigoriError> {
		let deriver = KeyDeriver::new(&identity.username, &identity.server_name, password.as_bytes())?;
		Ok(NigoriClient { identity, deriver, config, store })
	}

	pub fn config(&self) -> &NigoriClientConfig {
		&self.config
	}

	pub fn identity(&self) -> &UserIdentity {
		&self.identity
	}

	fn username(&self) -> String {
		String::from_utf8_lossy(&self.identity.username).into_owned()
	}

	/// Registers this client's public key with the store.
	pub fn register(&self) -> Result<(), NigoriError> {
		let public_key = int2bin(&self.deriver.signer().public_key());
		self.store.register(&self.username(), &public_key)
	}

	/// Proves identity to the store with a freshly signed token.
	pub fn authenticate(&self) -> Result<(), NigoriError> {
		let auth = build_auth_params(&self.deriver, &self.username());
		self.store.authenticate(&auth.user, &auth.t, &auth.e, &auth.s)
	}

	/// Permutes `name` deterministically and encrypts `value` with a fresh
	/// IV, then signs and submits the write.
	pub fn add_record(&self, name: &RecordName, value: &[u8]) -> Result<(), NigoriError> {
		let permuted_name = self.deriver.permute(&name.to_bytes()).to_bytes();
		let envelope = self.deriver.encrypt(value).to_bytes();
		let auth = build_auth_params(&self.deriver, &self.username());

		self.store.add_resource(&auth, &permuted_name, &envelope)
	}

	/// Lists every version of `name`, decrypting each value.
	pub fn list_records(&self, name: &RecordName) -> Result<Vec<RecordVersion>, NigoriError> {
		let permuted_name = self.deriver.permute(&name.to_bytes()).to_bytes();
		let auth = build_auth_params(&self.deriver, &self.username());

		let versions = self.store.list_resource(&auth, &permuted_name)?;
		versions.into_iter().map(|version| self.decrypt_version(version)).collect()
	}

	/// Fetches a single version of `name` (or the latest, when `version` is
	/// `None`) and decrypts it. Per the wire protocol this endpoint carries
	/// no auth fields.
	pub fn get_record(&self, name: &RecordName, version: Option<u32>) -> Result<RecordVersion, NigoriError> {
		let permuted_name = self.deriver.permute(&name.to_bytes()).to_bytes();
		let version = self.store.get_resource(&permuted_name, version)?;
		self.decrypt_version(version)
	}

	fn decrypt_version(&self, mut version: RecordVersion) -> Result<RecordVersion, NigoriError> {
		let envelope = Envelope::from_bytes(&version.value)?;
		version.value = self.deriver.decrypt(&envelope)?;
		Ok(version)
	}
}
