//! Shamir-split client operations: dispersing a secret across `n` servers
//! such that any `k` of them can reconstruct it.
//!
//! Each server in the split is treated as an entirely separate Nigori
//! account: same username and password, but a distinct server-name (its
//! host), so each gets its own key bundle and its own permuted record
//! names, exactly like any other Nigori server relationship. The split
//! descriptor itself — which servers, and the threshold `k` — is persisted
//! as an ordinary record (type [`crate::record::RECORD_TYPE_SPLIT_SERVERS`])
//! on the client's primary store.

use crate::client::NigoriClient;
use crate::error::NigoriError;
use crate::identity::Password;
use crate::record::RecordName;
use crate::store::{HttpRecordStore, RecordStore};
use nigori_crypto::codec::{bin2int, int2bin};
use nigori_crypto::key_deriver::KeyDeriver;
use nigori_crypto::shamir::{self, Share, PRIME_4096};
use serde::{Deserialize, Serialize};

/// Which servers hold shares of a split secret, and how many are needed to
/// recover it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDescriptor {
	pub k: u32,
	pub servers: Vec<(String, u16)>,
}

fn server_deriver(username: &[u8], host: &str, password: &Password) -> Result<KeyDeriver, NigoriError> {
	Ok(KeyDeriver::new(username, host.as_bytes(), password.as_bytes())?)
}

/// Splits `secret` across `servers` with threshold `k`, registering this
/// user with each server and writing one share to each, then persists the
/// resulting [`SplitDescriptor`] under `descriptor_name` on the primary store.
pub fn create_split<S: RecordStore>(
	primary: &NigoriClient<S>,
	password: &Password,
	descriptor_name: &RecordName,
	value_name: &RecordName,
	secret: &[u8],
	k: u32,
	servers: Vec<(String, u16)>,
) -> Result<SplitDescriptor, NigoriError> {
	if k == 0 || (k as usize) > servers.len() {
		return Err(NigoriError::InvalidSplit);
	}

	let shares = shamir::share(secret, k, servers.len() as u32, &PRIME_4096)?;
	let username = primary.identity().username.clone();

	for (share, (host, port)) in shares.iter().zip(servers.iter()) {
		write_share(&username, password, host, *port, value_name, share)?;
	}

	let descriptor = SplitDescriptor { k, servers };
	let payload = serde_json::to_vec(&descriptor).map_err(|e| NigoriError::MalformedResponse(e.to_string()))?;
	primary.add_record(descriptor_name, &payload)?;

	Ok(descriptor)
}

/// Adds another secret to an already-established split, reusing its
/// `(k, servers)` threshold.
pub fn split_add<S: RecordStore>(
	primary: &NigoriClient<S>,
	password: &Password,
	descriptor_name: &RecordName,
	value_name: &RecordName,
	secret: &[u8],
) -> Result<(), NigoriError> {
	let descriptor = load_descriptor(primary, descriptor_name)?;
	let shares = shamir::share(secret, descriptor.k, descriptor.servers.len() as u32, &PRIME_4096)?;
	let username = primary.identity().username.clone();

	for (share, (host, port)) in shares.iter().zip(descriptor.servers.iter()) {
		write_share(&username, password, host, *port, value_name, share)?;
	}

	Ok(())
}

/// Recovers a secret previously split under `descriptor_name` /
/// `value_name`, reading shares from the first `k` reachable servers.
pub fn split_get<S: RecordStore>(
	primary: &NigoriClient<S>,
	password: &Password,
	descriptor_name: &RecordName,
	value_name: &RecordName,
) -> Result<Vec<u8>, NigoriError> {
	let descriptor = load_descriptor(primary, descriptor_name)?;
	let username = primary.identity().username.clone();
	let permuted_name = |deriver: &KeyDeriver| deriver.permute(&value_name.to_bytes()).to_bytes();

	let mut shares = Vec::with_capacity(descriptor.k as usize);
	for (index, (host, port)) in descriptor.servers.iter().enumerate() {
		if shares.len() == descriptor.k as usize {
			break;
		}

		let share = (|| -> Result<Share, NigoriError> {
			let deriver = server_deriver(&username, host, password)?;
			let store = HttpRecordStore::new(format!("http://{host}:{port}"));
			let name = permuted_name(&deriver);

			let version = store.get_resource(&name, None)?;
			let envelope = nigori_crypto::envelope::Envelope::from_bytes(&version.value)?;
			let plaintext = deriver.decrypt(&envelope)?;

			Ok(Share { index: (index + 1) as u32, value: bin2int(&plaintext) })
		})();

		match share {
			Ok(share) => shares.push(share),
			Err(err) => tracing::warn!(host, port, error = %err, "split server unreachable, trying the next one"),
		}
	}

	if shares.len() < descriptor.k as usize {
		return Err(NigoriError::InvalidSplit);
	}

	Ok(shamir::recover(&shares, &PRIME_4096)?)
}

fn write_share(username: &[u8], password: &Password, host: &str, port: u16, value_name: &RecordName, share: &Share) -> Result<(), NigoriError> {
	let deriver = server_deriver(username, host, password)?;
	let store = HttpRecordStore::new(format!("http://{host}:{port}"));

	let public_key = int2bin(&deriver.signer().public_key());
	store.register(&String::from_utf8_lossy(username), &public_key)?;

	let name = deriver.permute(&value_name.to_bytes()).to_bytes();
	let value = deriver.encrypt(&int2bin(&share.value)).to_bytes();
	let auth = crate::auth::build_auth_params(&deriver, &String::from_utf8_lossy(username));

	store.add_resource(&auth, &name, &value)
}

fn load_descriptor<S: RecordStore>(primary: &NigoriClient<S>, descriptor_name: &RecordName) -> Result<SplitDescriptor, NigoriError> {
	let record = primary.get_record(descriptor_name, None)?;
	serde_json::from_slice(&record.value).map_err(|e| NigoriError::MalformedResponse(e.to_string()))
}
