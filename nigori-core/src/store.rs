//! The `RecordStore` collaborator boundary and its one HTTP implementation.
//!
//! The persistence layer itself (the untrusted record database) is out of
//! scope; `HttpRecordStore` only speaks the wire protocol to whatever is
//! listening on the other end, treating the server as an opaque HTTP peer.

use crate::auth::AuthParams;
use crate::error::NigoriError;
use crate::record::RecordVersion;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use std::collections::HashMap;

/// An untrusted record store reachable through register/authenticate/
/// add-resource/list-resource/get-resource, exactly as specified in the
/// wire protocol.
pub trait RecordStore {
	fn register(&self, user: &str, public_key: &[u8]) -> Result<(), NigoriError>;
	fn authenticate(&self, user: &str, t: &str, e: &[u8], s: &[u8]) -> Result<(), NigoriError>;
	fn add_resource(&self, auth: &AuthParams, name: &[u8], value: &[u8]) -> Result<(), NigoriError>;
	fn list_resource(&self, auth: &AuthParams, name: &[u8]) -> Result<Vec<RecordVersion>, NigoriError>;
	fn get_resource(&self, name: &[u8], version: Option<u32>) -> Result<RecordVersion, NigoriError>;
}

/// Blocking HTTP implementation of [`RecordStore`], one host:port, one
/// `reqwest::blocking::Client` reused across calls.
pub struct HttpRecordStore {
	base_url: String,
	client: reqwest::blocking::Client,
}

impl HttpRecordStore {
	pub fn new(base_url: impl Into<String>) -> Self {
		HttpRecordStore {
			base_url: base_url.into(),
			client: reqwest::blocking::Client::new(),
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	fn auth_form(auth: &AuthParams) -> Vec<(&'static str, String)> {
		vec![
			("user", auth.user.clone()),
			("t", auth.t.clone()),
			("e", URL_SAFE_NO_PAD.encode(&auth.e)),
			("s", URL_SAFE_NO_PAD.encode(&auth.s)),
		]
	}

	fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<reqwest::blocking::Response, NigoriError> {
		self.client
			.post(self.url(path))
			.form(form)
			.send()
			.map_err(|e| NigoriError::Transport(e.to_string()))
	}

	fn get_with_query(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::blocking::Response, NigoriError> {
		self.client
			.get(self.url(path))
			.query(query)
			.send()
			.map_err(|e| NigoriError::Transport(e.to_string()))
	}

	fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, NigoriError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		let reason = response.text().unwrap_or_default();
		tracing::warn!(status = status.as_u16(), %reason, "record store rejected request");

		if status.as_u16() == 401 && reason.to_lowercase().contains("replay") {
			return Err(NigoriError::Replay);
		}
		if status.as_u16() == 401 {
			return Err(NigoriError::Verify);
		}

		Err(NigoriError::Protocol { status: status.as_u16(), reason })
	}
}

impl RecordStore for HttpRecordStore {
	fn register(&self, user: &str, public_key: &[u8]) -> Result<(), NigoriError> {
		tracing::debug!(%user, "registering public key");
		let form = [("user", user.to_string()), ("publicKey", URL_SAFE_NO_PAD.encode(public_key))];
		Self::check_status(self.post_form("/register", &form)?)?;
		Ok(())
	}

	fn authenticate(&self, user: &str, t: &str, e: &[u8], s: &[u8]) -> Result<(), NigoriError> {
		let form = [
			("user", user.to_string()),
			("t", t.to_string()),
			("e", URL_SAFE_NO_PAD.encode(e)),
			("s", URL_SAFE_NO_PAD.encode(s)),
		];
		Self::check_status(self.post_form("/authenticate", &form)?)?;
		Ok(())
	}

	fn add_resource(&self, auth: &AuthParams, name: &[u8], value: &[u8]) -> Result<(), NigoriError> {
		let mut form = Self::auth_form(auth);
		form.push(("name", URL_SAFE_NO_PAD.encode(name)));
		form.push(("value", URL_SAFE_NO_PAD.encode(value)));

		let form_refs: Vec<(&str, String)> = form.into_iter().collect();
		Self::check_status(self.post_form("/add-resource", &form_refs)?)?;
		Ok(())
	}

	fn list_resource(&self, auth: &AuthParams, name: &[u8]) -> Result<Vec<RecordVersion>, NigoriError> {
		#[derive(Deserialize)]
		struct WireEntry {
			version: u32,
			#[serde(rename = "creationTime")]
			creation_time: u64,
			value: String,
		}

		let mut query = Self::auth_form(auth);
		query.push(("name", URL_SAFE_NO_PAD.encode(name)));
		let query_refs: Vec<(&str, String)> = query.into_iter().collect();

		let response = Self::check_status(self.get_with_query("/list-resource", &query_refs)?)?;
		let entries: Vec<WireEntry> = response.json().map_err(|e| NigoriError::MalformedResponse(e.to_string()))?;
		let total = entries.len() as u32;

		entries
			.into_iter()
			.map(|entry| {
				let value = URL_SAFE_NO_PAD.decode(entry.value).map_err(|e| NigoriError::MalformedResponse(e.to_string()))?;
				Ok(RecordVersion {
					version: entry.version,
					total_versions: total,
					creation_time: entry.creation_time,
					value,
				})
			})
			.collect()
	}

	fn get_resource(&self, name: &[u8], version: Option<u32>) -> Result<RecordVersion, NigoriError> {
		#[derive(Deserialize)]
		struct WireEntry {
			version: u32,
			#[serde(rename = "totalVersions")]
			total_versions: u32,
			#[serde(rename = "creationTime")]
			creation_time: u64,
			value: String,
		}

		let mut query: HashMap<&str, String> = HashMap::new();
		query.insert("name", URL_SAFE_NO_PAD.encode(name));
		if let Some(version) = version {
			query.insert("version", version.to_string());
		}
		let query_refs: Vec<(&str, String)> = query.into_iter().collect();

		let response = Self::check_status(self.get_with_query("/get-resource", &query_refs)?)?;
		let entry: WireEntry = response.json().map_err(|e| NigoriError::MalformedResponse(e.to_string()))?;
		let value = URL_SAFE_NO_PAD.decode(entry.value).map_err(|e| NigoriError::MalformedResponse(e.to_string()))?;

		Ok(RecordVersion {
			version: entry.version,
			total_versions: entry.total_versions,
			creation_time: entry.creation_time,
			value,
		})
	}
}
