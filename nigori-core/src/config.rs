//! Client configuration: the record store's address and the client-side
//! auth-token freshness window.
//!
//! Kept as constructor/struct fields rather than pulled from an external
//! config file or environment — Nigori has no ambient configuration
//! surface beyond where to reach the record store and how fresh a signed
//! token must be.

use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NigoriClientConfig {
	pub host: String,
	pub port: u16,
	/// How long a signed auth token is considered fresh by this client.
	/// The server is out of scope and enforces its own replay defense
	/// independently; this window is documentation of client intent only.
	pub freshness_window: Duration,
}

impl NigoriClientConfig {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		NigoriClientConfig {
			host: host.into(),
			port,
			freshness_window: Duration::from_secs(DEFAULT_FRESHNESS_WINDOW_SECS),
		}
	}

	pub fn base_url(&self) -> String {
		format!("http://{}:{}", self.host, self.port)
	}
}

const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 5 * 60;
