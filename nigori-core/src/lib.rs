//! Client protocol glue for Nigori: user identity, auth tokens, record
//! naming, the `RecordStore` collaborator boundary, and the composed
//! client operations built on top of `nigori-crypto`.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod record;
pub mod split;
pub mod store;

pub use auth::AuthParams;
pub use client::NigoriClient;
pub use config::NigoriClientConfig;
pub use error::NigoriError;
pub use identity::{Password, UserIdentity};
pub use record::{RecordName, RecordVersion};
pub use split::{create_split, split_add, split_get, SplitDescriptor};
pub use store::{HttpRecordStore, RecordStore};
