//! Cryptographic core for Nigori: a big-integer codec, a PBKDF2 key
//! hierarchy, authenticated envelopes, Schnorr signatures over a fixed
//! multiplicative group, and Shamir secret sharing over a fixed prime
//! field.
//!
//! This crate has no notion of records, servers, or HTTP; it only supplies
//! the primitives `nigori-core` composes into a client.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod key_deriver;
pub mod modinv;
pub mod pbkdf2;
pub mod schnorr;
pub mod secret;
pub mod shamir;

pub use envelope::Envelope;
pub use error::CryptoError;
pub use key_deriver::KeyDeriver;
pub use schnorr::{SchnorrSigner, SchnorrVerifier, Signature};
pub use secret::{Key16, SecretBytes};
pub use shamir::{Share, PRIME_4096};
