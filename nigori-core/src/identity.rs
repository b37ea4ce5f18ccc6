//! User identity and password, kept as bytes rather than `String` so that
//! the PBKDF2 inputs they feed are unambiguous regardless of encoding.

use zeroize::Zeroize;

/// `(username, server-name)`, immutable for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserIdentity {
	pub username: Vec<u8>,
	pub server_name: Vec<u8>,
}

impl UserIdentity {
	pub fn new(username: impl Into<Vec<u8>>, server_name: impl Into<Vec<u8>>) -> Self {
		UserIdentity {
			username: username.into(),
			server_name: server_name.into(),
		}
	}
}

/// A password, zeroized on drop and never `Debug`-printed.
pub struct Password(Vec<u8>);

impl Password {
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Password(bytes.into())
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl std::fmt::Debug for Password {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Password(..)")
	}
}

impl Drop for Password {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}
