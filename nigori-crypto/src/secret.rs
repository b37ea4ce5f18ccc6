//! A small secret-byte-array newtype, zeroized on drop with constant-time
//! equality, generalized over length with a const generic rather than a
//! distinct type per key size.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

pub struct SecretBytes<const N: usize>([u8; N]);

impl<const N: usize> SecretBytes<N> {
	pub fn from_array(bytes: [u8; N]) -> Self {
		Self(bytes)
	}

	pub fn from_slice(bytes: &[u8]) -> Option<Self> {
		if bytes.len() != N {
			return None;
		}
		let mut buf = [0u8; N];
		buf.copy_from_slice(bytes);
		Some(Self(buf))
	}

	pub fn as_bytes(&self) -> &[u8; N] {
		&self.0
	}
}

impl<const N: usize> AsRef<[u8]> for SecretBytes<N> {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl<const N: usize> Clone for SecretBytes<N> {
	fn clone(&self) -> Self {
		Self(self.0)
	}
}

impl<const N: usize> PartialEq for SecretBytes<N> {
	fn eq(&self, other: &Self) -> bool {
		self.0.ct_eq(&other.0).into()
	}
}

impl<const N: usize> Eq for SecretBytes<N> {}

/// Never prints the underlying bytes, even in debug builds.
impl<const N: usize> std::fmt::Debug for SecretBytes<N> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "SecretBytes<{N}>(..)")
	}
}

impl<const N: usize> Drop for SecretBytes<N> {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

pub type Key16 = SecretBytes<16>;
