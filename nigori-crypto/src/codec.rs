//! Arbitrary-precision unsigned integers and the length-prefixed byte
//! framing used everywhere a hash, MAC, or signature input needs to be
//! unambiguous.
//!
//! Big integers are backed by `num-bigint` rather than a hand-rolled
//! bignum — this crate only supplies the canonical encode/decode and the
//! `concat`/`unconcat` framing on top of it.

use crate::error::CryptoError;
use num_bigint::BigUint;
use num_traits::Zero;

/// Minimal big-endian encoding of `n`. `int2bin(0)` is the empty string.
pub fn int2bin(n: &BigUint) -> Vec<u8> {
	if n.is_zero() {
		Vec::new()
	} else {
		n.to_bytes_be()
	}
}

/// Left inverse of [`int2bin`]: `bin2int(int2bin(n)) == n` for all `n`.
pub fn bin2int(bytes: &[u8]) -> BigUint {
	BigUint::from_bytes_be(bytes)
}

/// Big-endian encoding of `n` padded with leading zeros to exactly `width`
/// bytes. Fails if the minimal encoding is already wider than `width`.
pub fn pad_int2bin(n: &BigUint, width: usize) -> Result<Vec<u8>, CryptoError> {
	let minimal = int2bin(n);
	if minimal.len() > width {
		return Err(CryptoError::EncodingTooWide);
	}

	let mut out = vec![0u8; width - minimal.len()];
	out.extend_from_slice(&minimal);
	Ok(out)
}

/// The 4-byte big-endian encoding of `len(x)`, used as a length prefix.
pub fn length_of(x: &[u8]) -> [u8; 4] {
	(x.len() as u32).to_be_bytes()
}

/// `lengthOf(x0) || x0 || lengthOf(x1) || x1 || ...`
pub fn concat(fields: &[&[u8]]) -> Vec<u8> {
	let mut out = Vec::with_capacity(fields.iter().map(|f| f.len() + 4).sum());
	for field in fields {
		out.extend_from_slice(&length_of(field));
		out.extend_from_slice(field);
	}
	out
}

/// Strict inverse of [`concat`]. Fails if a declared field length exceeds
/// the bytes remaining in `bytes`.
pub fn unconcat(bytes: &[u8]) -> Result<Vec<Vec<u8>>, CryptoError> {
	let mut out = Vec::new();
	let mut rest = bytes;

	while !rest.is_empty() {
		if rest.len() < 4 {
			return Err(CryptoError::TruncatedFrame);
		}
		let (len_bytes, tail) = rest.split_at(4);
		let len = u32::from_be_bytes(len_bytes.try_into().expect("length is 4 bytes")) as usize;
		if tail.len() < len {
			return Err(CryptoError::TruncatedFrame);
		}
		let (field, tail) = tail.split_at(len);
		out.push(field.to_vec());
		rest = tail;
	}

	Ok(out)
}
