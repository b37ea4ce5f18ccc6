//! Shamir `k`-of-`n` secret sharing over a prime field.
//!
//! Share values are computed from a polynomial `f(x) = a0 + a1*x + ... +
//! a(k-1)*x^(k-1) mod p` with `a0` fixed to the secret and the remaining
//! coefficients drawn uniformly from the CSPRNG; `f(1)..f(n)` are handed out
//! as shares. Any `k` of the `n` points recover `a0` by Lagrange
//! interpolation at `x = 0`.
//!
//! The field modulus is a parameter rather than hardwired, so the same code
//! backs both the fixed 4096-bit production field ([`PRIME_4096`]) and
//! small test fields. [`share_int`]/[`recover_int`] work directly on field
//! elements; [`share`]/[`recover`] build on top of them for byte-string
//! secrets, prepending a `0x01` marker byte before lifting the secret into
//! the field and stripping it back off on recovery, so that secrets with
//! leading zero bytes round-trip exactly. The marker costs one extra byte
//! of field width, so `share`/`recover` need a prime wider than the raw
//! secret by at least that much; callers working with a field too small to
//! spare that byte (demonstrating the scheme over a textbook-sized prime,
//! for instance) should use the `_int` functions directly.

use crate::codec::{bin2int, int2bin};
use crate::error::CryptoError;
use crate::modinv::mod_inverse;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};
use once_cell::sync::Lazy;
use rand::{rngs::OsRng, RngCore};
use std::collections::BTreeMap;

/// The fixed 4096-bit safe-prime field used for production secret splits,
/// RFC 3526 group 16's prime.
pub static PRIME_4096: Lazy<BigUint> = Lazy::new(|| {
	BigUint::parse_bytes(
		b"ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74020bbea63b139b22514a08798e3404ddef9519b3cd3a431b302b0a6df25f14374fe1356d6d51c245e485b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7edee386bfb5a899fa5ae9f24117c4b1fe649286651ece45b3dc2007cb8a163bf0598da48361c55d39a69163fa8fd24cf5f83655d23dca3ad961c62f356208552bb9ed529077096966d670c354e4abc9804f1746c08ca18217c32905e462e36ce3be39e772c180e86039b2783a2ec07a28fb5c55df06f4c52c9de2bcbf6955817183995497cea956ae515d2261898fa051015728e5a8aaac42dad33170d04507a33a85521abdf1cba64ecfb850458dbef0a8aea71575d060c7db3970f85a6e1e4c7abf5ae8cdb0933d71e8c94e04a25619dcee3d2261ad2ee6bf12ffa06d98a0864d87602733ec86a64521f2b18177b200cbbe117577a615d6c770988c0bad946e208e24fa074e5ab3143db5bfce0fd108e4b82d120a92108011a723c12a787e6d788719a10bdba5b2699c327186af4e23c1a946834b6150bda2583e9ca2ad44ce8dbbbc2db04de8ef92e8efc141fbecaa6287c59474e6bc05d99b2964fa090c3a2233ba186515be7ed1f612970cee2d7afb81bdd762170481cd0069127d5b05aa993b4ea988d8fddc186ffb7dc90a6c08f4df435c934063199ffffffffffffffff",
		16,
	)
	.expect("PRIME_4096 is valid hex")
});

/// One point `(index, value)` on the sharing polynomial. `index` ranges over `1..=n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
	pub index: u32,
	pub value: BigUint,
}

/// Splits `secret` into `n` shares such that any `k` of them recover it.
///
/// `0 < k <= n` and both the secret (with its marker byte) and `n` must be
/// smaller than `prime`. See the module docs for when to reach for
/// [`share_int`] instead.
pub fn share(secret: &[u8], k: u32, n: u32, prime: &BigUint) -> Result<Vec<Share>, CryptoError> {
	let mut marked = Vec::with_capacity(secret.len() + 1);
	marked.push(0x01u8);
	marked.extend_from_slice(secret);

	share_int(&bin2int(&marked), k, n, prime)
}

/// Recovers the original secret from `k` or more shares via Lagrange
/// interpolation at `x = 0`, then strips the `0x01` marker byte added by [`share`].
pub fn recover(shares: &[Share], prime: &BigUint) -> Result<Vec<u8>, CryptoError> {
	let secret = recover_int(shares, prime)?;
	let bytes = int2bin(&secret);
	match bytes.split_first() {
		Some((0x01, rest)) => Ok(rest.to_vec()),
		_ => Err(CryptoError::BadShamirParameters),
	}
}

/// Splits the field element `secret` into `n` shares such that any `k` of
/// them recover it, with no marker byte and no byte-framing — the raw
/// polynomial-evaluation scheme. `0 < k <= n` and both `secret` and `n`
/// must be smaller than `prime`.
pub fn share_int(secret: &BigUint, k: u32, n: u32, prime: &BigUint) -> Result<Vec<Share>, CryptoError> {
	if k == 0 || k > n {
		return Err(CryptoError::BadShamirParameters);
	}

	if *secret >= *prime || BigUint::from(n) >= *prime {
		return Err(CryptoError::BadShamirParameters);
	}

	let mut coefficients = Vec::with_capacity(k as usize);
	coefficients.push(secret.clone());
	for _ in 1..k {
		coefficients.push(random_below(prime));
	}

	let shares = (1..=n)
		.map(|x| Share {
			index: x,
			value: evaluate(&coefficients, &BigUint::from(x), prime),
		})
		.collect();

	Ok(shares)
}

/// Recovers the field element shared by [`share_int`] from `k` or more
/// shares via Lagrange interpolation at `x = 0`.
pub fn recover_int(shares: &[Share], prime: &BigUint) -> Result<BigUint, CryptoError> {
	if shares.is_empty() {
		return Err(CryptoError::BadShamirParameters);
	}

	let points: BTreeMap<u32, BigUint> = shares.iter().map(|s| (s.index, s.value.clone())).collect();
	let modulus = BigInt::from(prime.clone());
	let mut secret = BigInt::zero();

	for (&i, y_i) in &points {
		let mut numerator = BigInt::one();
		let mut denominator = BigInt::one();

		for &j in points.keys() {
			if j == i {
				continue;
			}
			numerator *= BigInt::from(j);
			denominator *= BigInt::from(j) - BigInt::from(i);
		}

		let denom_mod = reduce(&denominator, &modulus);
		let denom_inv = mod_inverse(&denom_mod, prime)?;
		let term = (BigInt::from(y_i.clone()) * &numerator * BigInt::from(denom_inv)) % &modulus;
		secret = (secret + term) % &modulus;
	}

	Ok(reduce(&secret, &modulus))
}

fn reduce(value: &BigInt, modulus: &BigInt) -> BigUint {
	let mut v = value % modulus;
	if v.is_negative() {
		v += modulus;
	}
	v.to_biguint().expect("reduced non-negative value fits in BigUint")
}

fn evaluate(coefficients: &[BigUint], x: &BigUint, prime: &BigUint) -> BigUint {
	let mut acc = BigUint::zero();
	for coeff in coefficients.iter().rev() {
		acc = (acc * x + coeff) % prime;
	}
	acc
}

fn random_below(bound: &BigUint) -> BigUint {
	let bytes = (bound.bits() as usize + 7) / 8;
	let mut buf = vec![0u8; bytes];
	loop {
		OsRng.fill_bytes(&mut buf);
		let candidate = bin2int(&buf);
		if candidate < *bound {
			return candidate;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn small_prime() -> BigUint {
		BigUint::from(17u32)
	}

	#[test]
	fn splits_and_recovers_over_small_prime() {
		let prime = small_prime();
		let secret = BigUint::from(5u32);
		let shares = share_int(&secret, 2, 3, &prime).unwrap();
		let recovered = recover_int(&shares[0..2], &prime).unwrap();
		assert_eq!(recovered, secret);
	}

	/// The literal `p=17, secret=12, k=2, n=3` seed vector: recovering from
	/// shares {1, 2} returns 12.
	#[test]
	fn recovers_a_fixed_secret_over_the_small_prime_seed_vector() {
		let prime = small_prime();
		let secret = BigUint::from(12u32);
		let shares = share_int(&secret, 2, 3, &prime).unwrap();
		let recovered = recover_int(&[shares[0].clone(), shares[1].clone()], &prime).unwrap();
		assert_eq!(recovered, secret);
	}

	#[test]
	fn any_k_subset_recovers_the_same_secret() {
		let prime = PRIME_4096.clone();
		let secret = b"a shared production secret";
		let shares = share(secret, 3, 5, &prime).unwrap();

		for subset in [[0, 1, 2], [1, 2, 3], [2, 3, 4], [0, 2, 4]] {
			let chosen: Vec<Share> = subset.iter().map(|&i| shares[i].clone()).collect();
			assert_eq!(recover(&chosen, &prime).unwrap(), secret);
		}
	}

	#[test]
	fn preserves_leading_zero_bytes() {
		let prime = PRIME_4096.clone();
		let secret = [0x00u8, 0x00, 0xfe, 0xfd, 0xfc, 0xfb, 0xfa, 0xf9, 0xf8, 0xf7, 0xf6, 0xf5, 0xf4, 0xf3, 0xf2];
		let shares = share(&secret, 2, 3, &prime).unwrap();
		let recovered = recover(&shares[0..2], &prime).unwrap();
		assert_eq!(recovered, secret);
	}

	#[test]
	fn insufficient_shares_do_not_silently_recover() {
		let prime = small_prime();
		let secret = BigUint::from(9u32);
		let shares = share_int(&secret, 3, 5, &prime).unwrap();
		let recovered = recover_int(&shares[0..2], &prime).unwrap();
		assert_ne!(recovered, secret);
	}

	#[test]
	fn rejects_k_greater_than_n() {
		let prime = PRIME_4096.clone();
		assert!(matches!(share(b"x", 4, 2, &prime), Err(CryptoError::BadShamirParameters)));
	}

	#[test]
	fn rejects_secret_too_large_for_field() {
		let prime = small_prime();
		assert!(matches!(share(&[0xFFu8; 4], 2, 3, &prime), Err(CryptoError::BadShamirParameters)));
	}

	#[test]
	fn recovers_a_fixed_secret_over_the_production_field() {
		let prime = PRIME_4096.clone();
		let secret = [0xff, 0xfe, 0xfd, 0xfc, 0xfb, 0xfa, 0xf9, 0xf8, 0xf7, 0xf6, 0xf5, 0xf4, 0xf3, 0xf2, 0xf0];
		let shares = share(&secret, 2, 3, &prime).unwrap();
		let recovered = recover(&[shares[0].clone(), shares[1].clone()], &prime).unwrap();
		assert_eq!(recovered, secret);
	}

	#[test]
	fn shares_are_distinct_and_differ_from_secret() {
		let prime = PRIME_4096.clone();
		let shares = share(b"another secret", 2, 4, &prime).unwrap();
		let values: std::collections::HashSet<_> = shares.iter().map(|s| s.value.clone()).collect();
		assert_eq!(values.len(), shares.len());
	}
}
