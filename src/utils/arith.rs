//! Integer arithmetic for the modular cipher.
//!
//! All routines work on `u64` operands and widen to `u128` for products so
//! that no intermediate value overflows, whatever the modulus.

use rand::Rng;

use crate::error::{ClassiCryptError, Result};

/// Miller-Rabin witnesses that make the test deterministic for every `u64`.
const MR_WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Smallest size accepted by [`random_prime`].
pub const MIN_PRIME_BITS: u32 = 3;

/// Largest size accepted by [`random_prime`]; two such primes multiply to
/// less than `2^64`.
pub const MAX_PRIME_BITS: u32 = 32;

/// Greatest common divisor (Euclid).
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Extended Euclidean algorithm.
///
/// # Returns
/// `(g, x, y)` such that `a*x + b*y = g = gcd(a, b)`.
pub fn extended_gcd(a: u64, b: u64) -> (u64, i128, i128) {
    let (mut old_r, mut r) = (a as i128, b as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);

    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
        (old_t, t) = (t, old_t - quotient * t);
    }

    (old_r as u64, old_s, old_t)
}

/// Modular multiplicative inverse of `value` modulo `modulus`.
///
/// # Errors
/// Returns [`ClassiCryptError::NoInverseExists`] when
/// `gcd(value, modulus) != 1` or `modulus < 2`.
pub fn mod_inverse(value: u64, modulus: u64) -> Result<u64> {
    if modulus < 2 {
        return Err(ClassiCryptError::NoInverseExists { value, modulus });
    }
    let (g, x, _) = extended_gcd(value % modulus, modulus);
    if g != 1 {
        return Err(ClassiCryptError::NoInverseExists { value, modulus });
    }
    let m = modulus as i128;
    Ok(((x % m + m) % m) as u64)
}

/// `(a * b) mod m` without overflow.
#[inline]
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// `base^exp mod modulus` by binary square-and-multiply.
///
/// Reduces after every multiplication, so cost is `O(log exp)` products.
/// A modulus of 1 yields 0.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut base = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, modulus);
        }
        exp >>= 1;
        base = mul_mod(base, base, modulus);
    }
    result
}

/// Deterministic primality test for any `u64`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in MR_WITNESSES.iter() {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for &a in MR_WITNESSES.iter() {
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Draws a random prime of exactly `bits` bits.
///
/// Candidates are odd values with the top bit set, tested with
/// [`is_prime`] until one passes. A prime always exists in
/// `[2^(bits-1), 2^bits)`, so the loop ends.
///
/// # Errors
/// Returns [`ClassiCryptError::InvalidPrimeSize`] unless
/// `MIN_PRIME_BITS <= bits <= MAX_PRIME_BITS`.
///
/// # Examples
///
/// ```
/// use classicrypt::utils::arith::{is_prime, random_prime};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let p = random_prime(16, &mut rng).unwrap();
/// assert!(is_prime(p));
/// assert_eq!(64 - p.leading_zeros(), 16);
/// ```
pub fn random_prime<R: Rng + ?Sized>(bits: u32, rng: &mut R) -> Result<u64> {
    if !(MIN_PRIME_BITS..=MAX_PRIME_BITS).contains(&bits) {
        return Err(ClassiCryptError::InvalidPrimeSize { bits });
    }
    let low = 1u64 << (bits - 1);
    let high = (1u64 << bits) - 1;
    loop {
        let candidate = rng.gen_range(low..=high) | 1;
        if is_prime(candidate) {
            return Ok(candidate);
        }
    }
}
