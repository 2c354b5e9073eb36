//! Textbook modular-exponentiation cipher (RSA-style) over small primes.
//!
//! [`KeyPair::generate`] derives `{n, phi, e, d}` from two primes and
//! refuses anything that would not round-trip. [`ModularCodec`] then maps
//! each character code `m` to `m^e mod n` and back with `c^d mod n`.

mod codec;
pub mod keystore;

pub use codec::{parse_codes, ModularCodec, ModularOutput, PowerStep, Verification};

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClassiCryptError, Result};
use crate::utils::arith;

/// Smallest public exponent tried by the automatic search.
const FIRST_EXPONENT_CANDIDATE: u64 = 3;

/// Prime pairs drawn by [`KeyPair::random`] before giving up on `e`.
const MAX_RANDOM_ATTEMPTS: usize = 64;

/// Public half of a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub e: u64,
    pub n: u64,
}

/// Private half of a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pub d: u64,
    pub n: u64,
}

/// Immutable key pair derived from two distinct primes.
///
/// Fields are private so that every value in circulation satisfies
/// `n = p*q`, `phi = (p-1)(q-1)`, `gcd(e, phi) = 1`, `1 < e < phi` and
/// `d*e ≡ 1 (mod phi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    p: u64,
    q: u64,
    n: u64,
    phi: u64,
    e: u64,
    d: u64,
}

impl KeyPair {
    /// Derives a key pair from `p`, `q` and an optional public exponent.
    ///
    /// Without `e`, the smallest value `>= 3` coprime with `phi` is used.
    ///
    /// # Errors
    /// - [`ClassiCryptError::InvalidPrime`] if `p` or `q` is not prime, if
    ///   they are equal, or if `p*q` does not fit in a `u64`.
    /// - [`ClassiCryptError::InvalidPublicExponent`] if the supplied `e` is
    ///   not in `(1, phi)` or shares a factor with `phi`, or if no exponent
    ///   exists below `phi`.
    /// - [`ClassiCryptError::NoInverseExists`] if `e` has no inverse modulo
    ///   `phi`.
    ///
    /// # Examples
    ///
    /// ```
    /// use classicrypt::KeyPair;
    ///
    /// let kp = KeyPair::generate(17, 11, Some(7)).unwrap();
    /// assert_eq!((kp.n(), kp.phi(), kp.d()), (187, 160, 23));
    ///
    /// let auto = KeyPair::generate(17, 11, None).unwrap();
    /// assert_eq!(auto.e(), 3);
    ///
    /// assert!(KeyPair::generate(15, 11, None).is_err());
    /// ```
    pub fn generate(p: u64, q: u64, e: Option<u64>) -> Result<Self> {
        for value in [p, q] {
            if !arith::is_prime(value) {
                return Err(ClassiCryptError::InvalidPrime {
                    value,
                    reason: "not prime",
                });
            }
        }
        if p == q {
            return Err(ClassiCryptError::InvalidPrime {
                value: q,
                reason: "p and q must differ",
            });
        }
        let n = p.checked_mul(q).ok_or(ClassiCryptError::InvalidPrime {
            value: q,
            reason: "p * q overflows a 64-bit modulus",
        })?;
        let phi = (p - 1) * (q - 1);

        let e = match e {
            Some(e) => {
                if e <= 1 || e >= phi || arith::gcd(e, phi) != 1 {
                    return Err(ClassiCryptError::InvalidPublicExponent { e, phi });
                }
                e
            }
            None => Self::smallest_exponent(phi)?,
        };

        let d = arith::mod_inverse(e, phi)?;

        Ok(KeyPair { p, q, n, phi, e, d })
    }

    /// Derives a key pair from two random primes of `bits` bits each.
    ///
    /// Pairs whose `phi` rejects the requested `e` are redrawn a bounded
    /// number of times.
    ///
    /// # Errors
    /// - [`ClassiCryptError::InvalidPrimeSize`] if `bits` is outside
    ///   `MIN_PRIME_BITS..=MAX_PRIME_BITS`.
    /// - [`ClassiCryptError::InvalidPublicExponent`] if no drawn pair
    ///   accepts `e`.
    ///
    /// # Examples
    ///
    /// ```
    /// use classicrypt::KeyPair;
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let kp = KeyPair::random(16, Some(65537), &mut rng).unwrap();
    /// assert_eq!(kp.e(), 65537);
    /// assert_ne!(kp.p(), kp.q());
    /// ```
    pub fn random<R: Rng + ?Sized>(bits: u32, e: Option<u64>, rng: &mut R) -> Result<Self> {
        let mut last_err = None;
        for attempt in 1..=MAX_RANDOM_ATTEMPTS {
            let p = arith::random_prime(bits, rng)?;
            let q = arith::random_prime(bits, rng)?;
            if p == q {
                continue;
            }
            match Self::generate(p, q, e) {
                Ok(keys) => {
                    debug!(bits, attempt, n = keys.n, "random key pair derived");
                    return Ok(keys);
                }
                Err(err @ ClassiCryptError::InvalidPublicExponent { .. }) => {
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or(ClassiCryptError::InvalidPrime {
            value: 0,
            reason: "could not draw two distinct primes",
        }))
    }

    /// First `e >= 3` below `phi` that is coprime with it.
    fn smallest_exponent(phi: u64) -> Result<u64> {
        (FIRST_EXPONENT_CANDIDATE..phi)
            .find(|&candidate| arith::gcd(candidate, phi) == 1)
            .ok_or(ClassiCryptError::InvalidPublicExponent {
                e: FIRST_EXPONENT_CANDIDATE,
                phi,
            })
    }

    pub fn p(&self) -> u64 {
        self.p
    }

    pub fn q(&self) -> u64 {
        self.q
    }

    /// Modulus `p*q`.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Euler totient `(p-1)(q-1)`.
    pub fn phi(&self) -> u64 {
        self.phi
    }

    /// Public exponent.
    pub fn e(&self) -> u64 {
        self.e
    }

    /// Private exponent.
    pub fn d(&self) -> u64 {
        self.d
    }

    pub fn public(&self) -> PublicKey {
        PublicKey {
            e: self.e,
            n: self.n,
        }
    }

    pub fn private(&self) -> PrivateKey {
        PrivateKey {
            d: self.d,
            n: self.n,
        }
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p = {}, q = {}", self.p, self.q)?;
        writeln!(f, "n = p × q = {}", self.n)?;
        writeln!(f, "φ(n) = (p-1) × (q-1) = {}", self.phi)?;
        writeln!(f, "public key  (e, n) = ({}, {})", self.e, self.n)?;
        writeln!(f, "private key (d, n) = ({}, {})", self.d, self.n)?;
        write!(
            f,
            "check: (d × e) mod φ(n) = {}",
            arith::mul_mod(self.d, self.e, self.phi)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_pair() {
        let kp = KeyPair::generate(17, 11, Some(7)).unwrap();
        assert_eq!(kp.n(), 187);
        assert_eq!(kp.phi(), 160);
        assert_eq!(kp.e(), 7);
        assert_eq!(kp.d(), 23);
        assert_eq!(kp.public(), PublicKey { e: 7, n: 187 });
        assert_eq!(kp.private(), PrivateKey { d: 23, n: 187 });
    }

    #[test]
    fn test_auto_exponent_is_smallest_coprime() {
        // phi = 160 = 2^5 * 5, so 3 is the first candidate that works.
        assert_eq!(KeyPair::generate(17, 11, None).unwrap().e(), 3);
        // phi = 60 * 52 = 3120 = 2^4 * 3 * 5 * 13, so 3 and 5 fail.
        assert_eq!(KeyPair::generate(61, 53, None).unwrap().e(), 7);
        // phi = 6 * 10 = 60, 3..=6 share a factor.
        assert_eq!(KeyPair::generate(7, 11, None).unwrap().e(), 7);
    }

    #[test]
    fn test_rejects_non_prime_and_equal() {
        assert_eq!(
            KeyPair::generate(1, 11, None),
            Err(ClassiCryptError::InvalidPrime {
                value: 1,
                reason: "not prime"
            })
        );
        assert!(matches!(
            KeyPair::generate(17, 21, None),
            Err(ClassiCryptError::InvalidPrime { value: 21, .. })
        ));
        assert!(matches!(
            KeyPair::generate(13, 13, None),
            Err(ClassiCryptError::InvalidPrime {
                reason: "p and q must differ",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_overflowing_modulus() {
        let big = 18_446_744_073_709_551_557u64;
        assert!(matches!(
            KeyPair::generate(big, 3, None),
            Err(ClassiCryptError::InvalidPrime { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_exponent_without_substitution() {
        for e in [0, 1, 4, 10, 160, 161] {
            assert_eq!(
                KeyPair::generate(17, 11, Some(e)),
                Err(ClassiCryptError::InvalidPublicExponent { e, phi: 160 }),
                "e = {e}"
            );
        }
    }

    #[test]
    fn test_no_exponent_for_tiny_phi() {
        // p = 2, q = 3: phi = 2, nothing lies strictly between 1 and 2.
        assert!(matches!(
            KeyPair::generate(2, 3, None),
            Err(ClassiCryptError::InvalidPublicExponent { phi: 2, .. })
        ));
    }

    #[test]
    fn test_random_pair_is_consistent() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(42);
        for bits in [8, 16, 32] {
            let kp = KeyPair::random(bits, None, &mut rng).unwrap();
            assert!(arith::is_prime(kp.p()) && arith::is_prime(kp.q()));
            assert_ne!(kp.p(), kp.q());
            assert_eq!(kp.n(), kp.p() * kp.q());
            assert_eq!(arith::mul_mod(kp.d(), kp.e(), kp.phi()), 1);
        }
    }

    #[test]
    fn test_random_pair_rejects_bad_size() {
        let mut rng = rand::thread_rng();
        assert_eq!(
            KeyPair::random(33, None, &mut rng),
            Err(ClassiCryptError::InvalidPrimeSize { bits: 33 })
        );
    }

    #[test]
    fn test_random_pair_gives_up_on_impossible_exponent() {
        // An even e is never coprime with an even phi.
        let mut rng = rand::thread_rng();
        assert!(matches!(
            KeyPair::random(8, Some(4), &mut rng),
            Err(ClassiCryptError::InvalidPublicExponent { e: 4, .. })
        ));
    }

    #[test]
    fn test_display_reports_check() {
        let kp = KeyPair::generate(61, 53, Some(17)).unwrap();
        let shown = kp.to_string();
        assert!(shown.contains("n = p × q = 3233"));
        assert!(shown.contains("private key (d, n) = (2753, 3233)"));
        assert!(shown.ends_with("= 1"));
    }
}
