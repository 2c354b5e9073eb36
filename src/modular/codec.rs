//! Per-character modular exponentiation.

use std::fmt;

use serde::Serialize;

use super::KeyPair;
use crate::error::{ClassiCryptError, Result};
use crate::trace::{Mode, StepTrace, TraceStep};
use crate::utils::{arith, format};

/// Trace record for one character: `base^exponent mod modulus = result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerStep {
    pub mode: Mode,
    /// The plaintext character (input on encode and sign, output on decode
    /// and verify). A verified value that is not a character shows as
    /// U+FFFD.
    pub symbol: char,
    pub base: u64,
    pub exponent: u64,
    pub modulus: u64,
    pub result: u64,
}

impl TraceStep for PowerStep {
    fn input_unit(&self) -> String {
        match self.mode {
            Mode::Encode | Mode::Sign => format!("'{}' ({})", self.symbol, self.base),
            Mode::Decode | Mode::Verify => self.base.to_string(),
        }
    }

    fn detail(&self) -> String {
        format!(
            "{}^{} mod {} = {}",
            self.base, self.exponent, self.modulus, self.result
        )
    }

    fn output_unit(&self) -> String {
        match self.mode {
            Mode::Encode | Mode::Sign => self.result.to_string(),
            Mode::Decode | Mode::Verify => format!("'{}' ({})", self.symbol, self.result),
        }
    }
}

impl fmt::Display for PowerStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} → {}",
            self.input_unit(),
            self.detail(),
            self.output_unit()
        )
    }
}

/// Result of a modular encode or decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModularOutput {
    /// Ciphertext integers, in character order.
    pub codes: Vec<u64>,
    /// Plaintext characters.
    pub text: String,
    pub trace: StepTrace<PowerStep>,
}

impl ModularOutput {
    /// Codes in the whitespace-separated transport format.
    pub fn codes_string(&self) -> String {
        format::join_codes(&self.codes)
    }
}

/// Outcome of checking a signature against a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Whether every recovered value equals the matching character code.
    pub valid: bool,
    /// `s^e mod n` for each signature integer.
    pub recovered: Vec<u64>,
    pub trace: StepTrace<PowerStep>,
}

/// Encoder/decoder bound to one key pair.
///
/// # Examples
///
/// ```
/// use classicrypt::{KeyPair, ModularCodec};
///
/// let kp = KeyPair::generate(61, 53, Some(17)).unwrap();
/// let codec = ModularCodec::new(&kp);
///
/// let encoded = codec.encode("Hi!").unwrap();
/// let decoded = codec.decode(&encoded.codes_string()).unwrap();
/// assert_eq!(decoded.text, "Hi!");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ModularCodec<'k> {
    keys: &'k KeyPair,
}

impl<'k> ModularCodec<'k> {
    pub fn new(keys: &'k KeyPair) -> Self {
        ModularCodec { keys }
    }

    pub fn keys(&self) -> &KeyPair {
        self.keys
    }

    /// Encodes every character of `text` as `m^e mod n`.
    ///
    /// # Errors
    /// Returns [`ClassiCryptError::CharacterOutOfRange`] for the first
    /// character whose code is not below `n`; nothing is truncated.
    pub fn encode(&self, text: &str) -> Result<ModularOutput> {
        let public = self.keys.public();
        let mut codes = Vec::with_capacity(text.len());
        let mut trace = StepTrace::with_capacity(text.len());

        for symbol in text.chars() {
            let m = symbol as u64;
            if m >= public.n {
                return Err(ClassiCryptError::CharacterOutOfRange {
                    code: m,
                    modulus: public.n,
                });
            }
            let c = arith::mod_pow(m, public.e, public.n);
            codes.push(c);
            trace.push(PowerStep {
                mode: Mode::Encode,
                symbol,
                base: m,
                exponent: public.e,
                modulus: public.n,
                result: c,
            });
        }

        Ok(ModularOutput {
            codes,
            text: text.to_string(),
            trace,
        })
    }

    /// Parses whitespace-separated decimal codes and decodes them.
    ///
    /// # Errors
    /// - [`ClassiCryptError::MalformedCiphertext`] if a token is not a
    ///   non-negative integer or is not below `n`.
    /// - [`ClassiCryptError::CharacterOutOfRange`] if a decoded value is
    ///   not a Unicode scalar value.
    pub fn decode(&self, ciphertext: &str) -> Result<ModularOutput> {
        let codes = parse_codes(ciphertext)?;
        self.decode_codes(&codes)
    }

    /// Decodes already-parsed codes with `c^d mod n`.
    ///
    /// # Errors
    /// See [`decode`](Self::decode).
    pub fn decode_codes(&self, codes: &[u64]) -> Result<ModularOutput> {
        let private = self.keys.private();
        let mut text = String::with_capacity(codes.len());
        let mut trace = StepTrace::with_capacity(codes.len());

        for &c in codes {
            if c >= private.n {
                return Err(ClassiCryptError::MalformedCiphertext(format!(
                    "code {c} is not below the modulus {}",
                    private.n
                )));
            }
            let m = arith::mod_pow(c, private.d, private.n);
            let symbol = u32::try_from(m)
                .ok()
                .and_then(char::from_u32)
                .ok_or(ClassiCryptError::CharacterOutOfRange {
                    code: m,
                    modulus: private.n,
                })?;
            text.push(symbol);
            trace.push(PowerStep {
                mode: Mode::Decode,
                symbol,
                base: c,
                exponent: private.d,
                modulus: private.n,
                result: m,
            });
        }

        Ok(ModularOutput {
            codes: codes.to_vec(),
            text,
            trace,
        })
    }

    /// Signs every character of `text` as `m^d mod n`.
    ///
    /// The codes use the same transport format as encoding.
    ///
    /// # Errors
    /// Returns [`ClassiCryptError::CharacterOutOfRange`] for the first
    /// character whose code is not below `n`.
    ///
    /// # Examples
    ///
    /// ```
    /// use classicrypt::{KeyPair, ModularCodec};
    ///
    /// let kp = KeyPair::generate(61, 53, Some(17)).unwrap();
    /// let codec = ModularCodec::new(&kp);
    ///
    /// let signature = codec.sign("Hi!").unwrap().codes_string();
    /// assert!(codec.verify("Hi!", &signature).unwrap().valid);
    /// assert!(!codec.verify("Ho!", &signature).unwrap().valid);
    /// ```
    pub fn sign(&self, text: &str) -> Result<ModularOutput> {
        let private = self.keys.private();
        let mut codes = Vec::with_capacity(text.len());
        let mut trace = StepTrace::with_capacity(text.len());

        for symbol in text.chars() {
            let m = symbol as u64;
            if m >= private.n {
                return Err(ClassiCryptError::CharacterOutOfRange {
                    code: m,
                    modulus: private.n,
                });
            }
            let s = arith::mod_pow(m, private.d, private.n);
            codes.push(s);
            trace.push(PowerStep {
                mode: Mode::Sign,
                symbol,
                base: m,
                exponent: private.d,
                modulus: private.n,
                result: s,
            });
        }

        Ok(ModularOutput {
            codes,
            text: text.to_string(),
            trace,
        })
    }

    /// Checks `signature` against `message` by recovering `s^e mod n` for
    /// each signature integer.
    ///
    /// A signature that does not match yields `valid == false`; only
    /// unreadable input is an error.
    ///
    /// # Errors
    /// Returns [`ClassiCryptError::MalformedCiphertext`] if a token is not a
    /// non-negative integer or is not below `n`.
    pub fn verify(&self, message: &str, signature: &str) -> Result<Verification> {
        let public = self.keys.public();
        let codes = parse_codes(signature)?;
        let mut recovered = Vec::with_capacity(codes.len());
        let mut trace = StepTrace::with_capacity(codes.len());

        for &s in &codes {
            if s >= public.n {
                return Err(ClassiCryptError::MalformedCiphertext(format!(
                    "signature value {s} is not below the modulus {}",
                    public.n
                )));
            }
            let m = arith::mod_pow(s, public.e, public.n);
            let symbol = u32::try_from(m)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            recovered.push(m);
            trace.push(PowerStep {
                mode: Mode::Verify,
                symbol,
                base: s,
                exponent: public.e,
                modulus: public.n,
                result: m,
            });
        }

        let valid = recovered.len() == message.chars().count()
            && message.chars().zip(&recovered).all(|(c, &m)| c as u64 == m);

        Ok(Verification {
            valid,
            recovered,
            trace,
        })
    }
}

/// Splits the transport format into integers.
///
/// # Errors
/// Returns [`ClassiCryptError::MalformedCiphertext`] naming the first token
/// that is not a non-negative decimal integer.
pub fn parse_codes(ciphertext: &str) -> Result<Vec<u64>> {
    ciphertext
        .split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token.parse::<u64>().map_err(|_| {
                ClassiCryptError::MalformedCiphertext(format!(
                    "token {} ('{}') is not a non-negative integer",
                    i + 1,
                    token
                ))
            })
        })
        .collect()
}
