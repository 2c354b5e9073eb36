//! Step-traced classical ciphers.
//!
//! classicrypt implements two textbook schemes and records every
//! intermediate step so the computation can be shown to a learner:
//!
//! - a **grid cipher**: digraph substitution over a keyed 5x5 or 6x6 grid
//!   (Playfair rules), and
//! - a **modular cipher**: per-character exponentiation with a key pair
//!   derived from two small primes (textbook RSA).
//!
//! Neither scheme is secure. Both are deterministic and pure: every call
//! returns its result together with a [`StepTrace`], and nothing is logged
//! or written by the engine itself.
//!
//! # Architecture
//!
//! ```text
//! Grid::build      (key, order)   -> Grid + PositionIndex
//!     ↓
//! GridCodec        encode/decode  -> GridOutput { text, trace }
//!
//! KeyPair::generate (p, q, e?)    -> KeyPair { n, phi, e, d }
//! KeyPair::random  (bits, e?)
//!     ↓
//! ModularCodec     encode/decode  -> ModularOutput { codes, text, trace }
//!                  sign           -> ModularOutput
//!                  verify         -> Verification { valid, recovered, trace }
//! ```
//!
//! # Examples
//!
//! Grid cipher round trip:
//!
//! ```
//! use classicrypt::{build_grid, grid_decode, grid_encode, GridOrder};
//!
//! let grid = build_grid("MONARCHY", GridOrder::Five);
//! let encoded = grid_encode(&grid, "INSTRUMENTS");
//! assert_eq!(encoded.text, "GATLMZCLRQXA");
//!
//! let decoded = grid_decode(&grid, &encoded.text).unwrap();
//! assert_eq!(decoded.text, "INSTRUMENTSX");
//! ```
//!
//! Modular cipher round trip:
//!
//! ```
//! use classicrypt::{generate_keypair, modular_decode, modular_encode};
//!
//! let keys = generate_keypair(17, 11, Some(7)).unwrap();
//! assert_eq!(keys.d(), 23);
//!
//! let encoded = modular_encode(&keys, "X").unwrap();
//! assert_eq!(encoded.codes_string(), "11");
//!
//! let decoded = modular_decode(&keys, "11").unwrap();
//! assert_eq!(decoded.text, "X");
//! ```

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod grid;
pub mod modular;
pub mod session;
pub mod trace;
pub mod utils;

pub use error::{ClassiCryptError, Result};
pub use grid::{Fillers, Grid, GridCodec, GridOrder, GridOutput};
pub use modular::{KeyPair, ModularCodec, ModularOutput, Verification};
pub use trace::{Mode, StepTrace, TraceStep};

/// Builds the grid for `key` at the given order.
pub fn build_grid(key: &str, order: GridOrder) -> Grid {
    Grid::build(key, order)
}

/// Encodes `text` with the default `X`/`Q` fillers.
pub fn grid_encode(grid: &Grid, text: &str) -> GridOutput {
    GridCodec::new(grid).encode(text)
}

/// Decodes `text`; fails on an odd number of grid symbols.
pub fn grid_decode(grid: &Grid, text: &str) -> Result<GridOutput> {
    GridCodec::new(grid).decode(text)
}

/// Derives a key pair from two distinct primes and an optional exponent.
pub fn generate_keypair(p: u64, q: u64, e: Option<u64>) -> Result<KeyPair> {
    KeyPair::generate(p, q, e)
}

/// Encodes each character of `text` as `m^e mod n`.
pub fn modular_encode(keys: &KeyPair, text: &str) -> Result<ModularOutput> {
    ModularCodec::new(keys).encode(text)
}

/// Decodes whitespace-separated codes with `c^d mod n`.
pub fn modular_decode(keys: &KeyPair, ciphertext: &str) -> Result<ModularOutput> {
    ModularCodec::new(keys).decode(ciphertext)
}

/// Signs each character of `text` as `m^d mod n`.
pub fn modular_sign(keys: &KeyPair, text: &str) -> Result<ModularOutput> {
    ModularCodec::new(keys).sign(text)
}

/// Checks a whitespace-separated signature against `message`.
pub fn modular_verify(keys: &KeyPair, message: &str, signature: &str) -> Result<Verification> {
    ModularCodec::new(keys).verify(message, signature)
}
