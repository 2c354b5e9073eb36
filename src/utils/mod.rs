//! Arithmetic and presentation utilities.

pub mod arith;
pub mod format;
