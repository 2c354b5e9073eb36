//! Separation of grid symbols from passthrough characters.
//!
//! Whitespace, punctuation and any character with no grid symbol keep their
//! exact offsets: the cipher only sees the symbol stream, and reassembly
//! writes output symbols back into the symbol slots in order.

use super::{Grid, Placed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Symbol,
    Passthrough(char),
}

/// Input text split into symbol slots and verbatim characters.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    slots: Vec<Slot>,
    symbols: Vec<Placed>,
}

impl Layout {
    /// Scans `text` left to right against `grid`.
    pub(crate) fn scan(text: &str, grid: &Grid) -> Self {
        let mut slots = Vec::with_capacity(text.len());
        let mut symbols = Vec::with_capacity(text.len());
        for c in text.chars() {
            match grid.locate(c) {
                Some(placed) => {
                    slots.push(Slot::Symbol);
                    symbols.push(placed);
                }
                None => slots.push(Slot::Passthrough(c)),
            }
        }
        Layout { slots, symbols }
    }

    /// Grid symbols in input order.
    pub(crate) fn symbols(&self) -> &[Placed] {
        &self.symbols
    }

    /// Writes `output` into the symbol slots, keeping passthrough characters
    /// in place. Output symbols beyond the number of slots are appended.
    pub(crate) fn reassemble(&self, output: &[char]) -> String {
        let mut result = String::with_capacity(self.slots.len() + output.len());
        let mut produced = output.iter();
        for slot in &self.slots {
            match slot {
                Slot::Symbol => {
                    if let Some(&c) = produced.next() {
                        result.push(c);
                    }
                }
                Slot::Passthrough(c) => result.push(*c),
            }
        }
        result.extend(produced);
        result
    }
}
