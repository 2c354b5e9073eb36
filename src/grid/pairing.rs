//! Digraph segmentation of a symbol stream.
//!
//! Encoding walks the stream with an explicit state machine:
//!
//! ```text
//! EmitPair      next two symbols differ      -> emit (a, b), advance 2
//! InsertFiller  next two symbols are equal   -> emit (a, filler(a)), advance 1
//! PadEnd        one symbol left              -> emit (a, filler(a)), advance 1
//! Done          stream exhausted
//! ```
//!
//! Decoding never inserts fillers; the stream must already be paired.

use serde::Serialize;

use super::Placed;
use crate::error::{ClassiCryptError, Result};

/// Why the second symbol of a digraph was synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FillerRole {
    /// Split a pair of identical symbols.
    Separator,
    /// Completed an odd-length stream.
    Padding,
}

/// Ordered pair of grid symbols transformed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Digraph {
    pub first: Placed,
    pub second: Placed,
    /// Set when `second` is a filler inserted during encoding.
    pub filler: Option<FillerRole>,
}

impl Digraph {
    /// The two symbols as a two-character string.
    pub fn text(&self) -> String {
        [self.first.symbol, self.second.symbol].iter().collect()
    }
}

/// Filler symbols already located in the grid.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlacedFillers {
    pub(crate) primary: Placed,
    pub(crate) alternate: Placed,
}

impl PlacedFillers {
    /// Filler to pair with `symbol`; never equal to it.
    fn for_symbol(&self, symbol: Placed) -> Placed {
        if symbol.symbol == self.primary.symbol {
            self.alternate
        } else {
            self.primary
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairState {
    EmitPair,
    InsertFiller,
    PadEnd,
    Done,
}

impl PairState {
    fn at(stream: &[Placed], pos: usize) -> Self {
        match stream.len() - pos {
            0 => PairState::Done,
            1 => PairState::PadEnd,
            _ if stream[pos].symbol == stream[pos + 1].symbol => PairState::InsertFiller,
            _ => PairState::EmitPair,
        }
    }
}

/// Segments `stream` into digraphs, inserting fillers as needed.
pub(crate) fn pair_for_encoding(stream: &[Placed], fillers: PlacedFillers) -> Vec<Digraph> {
    let mut pairs = Vec::with_capacity(stream.len() / 2 + 1);
    let mut pos = 0usize;

    loop {
        match PairState::at(stream, pos) {
            PairState::EmitPair => {
                pairs.push(Digraph {
                    first: stream[pos],
                    second: stream[pos + 1],
                    filler: None,
                });
                pos += 2;
            }
            PairState::InsertFiller => {
                let a = stream[pos];
                pairs.push(Digraph {
                    first: a,
                    second: fillers.for_symbol(a),
                    filler: Some(FillerRole::Separator),
                });
                pos += 1;
            }
            PairState::PadEnd => {
                let a = stream[pos];
                pairs.push(Digraph {
                    first: a,
                    second: fillers.for_symbol(a),
                    filler: Some(FillerRole::Padding),
                });
                pos += 1;
            }
            PairState::Done => break,
        }
    }

    pairs
}

/// Splits an already-paired ciphertext stream.
///
/// # Errors
/// Returns [`ClassiCryptError::MalformedCiphertext`] for an odd symbol count.
pub(crate) fn pair_for_decoding(stream: &[Placed]) -> Result<Vec<Digraph>> {
    if stream.len() % 2 != 0 {
        return Err(ClassiCryptError::MalformedCiphertext(format!(
            "grid ciphertext has an odd number of symbols ({})",
            stream.len()
        )));
    }
    Ok(stream
        .chunks_exact(2)
        .map(|pair| Digraph {
            first: pair[0],
            second: pair[1],
            filler: None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, GridOrder};

    fn stream(grid: &Grid, text: &str) -> Vec<Placed> {
        text.chars().filter_map(|c| grid.locate(c)).collect()
    }

    fn fillers(grid: &Grid) -> PlacedFillers {
        PlacedFillers {
            primary: grid.locate('X').unwrap(),
            alternate: grid.locate('Q').unwrap(),
        }
    }

    fn texts(pairs: &[Digraph]) -> Vec<String> {
        pairs.iter().map(Digraph::text).collect()
    }

    #[test]
    fn test_balloon_separator() {
        let grid = Grid::build("", GridOrder::Five);
        let pairs = pair_for_encoding(&stream(&grid, "BALLOON"), fillers(&grid));
        assert_eq!(texts(&pairs), ["BA", "LX", "LO", "ON"]);
        assert_eq!(pairs[1].filler, Some(FillerRole::Separator));
        assert!(pairs.iter().filter(|p| p.filler.is_some()).count() == 1);
    }

    #[test]
    fn test_odd_tail_padding() {
        let grid = Grid::build("", GridOrder::Five);
        let pairs = pair_for_encoding(&stream(&grid, "ABC"), fillers(&grid));
        assert_eq!(texts(&pairs), ["AB", "CX"]);
        assert_eq!(pairs[1].filler, Some(FillerRole::Padding));
    }

    #[test]
    fn test_repeated_primary_uses_alternate() {
        let grid = Grid::build("", GridOrder::Five);
        let pairs = pair_for_encoding(&stream(&grid, "XX"), fillers(&grid));
        assert_eq!(texts(&pairs), ["XQ", "XQ"]);
        assert_eq!(pairs[0].filler, Some(FillerRole::Separator));
        assert_eq!(pairs[1].filler, Some(FillerRole::Padding));
    }

    #[test]
    fn test_triple_letters() {
        let grid = Grid::build("", GridOrder::Five);
        let pairs = pair_for_encoding(&stream(&grid, "EEE"), fillers(&grid));
        assert_eq!(texts(&pairs), ["EX", "EX", "EX"]);
    }

    #[test]
    fn test_empty_stream() {
        let grid = Grid::build("", GridOrder::Five);
        assert!(pair_for_encoding(&[], fillers(&grid)).is_empty());
        assert!(pair_for_decoding(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decoding_rejects_odd_stream() {
        let grid = Grid::build("", GridOrder::Five);
        let result = pair_for_decoding(&stream(&grid, "ABC"));
        assert!(matches!(
            result,
            Err(ClassiCryptError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn test_decoding_keeps_identical_pairs() {
        let grid = Grid::build("", GridOrder::Five);
        let pairs = pair_for_decoding(&stream(&grid, "AABB")).unwrap();
        assert_eq!(texts(&pairs), ["AA", "BB"]);
    }
}
