//! Presentation helpers for cipher output.
//!
//! None of these are used by the engine itself; they shape results for
//! display and export.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::Fillers;

/// Regrouping applied to compact grid-cipher output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// Leave the text as produced.
    #[default]
    None,
    /// Blocks of two symbols (one per digraph).
    Pairs,
    /// Classic blocks of five symbols.
    Fives,
}

impl Grouping {
    /// Block width, or `None` when no regrouping is applied.
    pub fn width(self) -> Option<usize> {
        match self {
            Grouping::None => None,
            Grouping::Pairs => Some(2),
            Grouping::Fives => Some(5),
        }
    }

    /// Removes existing spaces and re-emits `text` in blocks.
    ///
    /// # Examples
    ///
    /// ```
    /// use classicrypt::utils::format::Grouping;
    ///
    /// assert_eq!(Grouping::Fives.apply("GATL MZCLRQXA"), "GATLM ZCLRQ XA");
    /// assert_eq!(Grouping::None.apply("AB CD"), "AB CD");
    /// ```
    pub fn apply(self, text: &str) -> String {
        let Some(width) = self.width() else {
            return text.to_string();
        };
        let compact: Vec<char> = text.chars().filter(|c| *c != ' ').collect();
        compact
            .chunks(width)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Grouping::None),
            "pairs" | "2" => Ok(Grouping::Pairs),
            "fives" | "5" => Ok(Grouping::Fives),
            other => Err(format!("unknown grouping '{other}' (none, pairs, fives)")),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grouping::None => "none",
            Grouping::Pairs => "pairs",
            Grouping::Fives => "fives",
        };
        f.write_str(name)
    }
}

/// Best-effort removal of fillers from a decoded symbol stream.
///
/// Drops a primary filler sitting between two equal symbols, an alternate
/// filler sitting between two primaries, and a trailing padding filler.
/// Genuine occurrences of the filler in the same positions are removed too,
/// so the result is a reading aid and not an inverse of encoding.
///
/// # Examples
///
/// ```
/// use classicrypt::grid::Fillers;
/// use classicrypt::utils::format::strip_fillers;
///
/// assert_eq!(strip_fillers("BALXLOON", Fillers::default()), "BALLOON");
/// assert_eq!(strip_fillers("HELXLOWORLDX", Fillers::default()), "HELLOWORLD");
/// ```
pub fn strip_fillers(symbols: &str, fillers: Fillers) -> String {
    let chars: Vec<char> = symbols.chars().collect();
    let mut kept = Vec::with_capacity(chars.len());

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && i + 1 < chars.len() && chars[i - 1] == chars[i + 1] {
            let separator = if chars[i - 1] == fillers.primary() {
                fillers.alternate()
            } else {
                fillers.primary()
            };
            if c == separator {
                continue;
            }
        }
        kept.push(c);
    }

    if let Some(&last) = kept.last() {
        let before = kept.len().checked_sub(2).map(|i| kept[i]);
        let padded = last == fillers.primary()
            || (last == fillers.alternate() && before == Some(fillers.primary()));
        if padded && chars.len() % 2 == 0 {
            kept.pop();
        }
    }

    kept.into_iter().collect()
}

/// Joins modular-cipher codes into the whitespace-separated transport form.
pub fn join_codes(codes: &[u64]) -> String {
    codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
