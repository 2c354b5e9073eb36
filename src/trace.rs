//! Step traces recorded alongside every cipher result.
//!
//! A trace is display data: the engine writes it once and never reads it
//! back. Each step exposes the unit it consumed, the intermediate values,
//! and the unit it produced through [`TraceStep`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of a traced operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Encode,
    Decode,
    /// Raise each character code to the private exponent.
    Sign,
    /// Recover character codes from a signature with the public exponent.
    Verify,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Encode => f.write_str("encode"),
            Mode::Decode => f.write_str("decode"),
            Mode::Sign => f.write_str("sign"),
            Mode::Verify => f.write_str("verify"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encode" | "encrypt" => Ok(Mode::Encode),
            "decode" | "decrypt" => Ok(Mode::Decode),
            "sign" => Ok(Mode::Sign),
            "verify" => Ok(Mode::Verify),
            other => Err(format!(
                "unknown mode '{other}' (encode, decode, sign, verify)"
            )),
        }
    }
}

/// A single per-unit record in a [`StepTrace`].
pub trait TraceStep: fmt::Display {
    /// The unit consumed by this step (a digraph, a character, a token).
    fn input_unit(&self) -> String;

    /// Human-readable intermediate values (positions and rule, or the
    /// exponentiation formula).
    fn detail(&self) -> String;

    /// The unit produced by this step.
    fn output_unit(&self) -> String;
}

/// Ordered sequence of steps, one per processed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepTrace<S> {
    steps: Vec<S>,
}

impl<S> Default for StepTrace<S> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<S> StepTrace<S> {
    /// Creates an empty trace with room for `capacity` steps.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, step: S) {
        self.steps.push(step);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates steps in the order they were produced.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.steps.iter()
    }

    /// Borrows the steps as a slice.
    pub fn steps(&self) -> &[S] {
        &self.steps
    }
}

impl<S: TraceStep> StepTrace<S> {
    /// Renders the trace as numbered lines, one per step.
    ///
    /// # Examples
    ///
    /// ```
    /// use classicrypt::{build_grid, grid_encode, GridOrder};
    ///
    /// let grid = build_grid("PLAYFAIR", GridOrder::Five);
    /// let out = grid_encode(&grid, "HIDE");
    /// let rendered = out.trace.render();
    /// assert_eq!(rendered.lines().count(), 2);
    /// assert!(rendered.starts_with("1. HI"));
    /// ```
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a, S> IntoIterator for &'a StepTrace<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(char);

    impl TraceStep for Echo {
        fn input_unit(&self) -> String {
            self.0.to_string()
        }

        fn detail(&self) -> String {
            "unchanged".to_string()
        }

        fn output_unit(&self) -> String {
            self.0.to_string()
        }
    }

    impl fmt::Display for Echo {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(
                f,
                "{} {} {}",
                self.input_unit(),
                self.detail(),
                self.output_unit()
            )
        }
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("encode".parse::<Mode>().unwrap(), Mode::Encode);
        assert_eq!("DECRYPT".parse::<Mode>().unwrap(), Mode::Decode);
        assert_eq!("Sign".parse::<Mode>().unwrap(), Mode::Sign);
        assert_eq!("verify".parse::<Mode>().unwrap(), Mode::Verify);
        assert!("sideways".parse::<Mode>().is_err());
        assert_eq!(Mode::Decode.to_string(), "decode");
        assert_eq!(Mode::Verify.to_string(), "verify");
    }

    #[test]
    fn test_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Encode).unwrap(), "\"encode\"");
        let mode: Mode = serde_json::from_str("\"decode\"").unwrap();
        assert_eq!(mode, Mode::Decode);
        assert_eq!(serde_json::to_string(&Mode::Sign).unwrap(), "\"sign\"");
    }

    #[test]
    fn test_push_keeps_order() {
        let mut trace = StepTrace::default();
        assert!(trace.is_empty());
        trace.push(Echo('A'));
        trace.push(Echo('B'));
        assert_eq!(trace.len(), 2);
        let units: String = trace.iter().map(|s| s.0).collect();
        assert_eq!(units, "AB");
    }

    #[test]
    fn test_render_numbers_lines() {
        let mut trace = StepTrace::with_capacity(2);
        trace.push(Echo('A'));
        trace.push(Echo('B'));
        assert_eq!(trace.render(), "1. A unchanged A\n2. B unchanged B");
        assert_eq!(StepTrace::<Echo>::default().render(), "");
    }
}
