//! Settings for the command-line front end.
//!
//! Loaded from an optional TOML file; every field has a default so an
//! empty or partial file is valid. Command-line flags override these.
//!
//! ```toml
//! order = 6
//! filler = "Z"
//! alternate_filler = "X"
//! grouping = "fives"
//! show_steps = true
//! history = "classicrypt-history.jsonl"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ClassiCryptError, Result};
use crate::grid::{Fillers, GridOrder};
use crate::utils::format::Grouping;

fn default_order() -> usize {
    5
}

fn default_filler() -> char {
    Fillers::default().primary()
}

fn default_alternate() -> char {
    Fillers::default().alternate()
}

/// Front-end settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Default grid order (5 or 6).
    #[serde(default = "default_order")]
    pub order: usize,
    #[serde(default = "default_filler")]
    pub filler: char,
    #[serde(default = "default_alternate")]
    pub alternate_filler: char,
    #[serde(default)]
    pub grouping: Grouping,
    /// Print the step trace after each result.
    #[serde(default)]
    pub show_steps: bool,
    /// JSON-lines file that receives one entry per operation.
    #[serde(default)]
    pub history: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            order: default_order(),
            filler: default_filler(),
            alternate_filler: default_alternate(),
            grouping: Grouping::default(),
            show_steps: false,
            history: None,
        }
    }
}

impl Settings {
    /// Parses TOML settings and checks the grid order.
    ///
    /// # Errors
    /// - [`ClassiCryptError::Serialization`] for invalid TOML or unknown keys.
    /// - [`ClassiCryptError::InvalidGridOrder`] for an order other than 5 or 6.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| ClassiCryptError::Serialization(e.to_string()))?;
        settings.grid_order()?;
        Ok(settings)
    }

    /// Reads settings from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn grid_order(&self) -> Result<GridOrder> {
        GridOrder::try_from(self.order)
    }

    pub fn fillers(&self) -> Fillers {
        Fillers::new(self.filler, self.alternate_filler)
    }
}
