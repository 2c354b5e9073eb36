//! Append-only history of cipher operations.
//!
//! A [`History`] is owned by whoever hosts a session and passed by `&mut`
//! into it; entries are immutable snapshots and can only be appended.
//! Export uses JSON lines, one entry per line.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClassiCryptError, Result};
use crate::grid::GridOrder;
use crate::modular::KeyPair;
use crate::trace::Mode;

/// Key material an entry was produced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cipher", rename_all = "lowercase")]
pub enum KeyMaterial {
    Grid { key: String, order: usize },
    Modular { n: u64, e: u64, d: u64 },
}

impl KeyMaterial {
    pub fn grid(key: &str, order: GridOrder) -> Self {
        KeyMaterial::Grid {
            key: key.to_string(),
            order: order.side(),
        }
    }

    pub fn modular(keys: &KeyPair) -> Self {
        KeyMaterial::Modular {
            n: keys.n(),
            e: keys.e(),
            d: keys.d(),
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> String {
        match self {
            KeyMaterial::Grid { key, order } => format!("grid {order}x{order} key={key}"),
            KeyMaterial::Modular { n, e, d } => format!("modular n={n} e={e} d={d}"),
        }
    }
}

/// One immutable history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub mode: Mode,
    pub key: KeyMaterial,
    pub input: String,
    pub output: String,
}

impl HistoryEntry {
    /// One-line summary with long texts shortened to `width` characters.
    pub fn summary(&self, width: usize) -> String {
        format!(
            "{} {} [{}] {} => {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.mode,
            self.key.label(),
            preview(&self.input, width),
            preview(&self.output, width)
        )
    }
}

/// Truncates `text` to `width` characters, marking the cut with `...`.
pub fn preview(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let head: String = text.chars().take(width).collect();
        format!("{head}...")
    }
}

/// Append-only log of [`HistoryEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Number of leading entries already written to the history file.
    persisted: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry stamped with the current time.
    pub fn record(
        &mut self,
        mode: Mode,
        key: KeyMaterial,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> &HistoryEntry {
        self.record_at(Utc::now(), mode, key, input, output)
    }

    /// Appends an entry with an explicit timestamp.
    pub fn record_at(
        &mut self,
        timestamp: DateTime<Utc>,
        mode: Mode,
        key: KeyMaterial,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> &HistoryEntry {
        let index = self.entries.len();
        self.entries.push(HistoryEntry {
            timestamp,
            mode,
            key,
            input: input.into(),
            output: output.into(),
        });
        debug!(entry = index, "history entry recorded");
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in recording order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Writes every entry as one JSON object per line.
    pub fn export_jsonl<W: Write>(&self, writer: W) -> Result<()> {
        write_jsonl(&self.entries, writer)
    }

    /// Entries recorded since the last [`append_to_file`](Self::append_to_file).
    pub fn pending(&self) -> &[HistoryEntry] {
        &self.entries[self.persisted..]
    }

    /// Appends the entries not yet written to the JSON-lines file at `path`,
    /// creating it. Calling it again without new records writes nothing.
    pub fn append_to_file(&mut self, path: &Path) -> Result<()> {
        let pending = self.pending();
        if pending.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        write_jsonl(pending, file)?;
        debug!(path = %path.display(), entries = pending.len(), "history appended");
        self.persisted = self.entries.len();
        Ok(())
    }

    /// Reads a JSON-lines history file. A missing file is an empty history.
    ///
    /// # Errors
    /// Returns [`ClassiCryptError::Serialization`] naming the first line
    /// that is not a valid entry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let reader = BufReader::new(fs::File::open(path)?);
        let mut entries = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                ClassiCryptError::Serialization(format!("history line {}: {e}", i + 1))
            })?;
            entries.push(entry);
        }
        let persisted = entries.len();
        Ok(History { entries, persisted })
    }
}

fn write_jsonl<W: Write>(entries: &[HistoryEntry], mut writer: W) -> Result<()> {
    for entry in entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
