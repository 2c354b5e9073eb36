//! Command-line front end.

mod grid;
mod history;
mod modular;

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use classicrypt::config::Settings;
use classicrypt::session::{History, KeyMaterial};
use classicrypt::utils::format::Grouping;
use classicrypt::Mode;

#[derive(Parser)]
#[command(
    name = "classicrypt",
    version,
    about = "Step-traced classical ciphers: keyed-grid digraphs and textbook modular encryption"
)]
pub struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Append each operation to this JSON-lines history file
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    /// Also write the result to this file
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Print every intermediate step
    #[arg(long, global = true)]
    steps: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode or decode with the keyed-grid digraph cipher
    Grid {
        /// Grid key
        #[arg(long)]
        key: String,

        /// Grid order: 5 (letters, J=I) or 6 (letters and digits)
        #[arg(long)]
        order: Option<usize>,

        /// encode or decode
        #[arg(long)]
        mode: Mode,

        /// Filler inserted between repeated symbols and as padding
        #[arg(long)]
        filler: Option<char>,

        /// Filler used when the symbol to split is the filler itself
        #[arg(long)]
        alternate: Option<char>,

        /// After decoding, drop likely fillers from the symbol stream
        #[arg(long)]
        strip_fillers: bool,

        /// Regroup the output symbols: none, pairs, fives
        #[arg(long)]
        group: Option<Grouping>,

        /// Print the grid before the result
        #[arg(long)]
        show_grid: bool,

        /// Input text; read from stdin when omitted
        text: Option<String>,
    },

    /// Encode or decode with the modular (textbook RSA) cipher
    Modular {
        /// First prime
        #[arg(long, required_unless_present = "keys")]
        p: Option<u64>,

        /// Second prime
        #[arg(long, required_unless_present = "keys")]
        q: Option<u64>,

        /// Public exponent; the smallest valid one is chosen when omitted
        #[arg(long)]
        e: Option<u64>,

        /// Key pair file written by `keygen --save`
        #[arg(long, conflicts_with_all = ["p", "q", "e"])]
        keys: Option<PathBuf>,

        /// encode, decode, sign or verify
        #[arg(long)]
        mode: Mode,

        /// Signature codes to check the text against (verify mode)
        #[arg(long, required_if_eq("mode", "verify"))]
        signature: Option<String>,

        /// Plaintext, or whitespace-separated codes; stdin when omitted
        text: Option<String>,
    },

    /// Derive a key pair and show the computation
    Keygen {
        /// First prime
        #[arg(long, requires = "q", required_unless_present = "bits")]
        p: Option<u64>,

        /// Second prime
        #[arg(long, requires = "p")]
        q: Option<u64>,

        /// Draw both primes at random with this many bits (3 to 32)
        #[arg(long, conflicts_with_all = ["p", "q"])]
        bits: Option<u32>,

        #[arg(long)]
        e: Option<u64>,

        /// Save the key pair as JSON
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List entries of the history file
    History {
        /// Shorten inputs and outputs to this many characters
        #[arg(long, default_value_t = 50)]
        width: usize,
    },
}

/// Per-invocation state shared by the commands.
pub(crate) struct Invocation {
    settings: Settings,
    history: History,
    history_path: Option<PathBuf>,
    output: Option<PathBuf>,
    show_steps: bool,
}

impl Invocation {
    fn new(cli: &Cli) -> Result<Self> {
        let settings = Settings::load_or_default(cli.config.as_deref())
            .with_context(|| format!("cannot load settings from {:?}", cli.config))?;
        debug!(?settings, "settings loaded");
        let history_path = cli.history.clone().or_else(|| settings.history.clone());
        let show_steps = cli.steps || settings.show_steps;
        Ok(Invocation {
            settings,
            history: History::new(),
            history_path,
            output: cli.output.clone(),
            show_steps,
        })
    }

    /// Records the operation, appends it to the history file and writes the
    /// result file, when configured.
    fn finish(&mut self, mode: Mode, key: KeyMaterial, input: &str, result: &str) -> Result<()> {
        self.history.record(mode, key, input, result);

        if let Some(path) = &self.history_path {
            self.history
                .append_to_file(path)
                .with_context(|| format!("cannot append history to {}", path.display()))?;
        }
        if let Some(path) = &self.output {
            fs::write(path, result)
                .with_context(|| format!("cannot write result to {}", path.display()))?;
            info!(path = %path.display(), "result exported");
        }
        Ok(())
    }
}

/// Dispatches the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let mut ctx = Invocation::new(&cli)?;

    match cli.command {
        Commands::Grid {
            key,
            order,
            mode,
            filler,
            alternate,
            strip_fillers,
            group,
            show_grid,
            text,
        } => grid::run_grid(
            &mut ctx,
            grid::GridArgs {
                key,
                order,
                mode,
                filler,
                alternate,
                strip_fillers,
                group,
                show_grid,
                text,
            },
        ),
        Commands::Modular {
            p,
            q,
            e,
            keys,
            mode,
            signature,
            text,
        } => modular::run_modular(
            &mut ctx,
            modular::ModularArgs {
                p,
                q,
                e,
                keys,
                mode,
                signature,
                text,
            },
        ),
        Commands::Keygen {
            p,
            q,
            bits,
            e,
            save,
        } => modular::run_keygen(
            modular::KeygenArgs {
                p,
                q,
                bits,
                e,
            },
            save.as_deref(),
        ),
        Commands::History { width } => history::run_history(&ctx, width),
    }
}

/// Returns `text`, or all of stdin without its trailing newline.
fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read input from stdin")?;
            let trimmed = buf.trim_end_matches(['\n', '\r']).len();
            buf.truncate(trimmed);
            Ok(buf)
        }
    }
}
