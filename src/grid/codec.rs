//! Digraph substitution against a [`Grid`].

use std::fmt;

use serde::Serialize;

use super::layout::Layout;
use super::pairing::{self, Digraph, FillerRole, PlacedFillers};
use super::{Cell, Fillers, Grid, Placed};
use crate::error::{ClassiCryptError, Result};
use crate::trace::{Mode, StepTrace, TraceStep};

/// Which substitution rule a digraph fell under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DigraphRule {
    /// Both symbols share a row: shift along the row.
    SameRow,
    /// Both symbols share a column: shift along the column.
    SameColumn,
    /// Opposite corners of a rectangle: swap columns.
    Rectangle,
}

impl fmt::Display for DigraphRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigraphRule::SameRow => f.write_str("same row"),
            DigraphRule::SameColumn => f.write_str("same column"),
            DigraphRule::Rectangle => f.write_str("rectangle"),
        }
    }
}

/// Trace record for one digraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigraphStep {
    pub mode: Mode,
    pub input: Digraph,
    pub rule: DigraphRule,
    pub output: [char; 2],
    pub output_cells: [Cell; 2],
}

impl TraceStep for DigraphStep {
    fn input_unit(&self) -> String {
        self.input.text()
    }

    fn detail(&self) -> String {
        let direction = match (self.rule, self.mode) {
            (DigraphRule::SameRow, Mode::Decode) => " → left",
            (DigraphRule::SameRow, _) => " → right",
            (DigraphRule::SameColumn, Mode::Decode) => " → up",
            (DigraphRule::SameColumn, _) => " → down",
            (DigraphRule::Rectangle, _) => " → opposite corners",
        };
        let filler = match self.input.filler {
            Some(FillerRole::Separator) => " [separator filler]",
            Some(FillerRole::Padding) => " [padding filler]",
            None => "",
        };
        format!(
            "{} {} {}{}{}",
            self.input.first.cell, self.input.second.cell, self.rule, direction, filler
        )
    }

    fn output_unit(&self) -> String {
        self.output.iter().collect()
    }
}

impl fmt::Display for DigraphStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} => {}",
            self.input_unit(),
            self.detail(),
            self.output_unit()
        )
    }
}

/// Result of a grid encode or decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridOutput {
    /// Output with passthrough characters at their original offsets.
    pub text: String,
    /// Output symbols only.
    pub symbols: String,
    /// The digraph stream that was substituted, space separated.
    pub prepared: String,
    pub trace: StepTrace<DigraphStep>,
}

/// Encoder/decoder bound to one grid.
///
/// # Examples
///
/// ```
/// use classicrypt::{Grid, GridCodec, GridOrder};
///
/// let grid = Grid::build("PLAYFAIR", GridOrder::Five);
/// let codec = GridCodec::new(&grid);
///
/// let encoded = codec.encode("hide the gold now");
/// let decoded = codec.decode(&encoded.text).unwrap();
/// assert_eq!(decoded.text, "HIDE THE GOLD NOW");
/// ```
#[derive(Debug, Clone)]
pub struct GridCodec<'g> {
    grid: &'g Grid,
    fillers: Fillers,
    placed: PlacedFillers,
}

impl<'g> GridCodec<'g> {
    /// Creates a codec with the default `X`/`Q` fillers.
    pub fn new(grid: &'g Grid) -> Self {
        let fillers = Fillers::default();
        // X and Q are symbols of both alphabets, so every grid has them.
        let place = |symbol: char| Placed {
            symbol,
            cell: grid.positions().get(symbol).unwrap_or_default(),
        };
        GridCodec {
            grid,
            fillers,
            placed: PlacedFillers {
                primary: place(fillers.primary()),
                alternate: place(fillers.alternate()),
            },
        }
    }

    /// Creates a codec with custom fillers.
    ///
    /// # Errors
    /// Returns [`ClassiCryptError::InvalidFiller`] when a filler is not a
    /// symbol of `grid` as written (e.g. `J` on an order-5 grid), or when
    /// both fillers are the same symbol.
    pub fn with_fillers(grid: &'g Grid, fillers: Fillers) -> Result<Self> {
        let place = |c: char| {
            grid.locate(c)
                .filter(|p| p.symbol == c)
                .ok_or(ClassiCryptError::InvalidFiller(c))
        };
        let primary = place(fillers.primary())?;
        let alternate = place(fillers.alternate())?;
        if primary.symbol == alternate.symbol {
            return Err(ClassiCryptError::InvalidFiller(alternate.symbol));
        }
        Ok(GridCodec {
            grid,
            fillers,
            placed: PlacedFillers { primary, alternate },
        })
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn fillers(&self) -> Fillers {
        self.fillers
    }

    /// Encodes `text`, inserting fillers for repeated pairs and odd length.
    ///
    /// Never fails: characters without a grid symbol pass through.
    pub fn encode(&self, text: &str) -> GridOutput {
        let layout = Layout::scan(text, self.grid);
        let pairs = pairing::pair_for_encoding(layout.symbols(), self.placed);
        self.run(&layout, &pairs, Mode::Encode)
    }

    /// Decodes `text` digraph by digraph; fillers are left in place.
    ///
    /// # Errors
    /// Returns [`ClassiCryptError::MalformedCiphertext`] when the number of
    /// grid symbols is odd.
    pub fn decode(&self, text: &str) -> Result<GridOutput> {
        let layout = Layout::scan(text, self.grid);
        let pairs = pairing::pair_for_decoding(layout.symbols())?;
        Ok(self.run(&layout, &pairs, Mode::Decode))
    }

    fn run(&self, layout: &Layout, pairs: &[Digraph], mode: Mode) -> GridOutput {
        let mut trace = StepTrace::with_capacity(pairs.len());
        let mut output = Vec::with_capacity(pairs.len() * 2);

        for digraph in pairs {
            let step = self.substitute(*digraph, mode);
            output.extend_from_slice(&step.output);
            trace.push(step);
        }

        GridOutput {
            text: layout.reassemble(&output),
            symbols: output.iter().collect(),
            prepared: pairs.iter().map(Digraph::text).collect::<Vec<_>>().join(" "),
            trace,
        }
    }

    /// Applies the row, column or rectangle rule to one digraph.
    fn substitute(&self, digraph: Digraph, mode: Mode) -> DigraphStep {
        let side = self.grid.side();
        let step = |i: usize| match mode {
            Mode::Decode => (i + side - 1) % side,
            _ => (i + 1) % side,
        };
        let a = digraph.first.cell;
        let b = digraph.second.cell;

        let (rule, out_a, out_b) = if a.row == b.row {
            (
                DigraphRule::SameRow,
                Cell {
                    row: a.row,
                    col: step(a.col),
                },
                Cell {
                    row: b.row,
                    col: step(b.col),
                },
            )
        } else if a.col == b.col {
            (
                DigraphRule::SameColumn,
                Cell {
                    row: step(a.row),
                    col: a.col,
                },
                Cell {
                    row: step(b.row),
                    col: b.col,
                },
            )
        } else {
            (
                DigraphRule::Rectangle,
                Cell {
                    row: a.row,
                    col: b.col,
                },
                Cell {
                    row: b.row,
                    col: a.col,
                },
            )
        };

        DigraphStep {
            mode,
            input: digraph,
            rule,
            output: [self.grid.symbol_in(out_a), self.grid.symbol_in(out_b)],
            output_cells: [out_a, out_b],
        }
    }
}
