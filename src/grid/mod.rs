//! Keyed square grid for the digraph-substitution cipher.
//!
//! A [`Grid`] holds 25 (order 5) or 36 (order 6) distinct symbols laid out
//! row-major. Cells live in a fixed-size array and are addressed by
//! [`Cell`]; a [`PositionIndex`] maps each symbol back to its cell, so both
//! directions are O(1) and nothing is resized after construction.

mod codec;
mod layout;
mod pairing;

pub use codec::{DigraphRule, DigraphStep, GridCodec, GridOutput};
pub use pairing::{Digraph, FillerRole};

use std::fmt;

use crate::error::{ClassiCryptError, Result};

/// Largest grid supported (6 x 6).
pub const MAX_CELLS: usize = 36;

/// Order-5 alphabet: `J` is folded into `I`.
const ALPHABET_FIVE: &[u8; 25] = b"ABCDEFGHIKLMNOPQRSTUVWXYZ";

/// Order-6 alphabet: letters then digits.
const ALPHABET_SIX: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Side length of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridOrder {
    /// 5 x 5, letters only with `J` merged into `I`.
    Five,
    /// 6 x 6, letters and digits.
    Six,
}

impl GridOrder {
    /// Number of rows (and columns).
    pub fn side(self) -> usize {
        match self {
            GridOrder::Five => 5,
            GridOrder::Six => 6,
        }
    }

    /// Number of cells, `side²`.
    pub fn cells(self) -> usize {
        self.side() * self.side()
    }

    fn alphabet(self) -> &'static [u8] {
        match self {
            GridOrder::Five => ALPHABET_FIVE,
            GridOrder::Six => ALPHABET_SIX,
        }
    }

    /// Maps an input character to the grid symbol it stands for.
    ///
    /// Letters are uppercased; for order 5 `J` becomes `I` and digits are
    /// rejected. Anything else returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use classicrypt::GridOrder;
    ///
    /// assert_eq!(GridOrder::Five.normalize('j'), Some('I'));
    /// assert_eq!(GridOrder::Five.normalize('7'), None);
    /// assert_eq!(GridOrder::Six.normalize('7'), Some('7'));
    /// assert_eq!(GridOrder::Six.normalize('-'), None);
    /// ```
    pub fn normalize(self, c: char) -> Option<char> {
        let upper = c.to_ascii_uppercase();
        match self {
            GridOrder::Five if upper == 'J' => Some('I'),
            GridOrder::Five if upper.is_ascii_uppercase() => Some(upper),
            GridOrder::Six if upper.is_ascii_uppercase() || upper.is_ascii_digit() => Some(upper),
            _ => None,
        }
    }
}

impl TryFrom<usize> for GridOrder {
    type Error = ClassiCryptError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            5 => Ok(GridOrder::Five),
            6 => Ok(GridOrder::Six),
            other => Err(ClassiCryptError::InvalidGridOrder(other)),
        }
    }
}

impl fmt::Display for GridOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.side())
    }
}

/// Row/column coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A grid symbol together with the cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Placed {
    pub symbol: char,
    pub cell: Cell,
}

/// Slot of a symbol in the position index: `A..Z` → 0..25, `0..9` → 26..35.
fn symbol_slot(symbol: char) -> Option<usize> {
    match symbol {
        'A'..='Z' => Some(symbol as usize - 'A' as usize),
        '0'..='9' => Some(26 + symbol as usize - '0' as usize),
        _ => None,
    }
}

/// Symbol → cell lookup table derived from a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionIndex {
    slots: [Option<Cell>; MAX_CELLS],
}

impl PositionIndex {
    fn empty() -> Self {
        PositionIndex {
            slots: [None; MAX_CELLS],
        }
    }

    fn insert(&mut self, symbol: char, cell: Cell) {
        if let Some(slot) = symbol_slot(symbol) {
            self.slots[slot] = Some(cell);
        }
    }

    /// Cell of `symbol`, if it is placed in the grid.
    pub fn get(&self, symbol: char) -> Option<Cell> {
        symbol_slot(symbol).and_then(|slot| self.slots[slot])
    }

    /// Whether `symbol` is placed in the grid.
    pub fn contains(&self, symbol: char) -> bool {
        self.get(symbol).is_some()
    }
}

/// Immutable keyed grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    order: GridOrder,
    cells: [u8; MAX_CELLS],
    index: PositionIndex,
}

impl Grid {
    /// Builds the grid for `key`.
    ///
    /// The normalized key is placed row-major with repeats skipped, then the
    /// rest of the alphabet fills the remaining cells in natural order. Key
    /// characters that are not grid symbols are ignored, so every key
    /// (including the empty string) yields a complete grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use classicrypt::{Grid, GridOrder};
    ///
    /// let grid = Grid::build("MONARCHY", GridOrder::Five);
    /// assert_eq!(grid.row(0).as_deref(), Some("MONAR"));
    /// assert_eq!(grid.row(1).as_deref(), Some("CHYBD"));
    /// assert_eq!(grid.row(4).as_deref(), Some("UVWXZ"));
    /// ```
    pub fn build(key: &str, order: GridOrder) -> Self {
        let mut cells = [0u8; MAX_CELLS];
        let mut index = PositionIndex::empty();
        let side = order.side();
        let mut placed = 0usize;

        let candidates = key
            .chars()
            .filter_map(|c| order.normalize(c))
            .chain(order.alphabet().iter().map(|&b| b as char));

        for symbol in candidates {
            if placed == order.cells() {
                break;
            }
            if index.contains(symbol) {
                continue;
            }
            let cell = Cell {
                row: placed / side,
                col: placed % side,
            };
            cells[placed] = symbol as u8;
            index.insert(symbol, cell);
            placed += 1;
        }

        Grid {
            order,
            cells,
            index,
        }
    }

    pub fn order(&self) -> GridOrder {
        self.order
    }

    pub fn side(&self) -> usize {
        self.order.side()
    }

    /// Symbol at `(row, col)`, or `None` outside the grid.
    pub fn symbol_at(&self, row: usize, col: usize) -> Option<char> {
        let side = self.side();
        (row < side && col < side).then(|| self.symbol_in(Cell { row, col }))
    }

    /// Symbol stored in a cell known to be inside the grid.
    pub(crate) fn symbol_in(&self, cell: Cell) -> char {
        self.cells[cell.row * self.side() + cell.col] as char
    }

    /// Cell holding `c` after normalization, if `c` maps to a grid symbol.
    pub fn position_of(&self, c: char) -> Option<Cell> {
        self.order.normalize(c).and_then(|s| self.index.get(s))
    }

    /// Whether `c` maps to a symbol of this grid.
    pub fn contains(&self, c: char) -> bool {
        self.position_of(c).is_some()
    }

    /// Normalizes `c` and pairs it with its cell.
    pub fn locate(&self, c: char) -> Option<Placed> {
        let symbol = self.order.normalize(c)?;
        self.index.get(symbol).map(|cell| Placed { symbol, cell })
    }

    pub fn positions(&self) -> &PositionIndex {
        &self.index
    }

    /// Row `r` as a string of symbols, or `None` outside the grid.
    pub fn row(&self, r: usize) -> Option<String> {
        (r < self.side()).then(|| self.row_in(r))
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.side()).map(|r| self.row_in(r))
    }

    fn row_in(&self, r: usize) -> String {
        let side = self.side();
        self.cells[r * side..(r + 1) * side]
            .iter()
            .map(|&b| b as char)
            .collect()
    }

    /// All symbols in row-major order.
    pub fn symbols(&self) -> String {
        self.cells[..self.order.cells()]
            .iter()
            .map(|&b| b as char)
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let spaced: Vec<String> = row.chars().map(String::from).collect();
            write!(f, "{}", spaced.join(" "))?;
        }
        Ok(())
    }
}

/// Symbols used to split repeated pairs and pad odd streams.
///
/// The alternate is used whenever the symbol being split or padded is the
/// primary itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fillers {
    primary: char,
    alternate: char,
}

impl Default for Fillers {
    fn default() -> Self {
        Fillers {
            primary: 'X',
            alternate: 'Q',
        }
    }
}

impl Fillers {
    /// Creates a filler pair; letters are uppercased. Validity against a
    /// particular grid is checked by [`GridCodec::with_fillers`].
    pub fn new(primary: char, alternate: char) -> Self {
        Fillers {
            primary: primary.to_ascii_uppercase(),
            alternate: alternate.to_ascii_uppercase(),
        }
    }

    pub fn primary(&self) -> char {
        self.primary
    }

    pub fn alternate(&self) -> char {
        self.alternate
    }
}
