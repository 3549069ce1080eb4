//! Gray-coded placement of minterms on the Karnaugh map grid

use crate::error::KmapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest variable count that can be laid out on a grid
pub const MIN_GRID_VARIABLES: u32 = 2;
/// Largest variable count that can be laid out on a grid
pub const MAX_GRID_VARIABLES: u32 = 4;

/// Variable names in declaration order; `A` is the most significant bit
pub const VARIABLE_NAMES: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// A grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Reflected binary code of `i`
#[inline]
pub fn gray_encode(i: u32) -> u32 {
    i ^ (i >> 1)
}

/// Position of `g` in the reflected binary sequence
#[inline]
pub fn gray_decode(mut g: u32) -> u32 {
    let mut i = g;
    while g > 1 {
        g >>= 1;
        i ^= g;
    }
    i
}

/// Grid dimensions and the bit split between row and column variables.
///
/// The high `row_bits` of a minterm select the row, the low `col_bits` the
/// column. Both halves are Gray coded, so for two variables the order
/// `[0, 1]` is the identity and for four it is `[00, 01, 11, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    num_vars: u32,
    row_bits: u32,
    col_bits: u32,
}

impl GridLayout {
    /// Create the layout for `num_vars` variables (2x2, 2x4 or 4x4)
    pub fn new(num_vars: u32) -> Result<Self, KmapError> {
        if !(MIN_GRID_VARIABLES..=MAX_GRID_VARIABLES).contains(&num_vars) {
            return Err(KmapError::UnsupportedVariableCount {
                found: num_vars,
                min: MIN_GRID_VARIABLES,
                max: MAX_GRID_VARIABLES,
            });
        }

        let row_bits = num_vars / 2;
        Ok(Self {
            num_vars,
            row_bits,
            col_bits: num_vars - row_bits,
        })
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn rows(&self) -> usize {
        1 << self.row_bits
    }

    pub fn cols(&self) -> usize {
        1 << self.col_bits
    }

    /// Number of cells, always `2^num_vars`
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Whether `cell` lies inside the grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows() && cell.col < self.cols()
    }

    /// Map a minterm to its grid cell
    pub fn index_to_cell(&self, minterm: u32) -> Result<Cell, KmapError> {
        if minterm as usize >= self.cell_count() {
            return Err(KmapError::MintermOutOfRange {
                minterm,
                num_vars: self.num_vars,
            });
        }

        let col_mask = (1u32 << self.col_bits) - 1;
        Ok(Cell {
            row: gray_decode(minterm >> self.col_bits) as usize,
            col: gray_decode(minterm & col_mask) as usize,
        })
    }

    /// Map a grid cell back to its minterm
    pub fn cell_to_index(&self, cell: Cell) -> Result<u32, KmapError> {
        if !self.contains(cell) {
            return Err(KmapError::CellOutOfRange {
                row: cell.row,
                col: cell.col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        Ok((gray_encode(cell.row as u32) << self.col_bits) | gray_encode(cell.col as u32))
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.cols();
        (0..self.cell_count()).map(move |i| Cell::new(i / cols, i % cols))
    }

    /// Toroidal right and down neighbours of `cell`
    pub fn wrapped_neighbors(&self, cell: Cell) -> [Cell; 2] {
        [
            Cell::new(cell.row, (cell.col + 1) % self.cols()),
            Cell::new((cell.row + 1) % self.rows(), cell.col),
        ]
    }

    /// Names of the variables selecting the row, e.g. `"AB"`
    pub fn row_variables(&self) -> String {
        VARIABLE_NAMES[..self.row_bits as usize].iter().collect()
    }

    /// Names of the variables selecting the column, e.g. `"CD"`
    pub fn col_variables(&self) -> String {
        VARIABLE_NAMES[self.row_bits as usize..self.num_vars as usize].iter().collect()
    }

    /// Binary header for a row, e.g. `"11"` for row 2 of a 4x4 map
    pub fn row_label(&self, row: usize) -> String {
        format!("{:0width$b}", gray_encode(row as u32), width = self.row_bits as usize)
    }

    /// Binary header for a column
    pub fn col_label(&self, col: usize) -> String {
        format!("{:0width$b}", gray_encode(col as u32), width = self.col_bits as usize)
    }
}

/// Free-function form of [`GridLayout::index_to_cell`]
pub fn index_to_cell(minterm: u32, num_vars: u32) -> Result<Cell, KmapError> {
    GridLayout::new(num_vars)?.index_to_cell(minterm)
}

/// Free-function form of [`GridLayout::cell_to_index`]
pub fn cell_to_index(row: usize, col: usize, num_vars: u32) -> Result<u32, KmapError> {
    GridLayout::new(num_vars)?.cell_to_index(Cell::new(row, col))
}
