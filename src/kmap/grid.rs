//! Cell states of a Karnaugh map input grid

use super::layout::{Cell, GridLayout};
use crate::error::KmapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display state of one grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Off,
    On,
    DontCare,
}

impl CellState {
    /// Next state in the click cycle off -> on -> don't-care -> off
    pub fn cycle(self) -> Self {
        Self::from_ordinal((self.ordinal() + 1) % 3)
    }

    fn ordinal(self) -> u8 {
        match self {
            CellState::Off => 0,
            CellState::On => 1,
            CellState::DontCare => 2,
        }
    }

    fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            1 => CellState::On,
            2 => CellState::DontCare,
            _ => CellState::Off,
        }
    }

    /// Single character used by grid files and text rendering
    pub fn symbol(self) -> char {
        match self {
            CellState::Off => '0',
            CellState::On => '1',
            CellState::DontCare => 'X',
        }
    }

    /// Parse a grid file character
    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(CellState::Off),
            '1' => Some(CellState::On),
            'X' | 'x' | '-' => Some(CellState::DontCare),
            _ => None,
        }
    }
}

/// Input grid holding one [`CellState`] per cell, stored row-major in layout order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmapGrid {
    pub layout: GridLayout,
    pub cells: Vec<CellState>,
}

impl KmapGrid {
    /// Create an all-off grid
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            cells: vec![CellState::Off; layout.cell_count()],
        }
    }

    /// Build a grid from minterm and don't-care sets
    pub fn from_sets(layout: GridLayout, minterms: &[u32], dont_cares: &[u32]) -> Result<Self, KmapError> {
        let mut grid = Self::new(layout);
        for &m in dont_cares {
            grid.set_minterm(m, CellState::DontCare)?;
        }
        for &m in minterms {
            if grid.state_of_minterm(m)? == CellState::DontCare {
                return Err(KmapError::OverlappingDontCare(m));
            }
            grid.set_minterm(m, CellState::On)?;
        }
        Ok(grid)
    }

    /// Build a grid from rows of states, checked against the layout
    pub fn from_rows(layout: GridLayout, rows: Vec<Vec<CellState>>) -> Result<Self, KmapError> {
        let mismatch = |found_cols: usize| KmapError::GridDimensionMismatch {
            rows: layout.rows(),
            cols: layout.cols(),
            found_rows: rows.len(),
            found_cols,
        };
        if rows.len() != layout.rows() {
            return Err(mismatch(rows.first().map_or(0, Vec::len)));
        }
        if let Some(states) = rows.iter().find(|states| states.len() != layout.cols()) {
            return Err(mismatch(states.len()));
        }

        Ok(Self {
            layout,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    fn offset(&self, cell: Cell) -> usize {
        cell.row * self.layout.cols() + cell.col
    }

    /// State at `cell`
    pub fn get(&self, cell: Cell) -> Result<CellState, KmapError> {
        self.check(cell)?;
        Ok(self.cells[self.offset(cell)])
    }

    /// Overwrite the state at `cell`
    pub fn set(&mut self, cell: Cell, state: CellState) -> Result<(), KmapError> {
        self.check(cell)?;
        let idx = self.offset(cell);
        self.cells[idx] = state;
        Ok(())
    }

    /// Advance `cell` one step through the click cycle and return the new state
    pub fn toggle(&mut self, cell: Cell) -> Result<CellState, KmapError> {
        let next = self.get(cell)?.cycle();
        self.set(cell, next)?;
        Ok(next)
    }

    /// State of the cell holding `minterm`
    pub fn state_of_minterm(&self, minterm: u32) -> Result<CellState, KmapError> {
        self.get(self.layout.index_to_cell(minterm)?)
    }

    fn set_minterm(&mut self, minterm: u32, state: CellState) -> Result<(), KmapError> {
        let cell = self.layout.index_to_cell(minterm)?;
        self.set(cell, state)
    }

    fn check(&self, cell: Cell) -> Result<(), KmapError> {
        if self.layout.contains(cell) {
            Ok(())
        } else {
            Err(KmapError::CellOutOfRange {
                row: cell.row,
                col: cell.col,
                rows: self.layout.rows(),
                cols: self.layout.cols(),
            })
        }
    }

    /// Sorted minterm and don't-care sets described by the grid
    pub fn extract(&self) -> (Vec<u32>, Vec<u32>) {
        let mut minterms = Vec::new();
        let mut dont_cares = Vec::new();

        for cell in self.layout.cells() {
            // Cells come from the layout itself, so the lookup cannot fail.
            let Ok(minterm) = self.layout.cell_to_index(cell) else {
                continue;
            };
            match self.cells[self.offset(cell)] {
                CellState::On => minterms.push(minterm),
                CellState::DontCare => dont_cares.push(minterm),
                CellState::Off => {}
            }
        }

        minterms.sort_unstable();
        dont_cares.sort_unstable();
        (minterms, dont_cares)
    }

    /// Number of cells in `state`
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }
}

impl fmt::Display for KmapGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.layout.cols()) {
            for state in row {
                write!(f, "{}", state.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_is_modulo_three() {
        let mut state = CellState::Off;
        let mut seen = Vec::new();
        for _ in 0..6 {
            state = state.cycle();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                CellState::On,
                CellState::DontCare,
                CellState::Off,
                CellState::On,
                CellState::DontCare,
                CellState::Off,
            ]
        );
    }

    #[test]
    fn test_toggle_and_extract() {
        let layout = GridLayout::new(3).unwrap();
        let mut grid = KmapGrid::new(layout);

        // Column 2 of row 0 holds BC=11, i.e. minterm 3
        assert_eq!(grid.toggle(Cell::new(0, 2)).unwrap(), CellState::On);
        // Column 3 of row 1 holds A=1 BC=10, minterm 6; toggle twice for don't-care
        grid.toggle(Cell::new(1, 3)).unwrap();
        assert_eq!(grid.toggle(Cell::new(1, 3)).unwrap(), CellState::DontCare);

        let (minterms, dont_cares) = grid.extract();
        assert_eq!(minterms, vec![3]);
        assert_eq!(dont_cares, vec![6]);
    }

    #[test]
    fn test_from_sets_round_trip() {
        let layout = GridLayout::new(4).unwrap();
        let grid = KmapGrid::from_sets(layout, &[0, 5, 10, 15], &[2, 7]).unwrap();
        assert_eq!(grid.count(CellState::On), 4);
        assert_eq!(grid.count(CellState::DontCare), 2);
        assert_eq!(grid.extract(), (vec![0, 5, 10, 15], vec![2, 7]));
    }

    #[test]
    fn test_overlap_rejected() {
        let layout = GridLayout::new(2).unwrap();
        assert_eq!(
            KmapGrid::from_sets(layout, &[1, 2], &[2]),
            Err(KmapError::OverlappingDontCare(2))
        );
    }

    #[test]
    fn test_from_rows_dimension_mismatch() {
        let layout = GridLayout::new(2).unwrap();
        let ragged = vec![vec![CellState::On, CellState::Off], vec![CellState::On]];
        assert_eq!(
            KmapGrid::from_rows(layout, ragged),
            Err(KmapError::GridDimensionMismatch {
                rows: 2,
                cols: 2,
                found_rows: 2,
                found_cols: 1,
            })
        );

        let short = vec![vec![CellState::Off, CellState::DontCare]];
        let err = KmapGrid::from_rows(layout, short).unwrap_err();
        assert_eq!(err.to_string(), "grid is 1x2 but the layout is 2x2");

        let grid = KmapGrid::from_rows(layout, vec![vec![CellState::On; 2]; 2]).unwrap();
        assert_eq!(grid.count(CellState::On), 4);
    }

    #[test]
    fn test_bounds() {
        let layout = GridLayout::new(2).unwrap();
        let mut grid = KmapGrid::new(layout);
        assert!(grid.toggle(Cell::new(2, 0)).is_err());
        assert!(grid.state_of_minterm(4).is_err());
    }

    #[test]
    fn test_display() {
        let layout = GridLayout::new(2).unwrap();
        let grid = KmapGrid::from_sets(layout, &[0, 3], &[1]).unwrap();
        assert_eq!(grid.to_string(), "1X\n01\n");
    }
}
