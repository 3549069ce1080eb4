//! Classification of an implicant's cells as a (possibly wrapped) rectangle

use crate::error::{InvalidShapeReason, KmapError};
use crate::kmap::GridLayout;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Occupied indices along one grid axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisSpan {
    /// Consecutive indices `start..=end`
    Run { start: usize, end: usize },
    /// `0..=head_end` continued across the edge from `tail_start..=extent - 1`
    Wrap {
        head_end: usize,
        tail_start: usize,
        extent: usize,
    },
}

impl AxisSpan {
    /// Classify sorted, distinct indices on an axis of `extent` cells.
    /// A full axis is a plain run.
    pub fn classify(indices: &[usize], extent: usize) -> Option<Self> {
        let (&first, &last) = (indices.first()?, indices.last()?);
        if last >= extent {
            return None;
        }
        if last - first + 1 == indices.len() {
            return Some(AxisSpan::Run { start: first, end: last });
        }

        let gaps: Vec<(usize, usize)> = indices
            .iter()
            .copied()
            .tuple_windows()
            .filter(|&(a, b)| b - a > 1)
            .collect();

        match gaps.as_slice() {
            [(head_end, tail_start)] if first == 0 && last == extent - 1 => Some(AxisSpan::Wrap {
                head_end: *head_end,
                tail_start: *tail_start,
                extent,
            }),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match *self {
            AxisSpan::Run { start, end } => end - start + 1,
            AxisSpan::Wrap {
                head_end,
                tail_start,
                extent,
            } => head_end + 1 + extent - tail_start,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, AxisSpan::Wrap { .. })
    }

    /// Contiguous pieces in ascending order: one for a run, head then tail for a wrap
    pub fn segments(&self) -> Vec<(usize, usize)> {
        match *self {
            AxisSpan::Run { start, end } => vec![(start, end)],
            AxisSpan::Wrap {
                head_end,
                tail_start,
                extent,
            } => vec![(0, head_end), (tail_start, extent - 1)],
        }
    }
}

/// Result of validating one implicant's cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatedRegion {
    Rectangle { rows: AxisSpan, cols: AxisSpan },
    /// Continues across the top/bottom edge
    WrappedRows { rows: AxisSpan, cols: AxisSpan },
    /// Continues across the left/right edge
    WrappedCols { rows: AxisSpan, cols: AxisSpan },
    /// Continues across both edges; only the four corners are occupied
    WrappedBoth { rows: AxisSpan, cols: AxisSpan },
    Invalid { reason: InvalidShapeReason },
}

impl ValidatedRegion {
    fn from_spans(rows: AxisSpan, cols: AxisSpan) -> Self {
        match (rows.is_wrapped(), cols.is_wrapped()) {
            (true, true) => ValidatedRegion::WrappedBoth { rows, cols },
            (true, false) => ValidatedRegion::WrappedRows { rows, cols },
            (false, true) => ValidatedRegion::WrappedCols { rows, cols },
            (false, false) => ValidatedRegion::Rectangle { rows, cols },
        }
    }

    /// Row and column spans of a valid region
    pub fn spans(&self) -> Option<(AxisSpan, AxisSpan)> {
        match *self {
            ValidatedRegion::Rectangle { rows, cols }
            | ValidatedRegion::WrappedRows { rows, cols }
            | ValidatedRegion::WrappedCols { rows, cols }
            | ValidatedRegion::WrappedBoth { rows, cols } => Some((rows, cols)),
            ValidatedRegion::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, ValidatedRegion::Invalid { .. })
    }

    /// Number of cells in the region, zero when invalid
    pub fn cell_count(&self) -> usize {
        self.spans().map_or(0, |(rows, cols)| rows.len() * cols.len())
    }

    /// Short name used in logs and legends
    pub fn kind(&self) -> &'static str {
        match self {
            ValidatedRegion::Rectangle { .. } => "rectangle",
            ValidatedRegion::WrappedRows { .. } => "wrapped rows",
            ValidatedRegion::WrappedCols { .. } => "wrapped columns",
            ValidatedRegion::WrappedBoth { .. } => "four corners",
            ValidatedRegion::Invalid { .. } => "invalid",
        }
    }

    /// Convert into a typed error for `minterms` when invalid
    pub fn into_result(self, minterms: &[u32]) -> Result<Self, KmapError> {
        match self {
            ValidatedRegion::Invalid { reason } => Err(KmapError::InvalidGroupShape {
                minterms: minterms.to_vec(),
                reason,
            }),
            region => Ok(region),
        }
    }
}

/// Classifies covered-minterm sets against a grid layout
#[derive(Debug, Clone, Copy)]
pub struct GroupValidator {
    layout: GridLayout,
}

impl GroupValidator {
    pub fn new(layout: GridLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Classify `minterms`; duplicates are ignored
    pub fn validate(&self, minterms: &[u32]) -> ValidatedRegion {
        match self.classify(minterms) {
            Ok(region) => region,
            Err(reason) => ValidatedRegion::Invalid { reason },
        }
    }

    fn classify(&self, minterms: &[u32]) -> Result<ValidatedRegion, InvalidShapeReason> {
        let mut cells = BTreeSet::new();
        for &m in minterms {
            let cell = self
                .layout
                .index_to_cell(m)
                .map_err(|_| InvalidShapeReason::MintermOutOfRange(m))?;
            cells.insert(cell);
        }

        let count = cells.len();
        if count == 0 {
            return Err(InvalidShapeReason::Empty);
        }
        if !count.is_power_of_two() {
            return Err(InvalidShapeReason::NotPowerOfTwo { count });
        }
        if count > self.layout.cell_count() {
            return Err(InvalidShapeReason::TooLarge {
                count,
                capacity: self.layout.cell_count(),
            });
        }

        let rows: Vec<usize> = cells.iter().map(|c| c.row).sorted().dedup().collect();
        let cols: Vec<usize> = cells.iter().map(|c| c.col).sorted().dedup().collect();

        let row_span =
            AxisSpan::classify(&rows, self.layout.rows()).ok_or(InvalidShapeReason::NonContiguousRows)?;
        let col_span =
            AxisSpan::classify(&cols, self.layout.cols()).ok_or(InvalidShapeReason::NonContiguousCols)?;

        // Every cell of the row x column product must be present
        if count != rows.len() * cols.len() {
            return Err(InvalidShapeReason::IncompleteBoundingBox {
                count,
                rows: rows.len(),
                cols: cols.len(),
            });
        }

        Ok(ValidatedRegion::from_spans(row_span, col_span))
    }
}

/// Validate `minterms` on the grid for `num_vars` variables
pub fn validate(minterms: &[u32], num_vars: u32) -> Result<ValidatedRegion, KmapError> {
    Ok(GroupValidator::new(GridLayout::new(num_vars)?).validate(minterms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::BitPattern;

    fn validator(num_vars: u32) -> GroupValidator {
        GroupValidator::new(GridLayout::new(num_vars).unwrap())
    }

    #[test]
    fn test_axis_classification() {
        assert_eq!(AxisSpan::classify(&[1, 2], 4), Some(AxisSpan::Run { start: 1, end: 2 }));
        assert_eq!(AxisSpan::classify(&[0, 1, 2, 3], 4), Some(AxisSpan::Run { start: 0, end: 3 }));
        assert_eq!(
            AxisSpan::classify(&[0, 3], 4),
            Some(AxisSpan::Wrap { head_end: 0, tail_start: 3, extent: 4 })
        );
        assert_eq!(AxisSpan::classify(&[0, 2], 4), None);
        assert_eq!(AxisSpan::classify(&[1, 3], 4), None);
        assert_eq!(AxisSpan::classify(&[], 4), None);

        let wrap = AxisSpan::classify(&[0, 1, 3], 4).unwrap();
        assert_eq!(wrap.len(), 3);
        assert_eq!(wrap.segments(), vec![(0, 1), (3, 3)]);
    }

    #[test]
    fn test_power_of_two_rejection() {
        assert_eq!(
            validator(2).validate(&[0, 1, 2]),
            ValidatedRegion::Invalid {
                reason: InvalidShapeReason::NotPowerOfTwo { count: 3 }
            }
        );
        assert_eq!(
            validator(2).validate(&[]),
            ValidatedRegion::Invalid { reason: InvalidShapeReason::Empty }
        );
    }

    #[test]
    fn test_single_cell_never_wraps() {
        for m in 0..16 {
            let region = validator(4).validate(&[m]);
            assert!(matches!(region, ValidatedRegion::Rectangle { .. }), "minterm {}", m);
            assert_eq!(region.cell_count(), 1);
        }
    }

    #[test]
    fn test_row_of_three_variable_map() {
        let region = validator(3).validate(&[0, 1, 2, 3]);
        assert_eq!(
            region,
            ValidatedRegion::Rectangle {
                rows: AxisSpan::Run { start: 0, end: 0 },
                cols: AxisSpan::Run { start: 0, end: 3 },
            }
        );
    }

    #[test]
    fn test_wrapped_rows() {
        // B' on a 4x4 map: AB = 00 and 10, rows 0 and 3, every column
        let minterms = [0, 1, 2, 3, 8, 9, 10, 11];
        let region = validator(4).validate(&minterms);
        assert!(matches!(region, ValidatedRegion::WrappedRows { .. }));
        assert_eq!(region.cell_count(), 8);
    }

    #[test]
    fn test_wrapped_cols() {
        // D' on a 4x4 map: columns 0 and 3
        let minterms = "---0".parse::<BitPattern>().unwrap().covered_minterms();
        let region = validator(4).validate(&minterms);
        assert!(matches!(region, ValidatedRegion::WrappedCols { .. }));

        // C' on a 2x4 map: columns 0 and 3 of both rows
        let region = validator(3).validate(&[0, 2, 4, 6]);
        assert!(matches!(region, ValidatedRegion::WrappedCols { .. }));
    }

    #[test]
    fn test_four_corners() {
        let region = validator(4).validate(&[0, 2, 8, 10]);
        assert_eq!(
            region,
            ValidatedRegion::WrappedBoth {
                rows: AxisSpan::Wrap { head_end: 0, tail_start: 3, extent: 4 },
                cols: AxisSpan::Wrap { head_end: 0, tail_start: 3, extent: 4 },
            }
        );
    }

    #[test]
    fn test_full_span_is_not_a_wrap() {
        let all: Vec<u32> = (0..16).collect();
        assert!(matches!(validator(4).validate(&all), ValidatedRegion::Rectangle { .. }));

        // Middle two rows across every column (B)
        let region = validator(4).validate(&[4, 5, 6, 7, 12, 13, 14, 15]);
        assert!(matches!(region, ValidatedRegion::Rectangle { .. }));
    }

    #[test]
    fn test_non_contiguous_rejected() {
        // Columns 0 and 2 of row 0 on a 4x4 map are minterms 0 and 3
        assert_eq!(
            validator(4).validate(&[0, 3]),
            ValidatedRegion::Invalid { reason: InvalidShapeReason::NonContiguousCols }
        );
        // Rows 0 and 2 in column 0: minterms 0 and 12
        assert_eq!(
            validator(4).validate(&[0, 12]),
            ValidatedRegion::Invalid { reason: InvalidShapeReason::NonContiguousRows }
        );
    }

    #[test]
    fn test_incomplete_bounding_box() {
        // Diagonal pair: cells (0,0) and (1,1)
        assert_eq!(
            validator(4).validate(&[0, 5]),
            ValidatedRegion::Invalid {
                reason: InvalidShapeReason::IncompleteBoundingBox { count: 2, rows: 2, cols: 2 }
            }
        );
    }

    #[test]
    fn test_out_of_range_minterm() {
        assert_eq!(
            validator(3).validate(&[0, 9]),
            ValidatedRegion::Invalid { reason: InvalidShapeReason::MintermOutOfRange(9) }
        );
    }

    #[test]
    fn test_duplicates_ignored() {
        assert!(validator(2).validate(&[1, 1, 3, 3]).is_valid());
    }

    #[test]
    fn test_every_pattern_is_a_valid_region() {
        for num_vars in 2..=4 {
            let v = validator(num_vars);
            for mask in 0..(1u32 << num_vars) {
                for value in 0..(1u32 << num_vars) {
                    if value & !mask != 0 {
                        continue;
                    }
                    let pattern = BitPattern::new(num_vars, mask, value).unwrap();
                    let minterms = pattern.covered_minterms();
                    let region = v.validate(&minterms);
                    assert!(region.is_valid(), "pattern {} -> {:?}", pattern, region);
                    assert_eq!(region.cell_count(), minterms.len());
                }
            }
        }
    }

    #[test]
    fn test_into_result() {
        let err = validator(2).validate(&[0, 1, 2]).into_result(&[0, 1, 2]).unwrap_err();
        assert!(matches!(err, KmapError::InvalidGroupShape { .. }));
        assert!(validate(&[0], 5).is_err());
    }
}
