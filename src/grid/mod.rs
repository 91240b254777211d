// File: ./src/grid/mod.rs
//! The raw timetable table and the merge rectangles that come with it.
pub mod normalize;
pub mod partition;
pub mod source;

pub use normalize::{beautify, normalize};
pub use partition::{CourseSchedule, DaySchedule, GroupColumn, Partition, SlotRecord, partition};
pub use source::{GridSource, JsonGridSource, RawSheet};

use crate::error::StructuralError;

/// Rows reserved for the header: course names, then group names.
pub const HEADER_ROWS: usize = 2;

/// A rectangular table of text cells. Rows and columns are 0-indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl Grid {
    /// Builds a grid from rows that must all have the same length.
    pub fn new(rows: Vec<Vec<String>>) -> Result<Self, StructuralError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i, r.len()))
            .find(|(_, len)| *len != width)
        {
            return Err(StructuralError::RaggedRow {
                row,
                found,
                expected: width,
            });
        }
        Ok(Self { rows, width })
    }

    /// Builds a grid from ragged rows, right-padding short rows with empty cells.
    /// Spreadsheet APIs drop trailing empty cells, so this is what sources use.
    pub fn padded(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows, width }
    }

    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::padded(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    /// Cell text, or "" outside the grid.
    pub fn get(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: String) {
        self.rows[row][col] = value;
    }

    pub fn row(&self, row: usize) -> &[String] {
        &self.rows[row]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        (0..self.height()).map(move |row| self.get(row, col))
    }

    pub(crate) fn map_cells(&self, f: impl Fn(&str) -> String) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .map(|r| r.iter().map(|c| f(c)).collect())
                .collect(),
            width: self.width,
        }
    }
}

/// A rectangle of merged cells: rows `row0..row1`, columns `col0..col1` (half-open).
/// Every cell inside takes the value found at `(row0, col0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRange {
    pub row0: usize,
    pub row1: usize,
    pub col0: usize,
    pub col1: usize,
}

impl MergeRange {
    pub fn new(row0: usize, row1: usize, col0: usize, col1: usize) -> Self {
        Self {
            row0,
            row1,
            col0,
            col1,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.row1 < self.row0 || self.col1 < self.col0
    }

    pub fn origin_within(&self, grid: &Grid) -> bool {
        self.row0 < grid.height() && self.col0 < grid.width()
    }

    pub fn fits(&self, grid: &Grid) -> bool {
        self.row1 <= grid.height() && self.col1 <= grid.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_ragged_rows() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ];
        assert_eq!(
            Grid::new(rows),
            Err(StructuralError::RaggedRow {
                row: 1,
                found: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_padded_fills_short_rows() {
        let grid = Grid::from_strs(&[&["a"], &["b", "c", "d"]]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.row(0), &["a", "", ""]);
        assert_eq!(grid.get(5, 5), "");
    }
}
