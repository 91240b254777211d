// File: ./src/error.rs
//! Error types for the grid-to-event pipeline.
//!
//! Application layers (config, storage, controller) wrap these in `anyhow::Error`;
//! the pipeline itself only ever returns [`Error`].

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while turning a grid into events.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// The grid shape does not allow partitioning. Always fatal for the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A row does not have the same width as the first row
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// A merge rectangle ends before it starts
    #[error("Merge range rows {row0}..{row1}, columns {col0}..{col1} is inverted")]
    InvertedMerge {
        row0: usize,
        row1: usize,
        col0: usize,
        col1: usize,
    },

    /// Not enough rows for the course and group header
    #[error("Grid has {rows} rows, at least {required} are needed for the header")]
    MissingHeader { rows: usize, required: usize },

    /// More weekday names were configured than there are days in a week
    #[error("{0} weekday names configured, at most 7 are allowed")]
    TooManyDays(usize),

    /// No column for time labels plus at least one group column
    #[error("Grid has {columns} columns, at least {required} are needed")]
    MissingColumns { columns: usize, required: usize },
}

/// A cell's text does not follow the timetable's authoring conventions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A time-slot label is not "HH:MM-HH:MM"
    #[error("Invalid time slot '{label}' at row {row} (day {day}, course {course})")]
    TimeSlot {
        label: String,
        row: usize,
        day: String,
        course: String,
    },

    /// An "ONLY ON" annotation holds something that is not a D/M date
    #[error("Invalid override date '{value}' in '{text}'")]
    OverrideDate { value: String, text: String },

    /// A cell-level failure, located in the grid
    #[error("{source} (day {day}, course {course}, group {group}, slot {label}, row {row})")]
    Cell {
        day: String,
        course: String,
        group: String,
        label: String,
        row: usize,
        #[source]
        source: Box<FormatError>,
    },
}

/// Requested subject was never registered. Recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Subject not found: {name}")]
pub struct LookupError {
    pub name: String,
}
