// File: ./src/grid/source.rs
//! Where grids come from. The pipeline only needs values plus merge rectangles;
//! fetching them from a spreadsheet service is someone else's job.
use super::{Grid, MergeRange};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Cell values and merges exactly as a source delivers them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub values: Vec<Vec<String>>,
    pub merges: Vec<MergeRange>,
}

impl RawSheet {
    /// Right-pads ragged rows into a rectangular grid.
    pub fn grid(&self) -> Grid {
        Grid::padded(self.values.clone())
    }
}

pub trait GridSource {
    fn fetch(&self) -> Result<RawSheet>;
}

/// Merge rectangle in the spreadsheet API's naming.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetMerge {
    #[serde(default)]
    start_row_index: usize,
    #[serde(default)]
    end_row_index: usize,
    #[serde(default)]
    start_column_index: usize,
    #[serde(default)]
    end_column_index: usize,
}

impl From<SheetMerge> for MergeRange {
    fn from(m: SheetMerge) -> Self {
        MergeRange::new(
            m.start_row_index,
            m.end_row_index,
            m.start_column_index,
            m.end_column_index,
        )
    }
}

#[derive(Debug, Deserialize)]
struct SheetDump {
    #[serde(default)]
    values: Vec<Vec<Value>>,
    #[serde(default)]
    merges: Vec<SheetMerge>,
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads a sheet dump shaped like a Sheets v4 response:
/// `{ "values": [[...]], "merges": [{ "startRowIndex": 0, ... }] }`.
pub struct JsonGridSource {
    path: PathBuf,
}

impl JsonGridSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(json: &str) -> Result<RawSheet> {
        let dump: SheetDump = serde_json::from_str(json)?;
        Ok(RawSheet {
            values: dump
                .values
                .iter()
                .map(|row| row.iter().map(cell_text).collect())
                .collect(),
            merges: dump.merges.into_iter().map(MergeRange::from).collect(),
        })
    }
}

impl GridSource for JsonGridSource {
    fn fetch(&self) -> Result<RawSheet> {
        log::info!("Retrieving data: {}", self.path.display());
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read sheet '{}'", self.path.display()))?;
        let sheet = Self::parse(&contents)
            .with_context(|| format!("Failed to parse sheet '{}'", self.path.display()))?;
        log::info!(
            "Data retrieved: {} rows, {} merges",
            sheet.values.len(),
            sheet.merges.len()
        );
        Ok(sheet)
    }
}
