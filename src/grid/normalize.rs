// File: ./src/grid/normalize.rs
use super::{Grid, MergeRange};
use crate::error::StructuralError;
use regex::Regex;
use std::sync::LazyLock;

static RE_MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Cyrillic letters that authors type in place of their Latin twins
/// (room "А108" instead of "A108").
const LOOKALIKES: &[(char, char)] = &[
    ('А', 'A'),
    ('В', 'B'),
    ('Е', 'E'),
    ('К', 'K'),
    ('М', 'M'),
    ('Н', 'H'),
    ('О', 'O'),
    ('Р', 'P'),
    ('С', 'C'),
    ('Т', 'T'),
    ('У', 'Y'),
    ('Х', 'X'),
    ('а', 'a'),
    ('с', 'c'),
    ('р', 'p'),
];

/// Collapses whitespace runs, trims, and replaces Cyrillic look-alikes with Latin letters.
pub fn beautify_text(text: &str) -> String {
    RE_MULTIPLE_SPACES
        .replace_all(text, " ")
        .trim()
        .chars()
        .map(|c| {
            LOOKALIKES
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Applies [`beautify_text`] to every cell.
pub fn beautify(grid: &Grid) -> Grid {
    grid.map_cells(beautify_text)
}

/// Produces a fully populated grid: blank cells cleared, merges broadcast,
/// course names in row 0 filled rightwards.
///
/// The input is left untouched. A merge whose origin lies outside the grid is
/// ignored; one that starts inside but runs past the edge is skipped as a whole.
pub fn normalize(grid: &Grid, merges: &[MergeRange]) -> Result<Grid, StructuralError> {
    let mut out = grid.map_cells(|c| {
        if c.trim().is_empty() {
            String::new()
        } else {
            c.to_string()
        }
    });

    for merge in merges {
        apply_merge(&mut out, merge)?;
    }

    fill_course_row(&mut out);
    log::debug!(
        "Normalized grid {}x{} with {} merges",
        out.height(),
        out.width(),
        merges.len()
    );
    Ok(out)
}

fn apply_merge(grid: &mut Grid, merge: &MergeRange) -> Result<(), StructuralError> {
    if merge.is_inverted() {
        return Err(StructuralError::InvertedMerge {
            row0: merge.row0,
            row1: merge.row1,
            col0: merge.col0,
            col1: merge.col1,
        });
    }
    if !merge.origin_within(grid) {
        log::debug!("Ignoring merge {:?} outside the grid", merge);
        return Ok(());
    }
    if !merge.fits(grid) {
        log::warn!(
            "Skipping merge {:?}: extends past grid {}x{}",
            merge,
            grid.height(),
            grid.width()
        );
        return Ok(());
    }

    let value = grid.get(merge.row0, merge.col0).to_string();
    for row in merge.row0..merge.row1 {
        for col in merge.col0..merge.col1 {
            grid.set(row, col, value.clone());
        }
    }
    Ok(())
}

/// Course names are typed once per course; copy each one over the empty cells to its right.
fn fill_course_row(grid: &mut Grid) {
    if grid.height() == 0 {
        return;
    }
    for col in 1..grid.width() {
        if grid.get(0, col).is_empty() {
            let left = grid.get(0, col - 1).to_string();
            if !left.is_empty() {
                log::debug!("Filled empty cell in courses line: {}", col);
            }
            grid.set(0, col, left);
        }
    }
}
