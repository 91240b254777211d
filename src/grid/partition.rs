// File: ./src/grid/partition.rs
//! Splits a normalized grid into days, courses and per-slot records.
use super::{Grid, HEADER_ROWS};
use crate::error::StructuralError;
use crate::model::parser::normalize_group_name;
use chrono::Weekday;
use std::ops::Range;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub days: Vec<DaySchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    /// Label as written in column 0
    pub name: String,
    pub weekday: Weekday,
    pub rows: Range<usize>,
    pub courses: Vec<CourseSchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSchedule {
    pub name: String,
    pub columns: Range<usize>,
    /// Only columns with a group name; spacer columns are dropped.
    pub groups: Vec<GroupColumn>,
    pub slots: Vec<SlotRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupColumn {
    /// Normalized group identifier
    pub name: String,
    pub column: usize,
}

/// All rows of one course section sharing a time-slot label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    pub label: String,
    /// First grid row carrying the label
    pub row: usize,
    /// One list per entry of `CourseSchedule::groups`, non-empty cell texts in row order.
    pub cells: Vec<Vec<String>>,
}

impl Partition {
    pub fn day(&self, name: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

impl DaySchedule {
    pub fn course(&self, name: &str) -> Option<&CourseSchedule> {
        self.courses.iter().find(|c| c.name == name)
    }
}

impl CourseSchedule {
    pub fn slot(&self, label: &str) -> Option<&SlotRecord> {
        self.slots.iter().find(|s| s.label == label)
    }
}

/// Weekday for a column-0 label, given the configured day names in Monday-first order.
pub fn match_weekday(label: &str, days: &[String]) -> Option<Weekday> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let label = label.to_uppercase();
    days.iter()
        .position(|d| d.trim().to_uppercase() == label)
        .and_then(|i| WEEK.get(i).copied())
}

/// Row ranges `[start, end)` of each day, paired with the label and weekday that opens them.
pub fn day_sections(
    grid: &Grid,
    days: &[String],
) -> Result<Vec<(Range<usize>, String, Weekday)>, StructuralError> {
    if days.len() > WEEK.len() {
        return Err(StructuralError::TooManyDays(days.len()));
    }

    let starts: Vec<(usize, Weekday)> = grid
        .column(0)
        .enumerate()
        .skip(HEADER_ROWS)
        .filter_map(|(row, label)| match_weekday(label, days).map(|w| (row, w)))
        .collect();

    if let Some((first, _)) = starts.first()
        && *first > HEADER_ROWS
    {
        log::warn!(
            "Rows {}..{} precede the first day label and are ignored",
            HEADER_ROWS,
            first
        );
    }

    let mut bounds: Vec<usize> = starts.iter().map(|(row, _)| *row).collect();
    bounds.push(grid.height());

    Ok(starts
        .iter()
        .zip(bounds.windows(2))
        .map(|((row, weekday), pair)| {
            (pair[0]..pair[1], grid.get(*row, 0).trim().to_string(), *weekday)
        })
        .collect())
}

/// Column ranges `[start, end)` over columns `1..width`, split wherever the course name in row 0 changes.
pub fn course_sections(grid: &Grid) -> Vec<Range<usize>> {
    if grid.width() < 2 || grid.height() == 0 {
        return Vec::new();
    }
    let mut bounds: Vec<usize> = (1..grid.width())
        .filter(|&col| col == 1 || grid.get(0, col) != grid.get(0, col - 1))
        .collect();
    bounds.push(grid.width());
    bounds.windows(2).map(|pair| pair[0]..pair[1]).collect()
}

/// Collapses rows sharing a time label. Equal labels merge even when not adjacent.
fn collapse_slots(grid: &Grid, rows: Range<usize>, groups: &[GroupColumn]) -> Vec<SlotRecord> {
    let mut slots: Vec<SlotRecord> = Vec::new();
    for row in rows {
        let label = grid.get(row, 0).trim();
        if label.is_empty() {
            continue;
        }
        let idx = match slots.iter().position(|s| s.label == label) {
            Some(idx) => idx,
            None => {
                slots.push(SlotRecord {
                    label: label.to_string(),
                    row,
                    cells: vec![Vec::new(); groups.len()],
                });
                slots.len() - 1
            }
        };
        for (i, group) in groups.iter().enumerate() {
            let value = grid.get(row, group.column);
            if !value.is_empty() {
                slots[idx].cells[i].push(value.to_string());
            }
        }
    }
    slots
}

/// Segments the grid into days, then courses, then logical slot records.
/// Order everywhere follows the grid, top to bottom and left to right.
pub fn partition(grid: &Grid, days: &[String]) -> Result<Partition, StructuralError> {
    if grid.height() < HEADER_ROWS {
        return Err(StructuralError::MissingHeader {
            rows: grid.height(),
            required: HEADER_ROWS,
        });
    }

    if grid.width() < 2 {
        return Err(StructuralError::MissingColumns {
            columns: grid.width(),
            required: 2,
        });
    }

    let sections = day_sections(grid, days)?;
    log::info!("Found {} day sections", sections.len());
    let courses = course_sections(grid);

    let mut out = Vec::with_capacity(sections.len());
    for (rows, name, weekday) in sections {
        log::info!(" > Separating day {}", name);
        let mut day_courses = Vec::with_capacity(courses.len());
        for columns in &courses {
            let course_name = grid.get(0, columns.start).to_string();
            log::debug!("  > {}", course_name);
            let groups: Vec<GroupColumn> = columns
                .clone()
                .filter(|&col| !grid.get(1, col).is_empty())
                .map(|col| GroupColumn {
                    name: normalize_group_name(grid.get(1, col)),
                    column: col,
                })
                .collect();
            let slots = collapse_slots(grid, rows.start + 1..rows.end, &groups);
            day_courses.push(CourseSchedule {
                name: course_name,
                columns: columns.clone(),
                groups,
                slots,
            });
        }
        out.push(DaySchedule {
            name,
            weekday,
            rows,
            courses: day_courses,
        });
    }
    Ok(Partition { days: out })
}
