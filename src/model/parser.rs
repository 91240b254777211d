// File: ./src/model/parser.rs
//! Decoding of free-form cell text.
//!
//! Each authoring convention is a separate rule: subject name cleanup, event type in
//! parentheses, group name cleanup, "ONLY ON" override dates and time-slot labels.
use crate::error::FormatError;
use crate::model::event::ScheduleEvent;
use crate::model::subject::SubjectRegistry;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static RE_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*\)\s*").expect("valid parenthetical regex"));
static RE_TRAILING_PARENTHETICALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s*\([^()]*\))+\s*$").expect("valid trailing parenthetical regex")
});
static RE_DASH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-.*$").expect("valid suffix regex"));
static RE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static RE_EVENT_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("valid event type regex"));
static RE_ONLY_ON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\(\s*only\s+on\s+([^)]*)\)").expect("valid only-on regex")
});

/// "Software Project  (lec) " -> "Software Project". Idempotent.
///
/// Only trailing annotations and a " - free text" suffix go; parentheses inside
/// the name ("Intro (Part 1) to Physics") are part of it.
pub fn normalize_subject_name(raw: &str) -> String {
    let name = RE_TRAILING_PARENTHETICALS.replace(raw, "");
    let name = RE_DASH_SUFFIX.replace(&name, "");
    let name = RE_TRAILING_PARENTHETICALS.replace(&name, "");
    RE_SPACES.replace_all(&name, " ").trim().to_string()
}

/// Tag inside the last parenthesized group of a title, whitespace removed.
pub fn parse_event_type(title: &str) -> Option<String> {
    let caps = RE_EVENT_TYPE.captures_iter(title).last()?;
    let tag: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
    (!tag.is_empty()).then_some(tag)
}

/// Uppercase, footnote markers in parentheses removed, trimmed.
pub fn normalize_group_name(raw: &str) -> String {
    RE_PARENTHETICAL
        .replace_all(&raw.to_uppercase(), " ")
        .trim()
        .to_string()
}

/// Splits "214 (ONLY ON 14/6, 18/6)" into the location and its override dates.
/// Returns `Ok(None)` when the text has no annotation.
pub fn parse_only_on(
    location: &str,
    year: i32,
) -> Result<Option<(String, Vec<NaiveDate>)>, FormatError> {
    let Some(caps) = RE_ONLY_ON.captures(location) else {
        return Ok(None);
    };

    let invalid = |value: &str| FormatError::OverrideDate {
        value: value.to_string(),
        text: location.to_string(),
    };

    let mut dates = Vec::new();
    for part in caps[1].split(',') {
        let part = part.trim();
        let (d, m) = part.split_once('/').ok_or_else(|| invalid(part))?;
        let day: u32 = d.trim().parse().map_err(|_| invalid(part))?;
        let month: u32 = m.trim().parse().map_err(|_| invalid(part))?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid(part))?;
        dates.push(date);
    }

    let cleaned = RE_ONLY_ON.replace(location, "").trim().to_string();
    Ok(Some((cleaned, dates)))
}

/// "09:00-10:30" -> (09:00, 10:30).
pub fn parse_time_slot(label: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = label.split_once('-')?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
    Some((start, end))
}

impl ScheduleEvent {
    /// Fills subject, instructor, location, type and override dates from the lines of a
    /// collapsed cell: title first, then instructor, then location. Missing lines are
    /// skipped; an empty list leaves the event as an empty slot.
    ///
    /// Lines are trimmed before use, the instructor included.
    /// `year` is used for override dates, which are written without one.
    pub fn apply_cell(
        &mut self,
        lines: &[String],
        registry: &mut SubjectRegistry,
        year: i32,
    ) -> Result<(), FormatError> {
        let mut lines = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty());
        let title = lines.next();
        let instructor = lines.next();
        let mut location = lines.next().map(str::to_string);

        if let Some(loc) = location.as_deref()
            && let Some((cleaned, dates)) = parse_only_on(loc, year)?
        {
            self.flags.only_on = dates;
            location = Some(cleaned);
        }

        if let Some(title) = title {
            if !normalize_subject_name(title).is_empty() {
                self.subject = Some(registry.canonicalize(title));
            }
            if let Some(event_type) = parse_event_type(title) {
                self.event_type = Some(event_type);
            }
        }
        if let Some(instructor) = instructor {
            self.instructor = Some(instructor.to_string());
        }
        if let Some(location) = location
            && !location.is_empty()
        {
            self.location = Some(location);
        }
        Ok(())
    }
}
