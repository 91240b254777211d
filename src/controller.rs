// File: src/controller.rs
//! Runs the grid-to-calendar pipeline for configured targets.
//! All entry points (CLI, tests) go through here so every target is processed the same way:
//! fetch, optional beautify, normalize, partition, build, then render to calendar entries.
use crate::builder;
use crate::config::{Config, Target};
use crate::grid::{self, GridSource, JsonGridSource, RawSheet};
use crate::model::{IcsOptions, ScheduleEvent, SubjectRegistry};
use crate::storage::{CalendarEntry, CalendarWriter, Manifest};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use std::thread;

/// Outcome of one target run, ready to be handed to the writer.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    /// Events built, empty slots included
    pub events: usize,
    pub subjects: usize,
    pub entries: Vec<CalendarEntry>,
}

/// Pure pipeline over an already fetched sheet.
pub fn parse_sheet(
    sheet: &RawSheet,
    config: &Config,
    target: &Target,
    registry: &mut SubjectRegistry,
    created: DateTime<Utc>,
) -> crate::error::Result<Vec<ScheduleEvent>> {
    let mut raw = sheet.grid();
    if config.beautify_cells {
        raw = grid::beautify(&raw);
    }
    log::info!("Processing merges for '{}'", target.name);
    let normalized = grid::normalize(&raw, &sheet.merges)?;
    log::info!("Separating days, courses and time slots");
    let partition = grid::partition(&normalized, &config.days)?;
    builder::build(
        &partition,
        registry,
        target.semester_start,
        target.semester_end,
        created,
    )
}

/// Fetches and parses one target with a registry of its own.
pub fn run_target(
    config: &Config,
    target: &Target,
    source: &dyn GridSource,
    created: DateTime<Utc>,
) -> Result<TargetReport> {
    let sheet = source
        .fetch()
        .with_context(|| format!("Failed to fetch target '{}'", target.name))?;

    let mut registry = SubjectRegistry::new();
    registry.mark_ignored(&config.ignored_subjects);

    let events = parse_sheet(&sheet, config, target, &mut registry, created)
        .with_context(|| format!("Failed to parse target '{}'", target.name))?;

    let opts = IcsOptions {
        timezone: &config.timezone,
        uid_domain: &config.uid_domain,
    };
    let mut entries = Vec::new();
    for event in &events {
        if let Some(entry) = CalendarEntry::from_event(event, &opts)? {
            entries.push(entry);
        }
    }

    log::info!(
        "Target '{}': {} events, {} subjects",
        target.name,
        events.len(),
        registry.len()
    );
    Ok(TargetReport {
        name: target.name.clone(),
        events: events.len(),
        subjects: registry.len(),
        entries,
    })
}

/// Runs every configured target on its own thread. Reports keep the config order.
pub fn run_all(config: &Config) -> Result<Vec<TargetReport>> {
    if config.targets.is_empty() {
        log::warn!("No targets configured");
        return Ok(Vec::new());
    }
    let created = Utc::now();

    thread::scope(|scope| {
        let handles: Vec<_> = config
            .targets
            .iter()
            .map(|target| {
                let handle = scope.spawn(move || {
                    let source = JsonGridSource::new(config.resolve(&target.source));
                    run_target(config, target, &source, created)
                });
                (target, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(target, handle)| {
                handle
                    .join()
                    .map_err(|_| anyhow!("Worker for target '{}' panicked", target.name))?
            })
            .collect()
    })
}

/// Runs every target and writes calendars plus the manifest.
pub fn generate(config: &Config) -> Result<(Vec<TargetReport>, Manifest)> {
    let mut reports = run_all(config)?;
    let entries = reports
        .iter_mut()
        .flat_map(|r| std::mem::take(&mut r.entries))
        .collect();
    let manifest = CalendarWriter::from_config(config).write(entries)?;
    Ok((reports, manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MergeRange;
    use chrono::{NaiveDate, TimeZone};

    struct StaticSource(RawSheet);

    impl GridSource for StaticSource {
        fn fetch(&self) -> Result<RawSheet> {
            Ok(self.0.clone())
        }
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn target() -> Target {
        Target {
            name: "BS - Year 1".to_string(),
            source: "unused.json".into(),
            semester_start: NaiveDate::from_ymd_opt(2023, 1, 23).unwrap(),
            semester_end: NaiveDate::from_ymd_opt(2023, 3, 19).unwrap(),
        }
    }

    #[test]
    fn test_run_target_skips_empty_slots_and_keeps_ignored_flag() {
        let sheet = RawSheet {
            values: rows(&[
                &["", "BS - Year 1", ""],
                &["", "B22-01", "B22-02"],
                &["MONDAY", "", ""],
                &["09:00-10:30", "Elective courses on Physical Education", ""],
                &["10:40-12:10", "Calculus (lec)", ""],
            ]),
            merges: vec![MergeRange::new(3, 4, 1, 3), MergeRange::new(4, 5, 1, 3)],
        };
        let created = Utc.with_ymd_and_hms(2023, 1, 20, 12, 0, 0).unwrap();
        let report = run_target(
            &Config::default(),
            &target(),
            &StaticSource(sheet),
            created,
        )
        .unwrap();

        assert_eq!(report.events, 4);
        assert_eq!(report.subjects, 2);
        assert_eq!(report.entries.len(), 4);
        let ignored = report.entries.iter().filter(|e| e.ignored).count();
        assert_eq!(ignored, 2);
    }

    #[test]
    fn test_run_target_reports_bad_time_slot() {
        let sheet = RawSheet {
            values: rows(&[
                &["", "BS - Year 1"],
                &["", "B22-01"],
                &["MONDAY", ""],
                &["9am", "Calculus"],
            ]),
            merges: Vec::new(),
        };
        let err = run_target(
            &Config::default(),
            &target(),
            &StaticSource(sheet),
            Utc::now(),
        )
        .unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("BS - Year 1"));
        assert!(chain.contains("9am"));
    }

    #[test]
    fn test_run_all_without_targets() {
        assert!(run_all(&Config::default()).unwrap().is_empty());
    }
}
