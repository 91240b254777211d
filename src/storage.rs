// File: ./src/storage.rs
//! Writing calendars and the manifest that lists them.
use crate::config::Config;
use crate::model::{IcsOptions, ScheduleEvent};
use anyhow::{Context, Result};
use fs2::FileExt;
use icalendar::{Component, Event};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-/]+").expect("valid slug regex"));

pub const PRODID: &str = "-//timegrid//Schedule//EN";

/// Replaces runs of spaces, dashes and slashes with a single dash.
pub fn slugify(name: &str) -> String {
    RE_SLUG.replace_all(name.trim(), "-").to_string()
}

pub struct LocalStorage;

impl LocalStorage {
    /// Helper to get a sidecar lock file path
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&file)?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

/// Everything the writer needs from one event, detached from the parsing run
/// so it can move between threads.
#[derive(Debug, Clone)]
pub struct CalendarEntry {
    pub course: String,
    pub group: String,
    pub subject: String,
    pub ignored: bool,
    pub vevents: Vec<Event>,
}

impl CalendarEntry {
    /// `None` for empty slots.
    pub fn from_event(event: &ScheduleEvent, opts: &IcsOptions) -> Result<Option<Self>> {
        let Some(subject) = event.subject.as_deref() else {
            return Ok(None);
        };
        Ok(Some(Self {
            course: event.course.clone().unwrap_or_default(),
            group: event.group.clone(),
            subject: subject.name.clone(),
            ignored: subject.is_ignored(),
            vevents: event.to_vevents(opts)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFilter {
    pub title: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCalendar {
    pub name: String,
    pub course: String,
    /// Path of the .ics file relative to the manifest
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub title: String,
    pub filters: Vec<ManifestFilter>,
    pub calendars: Vec<ManifestCalendar>,
}

/// Writes one .ics file per (course, group) and a JSON manifest listing them.
pub struct CalendarWriter {
    pub output_dir: PathBuf,
    pub manifest_file: PathBuf,
    pub title: String,
    pub timezone: String,
}

impl CalendarWriter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.resolve(&config.output_dir),
            manifest_file: config.resolve(&config.manifest_file),
            title: config.calendar_title.clone(),
            timezone: config.timezone.clone(),
        }
    }

    /// Full VCALENDAR text for one group.
    pub fn render(&self, group: &str, entries: &[&CalendarEntry]) -> String {
        let mut output = format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{}\r\nMETHOD:PUBLISH\r\nX-WR-CALNAME:{}\r\n",
            PRODID, group
        );
        if !self.timezone.is_empty() {
            output.push_str(&format!("X-WR-TIMEZONE:{}\r\n", self.timezone));
        }
        output.push_str("X-WR-CALDESC:Generated by timegrid\r\n");

        for entry in entries {
            if entry.ignored {
                log::info!("   > Ignoring {}", entry.subject);
                continue;
            }
            for vevent in &entry.vevents {
                let block = vevent.to_string();
                output.push_str(&block);
                if !block.ends_with('\n') {
                    output.push_str("\r\n");
                }
            }
        }

        output.push_str("END:VCALENDAR\r\n");
        output
    }

    fn relative_to_manifest(&self, path: &Path) -> String {
        let base = self.manifest_file.parent().unwrap_or(Path::new(""));
        path.strip_prefix(base)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Groups entries by course then group, writes each calendar and the manifest.
    pub fn write(&self, mut entries: Vec<CalendarEntry>) -> Result<Manifest> {
        entries.sort_by(|a, b| (&a.course, &a.group).cmp(&(&b.course, &b.group)));

        let mut manifest = Manifest {
            title: self.title.clone(),
            filters: vec![ManifestFilter {
                title: "Course".to_string(),
                alias: "course".to_string(),
            }],
            calendars: Vec::new(),
        };

        if let Some(parent) = self.manifest_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        LocalStorage::with_lock(&self.manifest_file, || {
            self.write_locked(&entries, &mut manifest)
        })?;
        log::info!("Wrote {} calendars", manifest.calendars.len());
        Ok(manifest)
    }

    fn write_locked(&self, entries: &[CalendarEntry], manifest: &mut Manifest) -> Result<()> {
        log::info!("Writing JSON and iCalendars files...");
        let mut rest = entries;
        while let Some(first) = rest.first() {
            let len = rest
                .iter()
                .take_while(|e| e.course == first.course && e.group == first.group)
                .count();
            let (group_entries, tail) = rest.split_at(len);
            rest = tail;

            let course_dir = self.output_dir.join(slugify(&first.course));
            fs::create_dir_all(&course_dir).with_context(|| {
                format!("Failed to create directory: {:?}", course_dir)
            })?;
            let file_path = course_dir.join(format!("{}.ics", first.group.replace('/', "-")));
            log::info!("  > {} / {}...", first.course, first.group);

            let refs: Vec<&CalendarEntry> = group_entries.iter().collect();
            LocalStorage::atomic_write(&file_path, self.render(&first.group, &refs))
                .with_context(|| format!("Failed to write calendar '{}'", file_path.display()))?;

            manifest.calendars.push(ManifestCalendar {
                name: first.group.clone(),
                course: first.course.clone(),
                file: self.relative_to_manifest(&file_path),
            });
        }

        let json = serde_json::to_string_pretty(&*manifest)?;
        LocalStorage::atomic_write(&self.manifest_file, json).with_context(|| {
            format!("Failed to write manifest '{}'", self.manifest_file.display())
        })
    }
}
