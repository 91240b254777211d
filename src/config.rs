// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::paths::AppPaths;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

fn default_days() -> Vec<String> {
    [
        "MONDAY",
        "TUESDAY",
        "WEDNESDAY",
        "THURSDAY",
        "FRIDAY",
        "SATURDAY",
        "SUNDAY",
    ]
    .iter()
    .map(|d| d.to_string())
    .collect()
}

fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output/ics")
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from("output/calendars.json")
}

fn default_calendar_title() -> String {
    "Core Courses".to_string()
}

fn default_uid_domain() -> String {
    "timegrid.local".to_string()
}

fn default_ignored_subjects() -> Vec<String> {
    vec!["Elective courses on Physical Education".to_string()]
}

/// One sheet to process, with the semester its events recur over.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    /// Sheet dump, relative to the config file
    pub source: PathBuf,
    pub semester_start: NaiveDate,
    pub semester_end: NaiveDate,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Weekday labels in column 0, Monday first
    #[serde(default = "default_days")]
    pub days: Vec<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_manifest_file")]
    pub manifest_file: PathBuf,
    #[serde(default = "default_calendar_title")]
    pub calendar_title: String,
    #[serde(default = "default_uid_domain")]
    pub uid_domain: String,
    #[serde(default = "default_true")]
    pub beautify_cells: bool,
    #[serde(default = "default_ignored_subjects")]
    pub ignored_subjects: Vec<String>,
    #[serde(default)]
    pub targets: Vec<Target>,

    /// Directory relative paths are resolved against; the config file's directory once loaded.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            days: default_days(),
            timezone: default_timezone(),
            output_dir: default_output_dir(),
            manifest_file: default_manifest_file(),
            calendar_title: default_calendar_title(),
            uid_domain: default_uid_domain(),
            beautify_cells: true,
            ignored_subjects: default_ignored_subjects(),
            targets: Vec::new(),
            base_dir: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load the configuration from `path`.
    /// Returns a contextualized error if reading, parsing or validation fails.
    pub fn load(path: &Path) -> Result<Self> {
        // Explicitly detect missing file so the CLI can point at `init`.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let mut config = Self::parse(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Load from the platform config location (see [`AppPaths`]).
    pub fn load_default() -> Result<Self> {
        Self::load(&AppPaths::get_config_file_path()?)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.days.len() > 7 {
            anyhow::bail!("{} weekday names configured, at most 7 are allowed", self.days.len());
        }
        for target in &self.targets {
            if target.semester_end < target.semester_start {
                anyhow::bail!(
                    "Target '{}' ends ({}) before it starts ({})",
                    target.name,
                    target.semester_end,
                    target.semester_start
                );
            }
        }
        Ok(())
    }

    /// Relative paths are taken from the config file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        // Walk the error chain and look for an underlying IO NotFound.
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Write the configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        LocalStorage::with_lock(path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(path, toml_str)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.days.len(), 7);
        assert_eq!(config.days[0], "MONDAY");
        assert_eq!(config.timezone, "Europe/Moscow");
        assert!(config.beautify_cells);
        assert_eq!(config.ignored_subjects, default_ignored_subjects());
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_parse_targets() {
        let config = Config::parse(
            r#"
            timezone = "Europe/Berlin"

            [[targets]]
            name = "BS - Year 1"
            source = "sheets/bs1.json"
            semester_start = "2023-01-23"
            semester_end = "2023-03-19"
            "#,
        )
        .unwrap();
        assert_eq!(config.timezone, "Europe/Berlin");
        assert_eq!(config.targets.len(), 1);
        assert_eq!(
            config.targets[0].semester_start,
            NaiveDate::from_ymd_opt(2023, 1, 23).unwrap()
        );
    }

    #[test]
    fn test_inverted_semester_is_rejected() {
        let err = Config::parse(
            r#"
            [[targets]]
            name = "Broken"
            source = "x.json"
            semester_start = "2023-03-19"
            semester_end = "2023-01-23"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ends"));
    }

    #[test]
    fn test_resolve_relative_to_base_dir() {
        let config = Config {
            base_dir: PathBuf::from("/etc/timegrid"),
            ..Config::default()
        };
        assert_eq!(
            config.resolve(Path::new("sheets/a.json")),
            PathBuf::from("/etc/timegrid/sheets/a.json")
        );
        assert_eq!(config.resolve(Path::new("/tmp/a.json")), PathBuf::from("/tmp/a.json"));
    }

    #[test]
    fn test_missing_file_is_detected() {
        let err = Config::load(Path::new("/nonexistent/timegrid/config.toml")).unwrap_err();
        assert!(Config::is_missing_config_error(&err));
    }
}
