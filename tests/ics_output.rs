// Tests for the calendar files and manifest produced from a config on disk.
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use timegrid::config::Config;
use timegrid::controller;
use timegrid::storage::{Manifest, ManifestCalendar};

fn unique_dir(name: &str) -> PathBuf {
    let unique = format!(
        "timegrid_it_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );
    let dir = std::env::temp_dir().join(unique);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const SHEET: &str = r#"{
  "values": [
    ["", "BS - Year 1", "", ""],
    ["", "B22-01 (EN)", "B22-02", ""],
    ["MONDAY"],
    ["09:00-10:30", "Analytic Geometry (lec)"],
    ["09:00-10:30", "Prof. Smith"],
    ["09:00-10:30", "108"],
    ["10:40-12:10", "Elective courses on Physical Education"],
    ["TUESDAY"],
    ["14:20-15:50", "Data Structures (lab)", "Data Structures - extra (lab)"],
    ["14:20-15:50", "Ivan Ivanov", "Ivan Ivanov"],
    ["14:20-15:50", "301 (ONLY ON 14/2, 21/2)", "302"]
  ],
  "merges": [
    { "startRowIndex": 3, "endRowIndex": 4, "startColumnIndex": 1, "endColumnIndex": 3 },
    { "startRowIndex": 4, "endRowIndex": 5, "startColumnIndex": 1, "endColumnIndex": 3 },
    { "startRowIndex": 5, "endRowIndex": 6, "startColumnIndex": 1, "endColumnIndex": 3 },
    { "startRowIndex": 6, "endRowIndex": 7, "startColumnIndex": 1, "endColumnIndex": 3 }
  ]
}"#;

fn write_config(dir: &Path) -> PathBuf {
    fs::write(dir.join("bs1.json"), SHEET).unwrap();
    let config_path = dir.join("config.toml");
    fs::write(
        &config_path,
        r#"
        timezone = "Europe/Moscow"
        uid_domain = "example.edu"
        calendar_title = "Core Courses"
        output_dir = "out/ics"
        manifest_file = "out/calendars.json"

        [[targets]]
        name = "BS - Year 1"
        source = "bs1.json"
        semester_start = "2023-01-23"
        semester_end = "2023-03-19"
        "#,
    )
    .unwrap();
    config_path
}

#[test]
fn test_generate_writes_group_calendars_and_manifest() {
    let dir = unique_dir("generate");
    let config = Config::load(&write_config(&dir)).unwrap();

    let (reports, manifest) = controller::generate(&config).unwrap();
    assert_eq!(reports.len(), 1);
    // 2 groups x (2 Monday slots + 1 Tuesday slot)
    assert_eq!(reports[0].events, 6);

    assert_eq!(
        manifest.calendars,
        vec![
            ManifestCalendar {
                name: "B22-01".to_string(),
                course: "BS - Year 1".to_string(),
                file: "ics/BS-Year-1/B22-01.ics".to_string(),
            },
            ManifestCalendar {
                name: "B22-02".to_string(),
                course: "BS - Year 1".to_string(),
                file: "ics/BS-Year-1/B22-02.ics".to_string(),
            },
        ]
    );

    let stored: Manifest =
        serde_json::from_str(&fs::read_to_string(dir.join("out/calendars.json")).unwrap())
            .unwrap();
    assert_eq!(stored, manifest);
    assert_eq!(stored.title, "Core Courses");
    assert_eq!(stored.filters[0].alias, "course");

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_calendar_contents() {
    let dir = unique_dir("contents");
    let config = Config::load(&write_config(&dir)).unwrap();
    controller::generate(&config).unwrap();

    let b1 = fs::read_to_string(dir.join("out/ics/BS-Year-1/B22-01.ics")).unwrap();
    assert!(b1.starts_with("BEGIN:VCALENDAR"));
    assert!(b1.contains("X-WR-CALNAME:B22-01"));
    assert!(b1.contains("X-WR-TIMEZONE:Europe/Moscow"));
    assert!(b1.contains("SUMMARY:Analytic Geometry (lec)"));
    assert!(b1.contains("DTSTART;TZID=Europe/Moscow:20230123T090000"));
    assert!(b1.contains("RRULE:FREQ=WEEKLY;INTERVAL=1;UNTIL=20230319T235959Z"));
    assert!(b1.contains("LOCATION:108"));
    assert!(b1.contains("@example.edu"));

    // Ignored subjects never reach a calendar
    assert!(!b1.contains("Physical Education"));

    // Two override dates -> two VEVENTs on Tuesday without a rule
    assert_eq!(b1.matches("SUMMARY:Data Structures (lab)").count(), 2);
    assert!(b1.contains("LOCATION:301"));
    assert!(b1.contains("UID:0_"));
    assert!(b1.contains("UID:1_"));
    assert_eq!(b1.matches("RRULE").count(), 1);
    assert_eq!(b1.matches("BEGIN:VEVENT").count(), 3);

    let b2 = fs::read_to_string(dir.join("out/ics/BS-Year-1/B22-02.ics")).unwrap();
    assert!(b2.contains("SUMMARY:Data Structures (lab)"));
    assert!(b2.contains("DTSTART;TZID=Europe/Moscow:20230124T142000"));
    assert!(b2.contains("LOCATION:302"));
    assert_eq!(b2.matches("BEGIN:VEVENT").count(), 2);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_missing_sheet_fails_with_target_name() {
    let dir = unique_dir("missing");
    let config_path = write_config(&dir);
    fs::remove_file(dir.join("bs1.json")).unwrap();
    let config = Config::load(&config_path).unwrap();

    let err = controller::generate(&config).unwrap_err();
    assert!(format!("{:#}", err).contains("BS - Year 1"));

    let _ = fs::remove_dir_all(dir);
}
