// File: ./src/builder.rs
//! Turns partitioned slot records into dated, recurring events.
use crate::error::{FormatError, Result};
use crate::grid::Partition;
use crate::model::parser::parse_time_slot;
use crate::model::{Recurrence, ScheduleEvent, SubjectRegistry};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

/// First date on or after `from` falling on `weekday`.
pub fn nearest_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let days = (7 + weekday.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        % 7;
    from + Duration::days(days)
}

/// Builds events for every group of every slot.
///
/// Output order follows the partition: day, course, slot, group. Empty cells still
/// yield an (empty) event so that every group/slot pair is accounted for.
/// `created` stamps every event and supplies the year for override dates.
pub fn build(
    partition: &Partition,
    registry: &mut SubjectRegistry,
    semester_start: NaiveDate,
    semester_end: NaiveDate,
    created: DateTime<Utc>,
) -> Result<Vec<ScheduleEvent>> {
    let recurrence = Recurrence::weekly_until(semester_end);
    let year = created.year();
    let mut events = Vec::new();

    log::info!("Converting separation to ScheduleEvent");
    for day in &partition.days {
        log::info!(" > Parsing day {}", day.name);
        let anchor = nearest_weekday(semester_start, day.weekday);

        for course in &day.courses {
            log::debug!("  > Parsing course {}", course.name);
            if course.groups.is_empty() {
                continue;
            }
            for slot in &course.slots {
                let (start, end) =
                    parse_time_slot(&slot.label).ok_or_else(|| FormatError::TimeSlot {
                        label: slot.label.clone(),
                        row: slot.row,
                        day: day.name.clone(),
                        course: course.name.clone(),
                    })?;

                for (group, lines) in course.groups.iter().zip(&slot.cells) {
                    let mut event = ScheduleEvent::new(group.name.as_str(), start, end);
                    if !lines.is_empty() {
                        event.apply_cell(lines, registry, year).map_err(|e| {
                            FormatError::Cell {
                                day: day.name.clone(),
                                course: course.name.clone(),
                                group: group.name.clone(),
                                label: slot.label.clone(),
                                row: slot.row,
                                source: Box::new(e),
                            }
                        })?;
                    }
                    event.day = Some(anchor);
                    event.recurrence = Some(recurrence);
                    event.course = Some(course.name.clone());
                    event.created = Some(created);
                    events.push(event);
                }
            }
        }
    }
    log::info!("Built {} events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nearest_weekday_same_day() {
        // 2023-01-23 is a Monday
        assert_eq!(nearest_weekday(date(2023, 1, 23), Weekday::Mon), date(2023, 1, 23));
    }

    #[test]
    fn test_nearest_weekday_never_goes_back() {
        // 2023-01-25 is a Wednesday
        let start = date(2023, 1, 25);
        assert_eq!(nearest_weekday(start, Weekday::Mon), date(2023, 1, 30));
        assert_eq!(nearest_weekday(start, Weekday::Tue), date(2023, 1, 31));
        assert_eq!(nearest_weekday(start, Weekday::Thu), date(2023, 1, 26));
        for weekday in [Weekday::Mon, Weekday::Wed, Weekday::Sun] {
            let anchor = nearest_weekday(start, weekday);
            assert!(anchor >= start);
            assert!(anchor - start < Duration::days(7));
            assert_eq!(anchor.weekday(), weekday);
        }
    }
}
