// File: ./src/model/recurrence.rs
use crate::model::event::ScheduleEvent;
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rrule::RRuleSet;
use std::str::FromStr;

// A semester never has more weeks than this; guards against a runaway iterator.
const MAX_OCCURRENCES: usize = 104;

/// Weekly repetition ending on a fixed date (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recurrence {
    pub interval: u32,
    pub until: NaiveDate,
}

impl Recurrence {
    pub fn weekly_until(until: NaiveDate) -> Self {
        Self { interval: 1, until }
    }

    /// RRULE value. UNTIL is upgraded to end-of-day UTC because RFC 5545 requires
    /// it to be a UTC date-time whenever DTSTART carries a time.
    pub fn to_rrule(&self) -> String {
        format!(
            "FREQ=WEEKLY;INTERVAL={};UNTIL={}T235959Z",
            self.interval,
            self.until.format("%Y%m%d")
        )
    }
}

pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Concrete dates on which the event takes place.
    ///
    /// Override dates win over the weekly rule. Without a rule the event happens once,
    /// on its anchor day.
    pub fn occurrences(event: &ScheduleEvent) -> Result<Vec<NaiveDate>> {
        let day = event
            .day
            .ok_or_else(|| anyhow!("Event for group {} has no day", event.group))?;

        if event.flags.is_single_occurrence() {
            let mut dates = event.flags.only_on.clone();
            dates.sort();
            dates.dedup();
            return Ok(dates);
        }

        let Some(recurrence) = &event.recurrence else {
            return Ok(vec![day]);
        };
        if recurrence.until < day {
            return Ok(Vec::new());
        }

        let seed = day.and_time(event.start_time).and_utc();
        let rrule_string = format!(
            "DTSTART:{}\nRRULE:{}\n",
            seed.format("%Y%m%dT%H%M%SZ"),
            recurrence.to_rrule()
        );
        let rrule_set = RRuleSet::from_str(&rrule_string)
            .map_err(|e| anyhow!("Invalid recurrence '{}': {}", rrule_string.trim(), e))?;

        Ok(rrule_set
            .into_iter()
            .take(MAX_OCCURRENCES)
            .map(|d| d.to_utc().date_naive())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn event_on(day: NaiveDate) -> ScheduleEvent {
        let mut e = ScheduleEvent::new(
            "B20-1",
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
        );
        e.day = Some(day);
        e
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rrule_string() {
        let r = Recurrence::weekly_until(date(2023, 3, 19));
        assert_eq!(r.to_rrule(), "FREQ=WEEKLY;INTERVAL=1;UNTIL=20230319T235959Z");
    }

    #[test]
    fn test_weekly_occurrences_until_inclusive() {
        let mut e = event_on(date(2023, 1, 23));
        e.recurrence = Some(Recurrence::weekly_until(date(2023, 2, 13)));
        let dates = RecurrenceEngine::occurrences(&e).unwrap();
        assert_eq!(
            dates,
            vec![date(2023, 1, 23), date(2023, 1, 30), date(2023, 2, 6), date(2023, 2, 13)]
        );
    }

    #[test]
    fn test_override_dates_replace_rule() {
        let mut e = event_on(date(2023, 1, 23));
        e.recurrence = Some(Recurrence::weekly_until(date(2023, 5, 1)));
        e.flags.only_on = vec![date(2023, 6, 18), date(2023, 6, 14), date(2023, 6, 14)];
        let dates = RecurrenceEngine::occurrences(&e).unwrap();
        assert_eq!(dates, vec![date(2023, 6, 14), date(2023, 6, 18)]);
    }

    #[test]
    fn test_no_rule_means_single_day() {
        let e = event_on(date(2023, 1, 23));
        assert_eq!(RecurrenceEngine::occurrences(&e).unwrap(), vec![date(2023, 1, 23)]);
    }

    #[test]
    fn test_until_before_anchor_yields_nothing() {
        let mut e = event_on(date(2023, 1, 23));
        e.recurrence = Some(Recurrence::weekly_until(date(2023, 1, 1)));
        assert!(RecurrenceEngine::occurrences(&e).unwrap().is_empty());
    }
}
