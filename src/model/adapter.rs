// File: src/model/adapter.rs
use crate::model::display::EventDisplay;
use crate::model::event::ScheduleEvent;
use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{Component, Event, Property};
use uuid::Uuid;

/// Calendar-wide settings needed to render single events.
#[derive(Debug, Clone, Copy)]
pub struct IcsOptions<'a> {
    /// TZID for DTSTART/DTEND. Empty means floating local time.
    pub timezone: &'a str,
    pub uid_domain: &'a str,
}

impl ScheduleEvent {
    /// Stable identifier derived from what the event is and when it first happens.
    /// Name-based UUID (v5) over subject, type, times, group and first day.
    pub fn uid(&self, domain: &str) -> String {
        let identity = format!(
            "{}|{}|{}|{}|{}|{}",
            self.subject_name().unwrap_or_default(),
            self.event_type.as_deref().unwrap_or_default(),
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.group,
            self.day.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        );
        let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, identity.as_bytes());
        format!("{}@{}", id, domain)
    }

    /// VEVENTs for this event: one carrying the weekly RRULE, or one per override date.
    /// Empty slots produce nothing.
    pub fn to_vevents(&self, opts: &IcsOptions) -> Result<Vec<Event>> {
        let Some(subject) = self.subject.as_deref() else {
            return Ok(Vec::new());
        };
        let day = self
            .day
            .ok_or_else(|| anyhow!("Event '{}' for {} has no day", self.title(), self.group))?;
        let uid = self.uid(opts.uid_domain);

        let mut base = Event::new();
        base.summary(&self.title());
        base.description(&self.description());
        base.add_property("CATEGORIES", subject.name.as_str());
        base.add_property("COLOR", subject.color().to_string());
        if let Some(created) = self.created {
            base.timestamp(created);
        }
        if let Some(location) = &self.location {
            base.add_property("LOCATION", location.as_str());
        }

        if self.flags.is_single_occurrence() {
            return Ok(self
                .flags
                .only_on
                .iter()
                .enumerate()
                .map(|(i, date)| {
                    let mut vevent = base.clone();
                    vevent.uid(&format!("{}_{}", i, uid));
                    self.set_times(&mut vevent, *date, opts.timezone);
                    vevent
                })
                .collect());
        }

        let mut vevent = base;
        vevent.uid(&uid);
        self.set_times(&mut vevent, day, opts.timezone);
        if let Some(recurrence) = &self.recurrence {
            vevent.add_property("RRULE", recurrence.to_rrule());
        }
        Ok(vec![vevent])
    }

    fn set_times(&self, vevent: &mut Event, date: NaiveDate, timezone: &str) {
        vevent.append_property(time_property(
            "DTSTART",
            date.and_time(self.start_time),
            timezone,
        ));
        vevent.append_property(time_property("DTEND", date.and_time(self.end_time), timezone));
    }
}

fn time_property(key: &str, dt: NaiveDateTime, timezone: &str) -> Property {
    let mut prop = Property::new(key, &dt.format("%Y%m%dT%H%M%S").to_string());
    if !timezone.is_empty() {
        prop.add_parameter("TZID", timezone);
    }
    prop
}
