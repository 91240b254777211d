// File: ./src/model/event.rs
use crate::model::recurrence::Recurrence;
use crate::model::subject::Subject;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Extra markers decoded from cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// When set, the event happens only on these dates instead of weekly.
    pub only_on: Vec<NaiveDate>,
}

impl Flags {
    pub fn is_single_occurrence(&self) -> bool {
        !self.only_on.is_empty()
    }
}

/// One weekly class of one group.
///
/// Created with group and time only, then filled by the cell decoder
/// (`apply_cell`) and finally by the builder (day, recurrence, course, timestamp).
#[derive(Debug, Clone)]
pub struct ScheduleEvent {
    pub subject: Option<Rc<Subject>>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Date of the first occurrence
    pub day: Option<NaiveDate>,
    pub location: Option<String>,
    pub instructor: Option<String>,
    pub event_type: Option<String>,
    pub group: String,
    pub course: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub created: Option<DateTime<Utc>>,
    pub flags: Flags,
}

impl ScheduleEvent {
    pub fn new(group: impl Into<String>, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            subject: None,
            start_time,
            end_time,
            day: None,
            location: None,
            instructor: None,
            event_type: None,
            group: group.into(),
            course: None,
            recurrence: None,
            created: None,
            flags: Flags::default(),
        }
    }

    /// A slot nobody teaches in.
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
    }

    pub fn subject_name(&self) -> Option<&str> {
        self.subject.as_deref().map(|s| s.name.as_str())
    }

    pub fn dtstart(&self) -> Option<NaiveDateTime> {
        self.day.map(|d| d.and_time(self.start_time))
    }

    pub fn dtend(&self) -> Option<NaiveDateTime> {
        self.day.map(|d| d.and_time(self.end_time))
    }
}

// Location, instructor and dates are descriptive only; they do not tell events apart.
impl PartialEq for ScheduleEvent {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.event_type == other.event_type
            && self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.group == other.group
    }
}
impl Eq for ScheduleEvent {}

impl Hash for ScheduleEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject_name().hash(state);
        self.event_type.hash(state);
        self.start_time.hash(state);
        self.end_time.hash(state);
        self.group.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubjectRegistry;
    use std::collections::HashSet;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_identity_ignores_descriptive_fields() {
        let mut registry = SubjectRegistry::new();
        let mut a = ScheduleEvent::new("B20-1", t(9, 0), t(10, 30));
        a.subject = Some(registry.canonicalize("Calculus (lec)"));
        a.event_type = Some("lec".to_string());
        a.location = Some("101".to_string());

        let mut b = a.clone();
        b.location = Some("108".to_string());
        b.instructor = Some("Dr. X".to_string());
        b.day = NaiveDate::from_ymd_opt(2023, 1, 23);

        assert_eq!(a, b);
        let set: HashSet<ScheduleEvent> = [a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 1);

        let mut c = a.clone();
        c.group = "B20-2".to_string();
        assert_ne!(a, c);
    }

    #[test]
    fn test_dtstart_requires_day() {
        let mut e = ScheduleEvent::new("B20-1", t(9, 0), t(10, 30));
        assert!(e.dtstart().is_none());
        e.day = NaiveDate::from_ymd_opt(2023, 1, 23);
        assert_eq!(e.dtend().unwrap().to_string(), "2023-01-23 10:30:00");
    }
}
