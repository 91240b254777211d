// File: ./src/model/display.rs
use crate::model::event::ScheduleEvent;

pub trait EventDisplay {
    fn title(&self) -> String;
    fn description(&self) -> String;
    fn time_range(&self) -> String;
}

impl EventDisplay for ScheduleEvent {
    /// "Software Project (lec)", or just the subject when there is no type.
    fn title(&self) -> String {
        let mut s = self.subject_name().unwrap_or_default().to_string();
        if let Some(t) = &self.event_type {
            s.push_str(&format!(" ({})", t));
        }
        s
    }

    fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    /// "Key: value" lines for every non-empty field.
    fn description(&self) -> String {
        let time = self.time_range();
        let fields = [
            ("Location", self.location.as_deref()),
            ("Instructor", self.instructor.as_deref()),
            ("Type", self.event_type.as_deref()),
            ("Group", Some(self.group.as_str())),
            ("Subject", self.subject_name()),
            ("Time", Some(time.as_str())),
        ];
        fields
            .iter()
            .filter_map(|(key, value)| match value {
                Some(v) if !v.is_empty() => Some(format!("{}: {}", key, v)),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
