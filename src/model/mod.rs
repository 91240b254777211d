// File: ./src/model/mod.rs
pub mod adapter;
pub mod display;
pub mod event;
pub mod parser;
pub mod recurrence;
pub mod subject;

pub use adapter::IcsOptions;
pub use display::EventDisplay;
pub use event::{Flags, ScheduleEvent};
pub use recurrence::{Recurrence, RecurrenceEngine};
pub use subject::{Subject, SubjectRegistry};
