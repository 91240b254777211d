// File: ./src/model/subject.rs
use crate::color_utils::{Css3Color, subject_color};
use crate::error::LookupError;
use crate::model::parser::normalize_subject_name;
use std::cell::Cell;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A canonical subject. Identity is the normalized name.
#[derive(Debug)]
pub struct Subject {
    pub name: String,
    ignored: Cell<bool>,
}

impl Subject {
    fn new(name: String) -> Self {
        Self {
            name,
            ignored: Cell::new(false),
        }
    }

    /// Ignored subjects are parsed as usual but never written to calendars.
    pub fn is_ignored(&self) -> bool {
        self.ignored.get()
    }

    pub fn color(&self) -> Css3Color {
        subject_color(&self.name)
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for Subject {}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Deduplicates subjects for one parsing run.
///
/// Subjects are handed out as `Rc`, so a registry and everything it produced stay on
/// the thread that created them. Parallel runs each build their own registry.
#[derive(Debug, Default)]
pub struct SubjectRegistry {
    by_name: HashMap<String, Rc<Subject>>,
    order: Vec<Rc<Subject>>,
}

impl SubjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `raw` and returns the one shared instance for that name,
    /// creating it on first sight.
    pub fn canonicalize(&mut self, raw: &str) -> Rc<Subject> {
        let name = normalize_subject_name(raw);
        if let Some(existing) = self.by_name.get(&name) {
            return Rc::clone(existing);
        }
        let subject = Rc::new(Subject::new(name.clone()));
        self.by_name.insert(name, Rc::clone(&subject));
        self.order.push(Rc::clone(&subject));
        subject
    }

    /// Looks up an already-normalized name without creating anything.
    pub fn get(&self, name: &str) -> Result<Rc<Subject>, LookupError> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| LookupError {
                name: name.to_string(),
            })
    }

    /// Every subject, in order of first creation.
    pub fn list_all(&self) -> &[Rc<Subject>] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn mark_ignored<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.canonicalize(name.as_ref()).ignored.set(true);
        }
    }
}
