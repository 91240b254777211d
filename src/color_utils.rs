//timegrid/src/color_utils.rs

// Deterministic calendar colors for subjects.
// Colors are CSS3 color names (RFC 7986 COLOR property) picked by hashing the subject
// name, so the same subject gets the same color in every group's calendar.

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Dark-enough CSS3 named colors that stay readable with white text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum Css3Color {
    Brown,
    CadetBlue,
    Chocolate,
    DarkCyan,
    DarkGreen,
    DarkMagenta,
    DarkOliveGreen,
    DarkRed,
    DarkSlateBlue,
    DarkSlateGray,
    DimGray,
    Firebrick,
    ForestGreen,
    Gray,
    IndianRed,
    LightSlateGray,
    Maroon,
    MediumVioletRed,
    MidnightBlue,
    Indigo,
    RebeccaPurple,
    SeaGreen,
    Teal,
}

/// Picks a palette entry for a subject name.
pub fn subject_color(name: &str) -> Css3Color {
    let id = uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, name.as_bytes());
    let idx = (id.as_u128() % Css3Color::COUNT as u128) as usize;
    Css3Color::iter().nth(idx).unwrap_or(Css3Color::Gray)
}
