//! Typed attribute values.
//!
//! Enumerated attributes never fail to parse: unknown strings are kept as
//! `Other(raw)` and reflected back verbatim so the stylesheet sees exactly
//! what the author wrote.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display, Formatter};

/// Read-only access to an element's attributes.
pub trait AttributeSource {
    /// Raw attribute value, `Some("")` for a bare boolean attribute.
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl AttributeSource for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: std::hash::BuildHasher> AttributeSource for HashMap<String, String, S> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl AttributeSource for [(String, String)] {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// HTML boolean attribute semantics: presence means `true`.
#[must_use]
pub fn flag(source: &(impl AttributeSource + ?Sized), name: &str) -> bool {
    source.attribute(name).is_some()
}

/// Side of the trigger a floating panel is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Above the trigger.
    Top,
    /// Below the trigger.
    Bottom,
    /// Left of the trigger.
    Left,
    /// Right of the trigger.
    Right,
}

impl Side {
    /// Lowercase name used in class modifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// `position` attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Position {
    /// `top` (default).
    #[default]
    Top,
    /// `bottom`.
    Bottom,
    /// `left`.
    Left,
    /// `right`.
    Right,
    /// Any other string, kept verbatim.
    Other(String),
}

impl Position {
    /// Parse an attribute value. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "right" => Self::Right,
            other => Self::Other(other.to_string()),
        }
    }

    /// Value reflected into the stylesheet-facing attribute.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Other(raw) => raw,
        }
    }

    /// Side used for geometry. Unrecognised values place the panel on top.
    #[must_use]
    pub const fn side(&self) -> Side {
        match self {
            Self::Top | Self::Other(_) => Side::Top,
            Self::Bottom => Side::Bottom,
            Self::Left => Side::Left,
            Self::Right => Side::Right,
        }
    }
}

impl Display for Position {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// `sort-type` attribute value of a table column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortType {
    /// Case-sensitive code point comparison (default).
    #[default]
    Text,
    /// Numeric comparison; non-numeric cells sort last.
    Number,
    /// Any other string, kept verbatim and compared as text.
    Other(String),
}

impl SortType {
    /// Parse an attribute value. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "text" => Self::Text,
            "number" => Self::Number,
            other => Self::Other(other.to_string()),
        }
    }

    /// Value reflected back into markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Other(raw) => raw,
        }
    }

    /// Whether cells compare numerically.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Number)
    }
}

/// Active sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest key first.
    Ascending,
    /// Largest key first.
    Descending,
}

impl SortDirection {
    /// Parse an `aria-sort` value; `none`/`other`/unknown yield `None`.
    #[must_use]
    pub fn from_aria(raw: &str) -> Option<Self> {
        match raw {
            "ascending" => Some(Self::Ascending),
            "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// `aria-sort` vocabulary.
    #[must_use]
    pub const fn as_aria(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_position_is_kept_verbatim() {
        let position = Position::parse("top-start");
        assert_eq!(position, Position::Other("top-start".into()));
        assert_eq!(position.as_str(), "top-start");
        assert_eq!(position.side(), Side::Top);
        assert_eq!(Position::parse("right").side(), Side::Right);
    }

    #[test]
    fn sort_type_round_trips_raw_values() {
        assert!(SortType::parse("number").is_numeric());
        assert_eq!(SortType::parse("date").as_str(), "date");
        assert!(!SortType::parse("date").is_numeric());
    }

    #[test]
    fn direction_reads_aria_vocabulary() {
        assert_eq!(
            SortDirection::from_aria("ascending"),
            Some(SortDirection::Ascending)
        );
        assert_eq!(SortDirection::from_aria("none"), None);
        assert_eq!(
            SortDirection::Ascending.flipped(),
            SortDirection::Descending
        );
    }

    #[test]
    fn flag_uses_presence() {
        let mut attrs = BTreeMap::new();
        attrs.insert("multiselectable".to_string(), String::new());
        assert!(flag(&attrs, "multiselectable"));
        assert!(!flag(&attrs, "bordered"));

        let pairs = vec![("bordered".to_string(), "false".to_string())];
        assert!(flag(pairs.as_slice(), "bordered"));
    }
}
