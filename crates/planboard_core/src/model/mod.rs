//! Domain model for persisted planboard entities.
//!
//! # Responsibility
//! - Define the JSON shapes persisted by the storage layer.
//! - Provide drafts (`New*`) for creation and patches (`*Patch`) for
//!   merge-style partial updates.
//!
//! # Invariants
//! - Every collection entity carries a stable opaque `id`.
//! - Patches only overwrite the fields they carry.
//! - Persisted field names are camelCase.

pub mod backup;
pub mod notification;
pub mod project;
pub mod settings;
pub mod task;
pub mod team;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Opaque entity identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = String;

/// A record stored inside one of the persisted collections.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Short name used in log events.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Priority shared by projects and tasks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Draft or merged-entity validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required text field is blank after trim.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// End date precedes start date.
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    /// Progress outside 0..=100.
    #[error("progress {0} is outside 0..=100")]
    ProgressOutOfRange(u8),
    /// Color is not `#rrggbb`.
    #[error("invalid color `{0}`; expected #rrggbb")]
    InvalidColor(String),
    /// Email does not match `local@domain.tld`.
    #[error("invalid email `{0}`")]
    InvalidEmail(String),
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn require_date_order(
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(ValidationError::InvalidDateRange { start, end })
        }
        _ => Ok(()),
    }
}

/// Normalizes optional free text: blank becomes `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{non_blank, require_date_order, Priority, ValidationError};
    use chrono::NaiveDate;

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(Priority::parse(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn date_order_rejects_inverted_range() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            require_date_order(Some(start), Some(end)),
            Err(ValidationError::InvalidDateRange { start, end })
        );
        assert!(require_date_order(Some(start), None).is_ok());
    }

    #[test]
    fn non_blank_drops_whitespace_only_text() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some("x".to_string())), Some("x".to_string()));
    }
}
