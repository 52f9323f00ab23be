//! Project entity.
//!
//! # Invariants
//! - `name` is non-empty after trim.
//! - `progress` stays within 0..=100.
//! - `end_date >= start_date` when both are set.
//! - Tasks reference their project through `Task::project_id`; the project
//!   itself does not list its tasks.

use super::{
    non_blank, require_date_order, require_text, Entity, EntityId, Priority, ValidationError,
};
use crate::utils::color::{is_hex_color, random_project_color};
use crate::utils::date::flexible_date;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    #[serde(alias = "on_hold")]
    OnHold,
    Pending,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "on-hold" | "on_hold" => Some(Self::OnHold),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Persisted project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `#rrggbb`.
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: Priority,
    /// Stored percentage; see `stats::apply_progress` for the computed form.
    #[serde(default, deserialize_with = "clamped_progress")]
    pub progress: u8,
    #[serde(default, with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date")]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    "#3b82f6".to_string()
}

/// Reads any stored number, rounds it and clamps it into 0..=100.
/// `null` reads as 0.
fn clamped_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(match raw {
        Some(value) if value.is_finite() => value.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    })
}

impl Project {
    /// Checks field-level invariants on a complete record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        if self.progress > 100 {
            return Err(ValidationError::ProgressOutOfRange(self.progress));
        }
        if !is_hex_color(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        require_date_order(self.start_date, self.end_date)
    }
}

impl Entity for Project {
    const KIND: &'static str = "project";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Creation input for a project.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    /// Random palette color when `None`.
    pub color: Option<String>,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub progress: u8,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Materializes the draft with a fresh identity and timestamps.
    pub fn into_project(self, id: EntityId, now: DateTime<Utc>) -> Project {
        Project {
            id,
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            color: self
                .color
                .unwrap_or_else(|| random_project_color().to_string()),
            status: self.status,
            priority: self.priority,
            progress: self.progress,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a project. `None` leaves the field untouched.
///
/// An empty `description` clears the stored description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub progress: Option<u8>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProjectPatch {
    pub fn apply(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            project.description = non_blank(Some(description.clone()));
        }
        if let Some(color) = &self.color {
            project.color = color.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(progress) = self.progress {
            project.progress = progress;
        }
        if self.start_date.is_some() {
            project.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            project.end_date = self.end_date;
        }
    }
}
