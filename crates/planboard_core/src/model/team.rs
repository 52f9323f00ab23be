//! Team member entity.

use super::{non_blank, require_text, Entity, EntityId, ValidationError};
use crate::utils::validation::is_valid_email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted team member record.
///
/// `updated_at` is absent until the first update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: EntityId,
    pub name: String,
    /// Free-form job title, e.g. "Designer".
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TeamMember {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        match &self.email {
            Some(email) if !is_valid_email(email) => {
                Err(ValidationError::InvalidEmail(email.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Up to two uppercase initials for avatar placeholders.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Entity for TeamMember {
    const KIND: &'static str = "team_member";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Creation input for a team member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTeamMember {
    pub name: String,
    pub role: String,
    pub email: Option<String>,
}

impl NewTeamMember {
    pub fn into_member(self, id: EntityId, now: DateTime<Utc>) -> TeamMember {
        TeamMember {
            id,
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            email: non_blank(self.email).map(|email| email.trim().to_string()),
            joined_at: now,
            updated_at: None,
        }
    }
}

/// Partial update for a team member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamMemberPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    /// Empty string clears the email.
    pub email: Option<String>,
}

impl TeamMemberPatch {
    pub fn apply(&self, member: &mut TeamMember) {
        if let Some(name) = &self.name {
            member.name = name.trim().to_string();
        }
        if let Some(role) = &self.role {
            member.role = role.trim().to_string();
        }
        if let Some(email) = &self.email {
            member.email = non_blank(Some(email.trim().to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTeamMember, TeamMemberPatch};
    use crate::model::ValidationError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn new_member_has_no_update_stamp_and_validates_email() {
        let mut member = NewTeamMember {
            name: "ada lovelace".to_string(),
            role: "Engineer".to_string(),
            email: Some("ada@example.com".to_string()),
        }
        .into_member("m1".to_string(), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        assert_eq!(member.updated_at, None);
        assert_eq!(member.initials(), "AL");
        assert!(member.validate().is_ok());

        TeamMemberPatch {
            email: Some("broken".to_string()),
            ..TeamMemberPatch::default()
        }
        .apply(&mut member);
        assert_eq!(
            member.validate(),
            Err(ValidationError::InvalidEmail("broken".to_string()))
        );
    }

    #[test]
    fn missing_updated_at_is_not_serialized() {
        let member = NewTeamMember {
            name: "Lin".to_string(),
            ..NewTeamMember::default()
        }
        .into_member("m2".to_string(), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let json = serde_json::to_value(&member).unwrap();
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("joinedAt").is_some());
    }
}
