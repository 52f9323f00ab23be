//! Authenticated user and role permissions.

use super::{Entity, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role granted to a user. Unrecognized stored roles are kept verbatim in
/// `Other` and grant nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    Admin,
    Editor,
    Viewer,
    Other(String),
}

const EDITOR_PERMISSIONS: &[&str] = &["read", "write", "edit"];
const VIEWER_PERMISSIONS: &[&str] = &["read"];

impl Role {
    /// Fixed permission set; `Admin` is unrestricted and has no list.
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Self::Editor => EDITOR_PERMISSIONS,
            Self::Viewer => VIEWER_PERMISSIONS,
            Self::Admin | Self::Other(_) => &[],
        }
    }

    pub fn allows(&self, permission: &str) -> bool {
        match self {
            Self::Admin => true,
            _ => self.permissions().contains(&permission),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "admin" => Self::Admin,
            "editor" => Self::Editor,
            "viewer" => Self::Viewer,
            _ => Self::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Profile fields a signed-in user may change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Empty string removes the avatar.
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            user.email = email.trim().to_string();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = super::non_blank(Some(avatar.clone()));
        }
    }
}
