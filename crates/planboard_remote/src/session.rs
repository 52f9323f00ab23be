//! Bearer token and cached user for the server-backed front end.
//!
//! # Invariants
//! - Values live under the raw keys `token` and `user` with no envelope and
//!   no prefix.
//! - The session is authenticated exactly when a non-empty token is stored.

use crate::model::RemoteUser;
use log::{debug, warn};
use planboard_core::storage::StorageResult;
use planboard_core::KeyValueBackend;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

pub struct SessionStore<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> SessionStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stores the signed-in user and the token issued for them.
    pub fn set_user(&self, user: &RemoteUser, token: &str) -> StorageResult<()> {
        let payload = serde_json::to_string(user)?;
        self.backend.set_raw(USER_KEY, &payload)?;
        self.backend.set_raw(TOKEN_KEY, token)?;
        debug!(
            "event=session_store module=remote status=ok user_id={}",
            user.id
        );
        Ok(())
    }

    /// Cached user; `None` when absent, unreadable or not valid JSON.
    pub fn user(&self) -> Option<RemoteUser> {
        let raw = match self.backend.get_raw(USER_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(
                    "event=session_read module=remote status=error key={} error_code={}",
                    USER_KEY,
                    err.code()
                );
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(_) => {
                warn!(
                    "event=session_read module=remote status=error key={} error_code=decode",
                    USER_KEY
                );
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.backend.get_raw(TOKEN_KEY) {
            Ok(token) => token.filter(|value| !value.is_empty()),
            Err(err) => {
                warn!(
                    "event=session_read module=remote status=error key={} error_code={}",
                    TOKEN_KEY,
                    err.code()
                );
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Removes both the user and the token.
    pub fn logout(&self) -> StorageResult<()> {
        let user = self.backend.remove(USER_KEY);
        let token = self.backend.remove(TOKEN_KEY);
        debug!("event=session_clear module=remote status=ok");
        user.and(token)
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionStore, TOKEN_KEY, USER_KEY};
    use crate::model::RemoteUser;
    use planboard_core::{KeyValueBackend, MemoryKeyValueBackend};

    fn user() -> RemoteUser {
        RemoteUser {
            id: "u1".to_string(),
            username: "mona".to_string(),
            email: "mona@example.com".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn set_user_stores_raw_values_and_logout_clears_both() {
        let session = SessionStore::new(MemoryKeyValueBackend::new());
        assert!(!session.is_authenticated());

        session.set_user(&user(), "jwt-1").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("jwt-1"));
        assert_eq!(session.user(), Some(user()));
        assert_eq!(
            session.backend().get_raw(TOKEN_KEY).unwrap().as_deref(),
            Some("jwt-1")
        );

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert_eq!(session.backend().get_raw(USER_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_user_reads_as_none() {
        let backend = MemoryKeyValueBackend::new();
        backend.set_raw(USER_KEY, "{not json").unwrap();
        let session = SessionStore::new(&backend);
        assert_eq!(session.user(), None);
    }
}
