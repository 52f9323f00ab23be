use super::{AuthConfig, AuthError, AuthState, RegistrationRequest};
use crate::capability::{Notifier, SessionView, UserStore};
use crate::clock::{Clock, SystemClock};
use crate::model::notification::NewNotification;
use crate::model::user::{ProfilePatch, Role, User};
use crate::utils::generate_id;
use crate::utils::text::capitalize;
use crate::utils::validation::is_valid_email;
use log::{info, warn};

/// Authentication manager over an injected user store.
///
/// The optional notifier receives one user-facing message per outcome.
pub struct AuthManager<'s, S: UserStore + ?Sized> {
    store: &'s S,
    notifier: Option<&'s dyn Notifier>,
    config: AuthConfig,
    clock: Box<dyn Clock>,
    state: AuthState,
}

impl<'s, S: UserStore + ?Sized> AuthManager<'s, S> {
    /// Creates an anonymous manager. Call [`AuthManager::restore_session`]
    /// to pick up a persisted session.
    pub fn new(store: &'s S, config: AuthConfig) -> Self {
        Self {
            store,
            notifier: None,
            config,
            clock: Box::new(SystemClock),
            state: AuthState::Anonymous,
        }
    }

    pub fn with_notifier(mut self, notifier: &'s dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Adopts the persisted current user, if any. Returns whether a session
    /// was restored.
    pub fn restore_session(&mut self) -> bool {
        match self.store.load_current_user() {
            Some(user) => {
                info!(
                    "event=session_restore module=auth status=ok user_id={}",
                    user.id
                );
                self.state = AuthState::Authenticated(user);
                true
            }
            None => {
                info!("event=session_restore module=auth status=ok restored=false");
                self.state = AuthState::Anonymous;
                false
            }
        }
    }

    /// Signs in with any well-formed credentials.
    ///
    /// A registered user with the same email is reused with a fresh
    /// `last_login`; otherwise a new admin user named after the email's
    /// local part is created.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        let checked = require_present("email", email)
            .and_then(|_| require_present("password", password))
            .and_then(|_| require_valid_email(email));
        if let Err(err) = checked {
            return Err(self.reject("login", err));
        }

        self.simulate_latency();
        let now = self.clock.now();
        let user = match self.store.find_registered_user(email) {
            Some(mut user) => {
                user.last_login = now;
                if !self.store.save_registered_user(&user) {
                    warn!(
                        "event=login module=auth status=warn reason=registered_user_not_saved user_id={}",
                        user.id
                    );
                }
                user
            }
            None => User {
                id: generate_id(),
                name: name_from_email(email),
                email: email.to_string(),
                role: Role::Admin,
                avatar: None,
                created_at: now,
                last_login: now,
            },
        };

        self.establish_session("login", user.clone());
        self.notify(NewNotification::success(format!(
            "Welcome back, {}!",
            user.name
        )));
        Ok(user)
    }

    /// Creates a fresh admin user and signs it in.
    pub fn register(&mut self, request: &RegistrationRequest) -> Result<User, AuthError> {
        if let Err(err) = self.validate_registration(request) {
            return Err(self.reject("register", err));
        }

        self.simulate_latency();
        let now = self.clock.now();
        let user = User {
            id: generate_id(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            role: Role::Admin,
            avatar: None,
            created_at: now,
            last_login: now,
        };

        if !self.store.save_registered_user(&user) {
            warn!(
                "event=register module=auth status=warn reason=registered_user_not_saved user_id={}",
                user.id
            );
        }
        self.establish_session("register", user.clone());
        self.notify(NewNotification::success(format!(
            "Welcome, {}! Your account is ready.",
            user.name
        )));
        Ok(user)
    }

    /// Clears the in-memory and persisted session.
    pub fn logout(&mut self) {
        self.state = AuthState::Anonymous;
        if !self.store.clear_current_user() {
            warn!("event=logout module=auth status=warn reason=session_not_cleared");
        } else {
            info!("event=logout module=auth status=ok");
        }
        self.notify(NewNotification::success("Signed out."));
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.user().is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Admins hold every permission; other roles use their fixed set.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.current_user()
            .is_some_and(|user| user.role.allows(permission))
    }

    /// Merges `patch` into the current user and persists it.
    pub fn update_profile(&mut self, patch: &ProfilePatch) -> Result<User, AuthError> {
        let Some(current) = self.state.user() else {
            return Err(self.reject("profile_update", AuthError::NotAuthenticated));
        };
        if let Some(email) = &patch.email {
            if let Err(err) = require_valid_email(email.trim()) {
                return Err(self.reject("profile_update", err));
            }
        }

        let mut user = current.clone();
        patch.apply(&mut user);
        if !self.store.save_current_user(&user) {
            warn!(
                "event=profile_update module=auth status=warn reason=session_not_persisted user_id={}",
                user.id
            );
        }
        info!("event=profile_update module=auth status=ok user_id={}", user.id);
        self.state = AuthState::Authenticated(user.clone());
        self.notify(NewNotification::success("Profile updated."));
        Ok(user)
    }

    /// Validates a password change for the signed-in user. No password is
    /// stored, so success only means the input passed validation.
    pub fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let checked = if self.is_logged_in() {
            require_present("current password", current_password)
                .and_then(|_| require_present("new password", new_password))
                .and_then(|_| self.require_length(new_password))
        } else {
            Err(AuthError::NotAuthenticated)
        };
        if let Err(err) = checked {
            return Err(self.reject("password_change", err));
        }

        self.simulate_latency();
        info!("event=password_change module=auth status=ok");
        self.notify(NewNotification::success("Password changed."));
        Ok(())
    }

    fn validate_registration(&self, request: &RegistrationRequest) -> Result<(), AuthError> {
        require_present("name", request.name.trim())?;
        require_present("email", request.email.trim())?;
        require_present("password", &request.password)?;
        require_present("confirm password", &request.confirm_password)?;
        require_valid_email(request.email.trim())?;
        self.require_length(&request.password)?;
        if request.password != request.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }

    fn require_length(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.config.min_password_len {
            return Err(AuthError::PasswordTooShort {
                min: self.config.min_password_len,
            });
        }
        Ok(())
    }

    fn establish_session(&mut self, operation: &str, user: User) {
        if !self.store.save_current_user(&user) {
            warn!(
                "event={} module=auth status=warn reason=session_not_persisted user_id={}",
                operation, user.id
            );
        }
        info!(
            "event={} module=auth status=ok user_id={} role={}",
            operation,
            user.id,
            user.role.as_str()
        );
        self.state = AuthState::Authenticated(user);
    }

    fn reject(&self, operation: &str, err: AuthError) -> AuthError {
        warn!(
            "event={} module=auth status=error error_code={}",
            operation,
            err.code()
        );
        self.notify(NewNotification::error(err.to_string()));
        err
    }

    fn notify(&self, notification: NewNotification) {
        if let Some(notifier) = self.notifier {
            notifier.notify(notification);
        }
    }

    fn simulate_latency(&self) {
        if !self.config.simulated_latency.is_zero() {
            std::thread::sleep(self.config.simulated_latency);
        }
    }
}

impl<S: UserStore + ?Sized> SessionView for AuthManager<'_, S> {
    fn is_logged_in(&self) -> bool {
        AuthManager::is_logged_in(self)
    }

    fn session_user(&self) -> Option<User> {
        self.current_user().cloned()
    }
}

fn require_present(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(())
}

fn require_valid_email(email: &str) -> Result<(), AuthError> {
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

/// `"sara.k@example.com"` → `"Sara.k"`.
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    capitalize(local)
}
