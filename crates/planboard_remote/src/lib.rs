//! Server-backed variant of planboard.
//!
//! # Responsibility
//! - Keep the bearer token and cached user ([`SessionStore`]).
//! - Call the REST API with a blocking client ([`ApiClient`]).
//! - Aggregate dashboard figures from remote projects and tasks.
//!
//! # Invariants
//! - An expired session (HTTP 401) always clears the local session first.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod session;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use dashboard::{load_dashboard, ProjectProgress, RemoteDashboard, RemoteWorkspace};
pub use error::{ApiError, ApiResult, LOGIN_ROUTE};
pub use session::SessionStore;
