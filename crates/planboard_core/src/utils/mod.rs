//! Stateless helpers shared by every layer.
//!
//! # Responsibility
//! - Date formatting/diffing, text cleanup, color math, input validation,
//!   id generation, collection helpers and human-readable formatting.
//!
//! # Invariants
//! - Functions here hold no state and never touch storage.

pub mod collections;
pub mod color;
pub mod date;
pub mod format;
pub mod text;
pub mod validation;

use uuid::Uuid;

/// Generates a fresh opaque entity id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
