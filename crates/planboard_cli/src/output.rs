//! Terminal output helpers.

use anyhow::Result;
use serde::Serialize;

/// Pretty JSON on stdout.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn done(message: impl AsRef<str>) {
    println!("ok: {}", message.as_ref());
}
