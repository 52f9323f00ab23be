//! Versioned wrapper around every persisted value.
//!
//! Stored form: `{"value": <json>, "timestamp": <epoch-ms>, "version": "<semver>"}`.

use super::StorageResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub value: T,
    /// Write time in epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub version: String,
}

impl<T> Envelope<T> {
    pub fn wrap(value: T, timestamp: i64, version: impl Into<String>) -> Self {
        Self {
            value,
            timestamp,
            version: version.into(),
        }
    }

    pub fn is_version(&self, expected: &str) -> bool {
        self.version == expected
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_payload(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn from_payload(payload: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;

    #[test]
    fn payload_carries_value_timestamp_and_version() {
        let envelope = Envelope::wrap(vec![1, 2], 1_700_000_000_000, "1.0.0");
        let payload = envelope.to_payload().unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(json["value"], serde_json::json!([1, 2]));
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(json["version"], "1.0.0");
    }

    #[test]
    fn older_payload_without_version_still_decodes() {
        let envelope = Envelope::<Vec<u8>>::from_payload(r#"{"value":[7]}"#).unwrap();
        assert_eq!(envelope.value, vec![7]);
        assert!(!envelope.is_version("1.0.0"));
    }

    #[test]
    fn bare_value_is_rejected() {
        assert!(Envelope::<Vec<u8>>::from_payload("[7]").is_err());
    }
}
