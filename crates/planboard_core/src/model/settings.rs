//! User-facing application settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "12h")]
    H12,
}

/// Persisted settings object. Missing fields fall back to defaults so older
/// stored shapes keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    /// BCP 47 language tag; `ar` selects right-to-left labels.
    pub language: String,
    pub notifications: bool,
    pub auto_save: bool,
    pub date_format: String,
    pub time_format: TimeFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "ar".to_string(),
            notifications: true,
            auto_save: true,
            date_format: "dd/mm/yyyy".to_string(),
            time_format: TimeFormat::H24,
        }
    }
}

/// Merge-style settings update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub notifications: Option<bool>,
    pub auto_save: Option<bool>,
    pub date_format: Option<String>,
    pub time_format: Option<TimeFormat>,
}

impl SettingsPatch {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(language) = &self.language {
            settings.language = language.clone();
        }
        if let Some(notifications) = self.notifications {
            settings.notifications = notifications;
        }
        if let Some(auto_save) = self.auto_save {
            settings.auto_save = auto_save;
        }
        if let Some(date_format) = &self.date_format {
            settings.date_format = date_format.clone();
        }
        if let Some(time_format) = self.time_format {
            settings.time_format = time_format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, SettingsPatch, Theme, TimeFormat};

    #[test]
    fn partial_stored_shape_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.language, "ar");
        assert_eq!(settings.time_format, TimeFormat::H24);
        assert!(settings.auto_save);
    }

    #[test]
    fn patch_merges_over_existing_values() {
        let mut settings = Settings::default();
        SettingsPatch {
            language: Some("en".to_string()),
            notifications: Some(false),
            ..SettingsPatch::default()
        }
        .apply(&mut settings);
        assert_eq!(settings.language, "en");
        assert!(!settings.notifications);
        assert_eq!(settings.date_format, "dd/mm/yyyy");
        assert_eq!(
            serde_json::to_value(&settings).unwrap()["timeFormat"],
            "24h"
        );
    }
}
