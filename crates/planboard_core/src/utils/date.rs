//! Calendar date helpers.
//!
//! Dates cross storage and wire boundaries as `YYYY-MM-DD`. Older stored
//! shapes sometimes carry a full RFC 3339 timestamp instead; [`parse_date`]
//! and the [`flexible_date`] serde adapter accept both.

use chrono::{DateTime, NaiveDate, Utc};

const INPUT_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%-d %B %Y";

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, INPUT_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|instant| instant.with_timezone(&Utc).date_naive())
        })
}

/// Long human-readable date, e.g. `5 March 2024`. Empty for `None`.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|value| value.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// `YYYY-MM-DD` form used by date inputs. Empty for `None`.
pub fn format_date_for_input(date: Option<NaiveDate>) -> String {
    date.map(|value| value.format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

/// Absolute number of whole days between two dates.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> u64 {
    (end - start).num_days().unsigned_abs()
}

/// Whether `date` lies strictly before `today`. `None` is never overdue.
pub fn is_overdue(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    date.is_some_and(|value| value < today)
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Serde adapter for `Option<NaiveDate>` fields that tolerates timestamps
/// and blank strings on read and always writes `YYYY-MM-DD`.
pub mod flexible_date {
    use super::{format_date_for_input, parse_date};
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(_) => serializer.serialize_str(&format_date_for_input(*value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse_date(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date `{text}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{days_between, format_date, format_date_for_input, is_overdue, parse_date};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_accepts_plain_and_timestamp_forms() {
        assert_eq!(parse_date("2024-02-29"), Some(date(2024, 2, 29)));
        assert_eq!(
            parse_date("2024-02-29T18:30:00.000Z"),
            Some(date(2024, 2, 29))
        );
        assert_eq!(parse_date("  "), None);
        assert_eq!(parse_date("29/02/2024"), None);
    }

    #[test]
    fn formats_for_display_and_input() {
        assert_eq!(format_date(Some(date(2024, 3, 5))), "5 March 2024");
        assert_eq!(format_date_for_input(Some(date(2024, 3, 5))), "2024-03-05");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn days_between_is_absolute() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 11)), 10);
        assert_eq!(days_between(date(2024, 1, 11), date(2024, 1, 1)), 10);
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        let today = date(2024, 6, 10);
        assert!(is_overdue(Some(date(2024, 6, 9)), today));
        assert!(!is_overdue(Some(today), today));
        assert!(!is_overdue(None, today));
    }
}
