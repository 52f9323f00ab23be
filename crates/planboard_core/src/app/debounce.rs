//! Quiet-period debouncing for search input.

use chrono::{DateTime, Duration, Utc};

/// Default quiet period between the last keystroke and a search.
pub const DEFAULT_QUIET_PERIOD_MS: i64 = 300;

/// Holds the latest input until it has been stable for the quiet period.
///
/// Time is passed in by the caller, so the debouncer has no timer of its
/// own.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet_period: Duration,
    pending: Option<(String, DateTime<Utc>)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_QUIET_PERIOD_MS))
    }
}

impl SearchDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Records new input, restarting the quiet period.
    pub fn input(&mut self, query: impl Into<String>, at: DateTime<Utc>) {
        self.pending = Some((query.into(), at));
    }

    /// Releases the pending query once the quiet period has elapsed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now - *at >= self.quiet_period => {
                self.pending.take().map(|(query, _)| query)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::SearchDebouncer;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn only_last_input_fires_after_quiet_period() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut debouncer = SearchDebouncer::default();

        debouncer.input("we", start);
        debouncer.input("web", start + Duration::milliseconds(100));
        assert_eq!(debouncer.poll(start + Duration::milliseconds(350)), None);
        assert_eq!(
            debouncer.poll(start + Duration::milliseconds(400)).as_deref(),
            Some("web")
        );
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::seconds(5)), None);
    }
}
