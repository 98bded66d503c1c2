//! Target definitions and interval override parsing.
//!
//! A target may carry its own polling interval as a `#<seconds>` suffix:
//! `https://example.com/status#30` is probed every 30 seconds. Overrides
//! below [`MIN_INTERVAL_SECS`] are ignored and the default interval applies.

use std::fmt;
use std::time::Duration;

/// Smallest interval override, in seconds, a target may request.
pub const MIN_INTERVAL_SECS: u64 = 5;

/// A URL to probe together with its effective polling interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: String,
    interval: Duration,
}

impl Target {
    /// Create a target with an explicit interval.
    pub fn new(url: impl Into<String>, interval: Duration) -> Self {
        Self {
            url: url.into(),
            interval,
        }
    }

    /// Parse a raw target string.
    ///
    /// The `#<digits>` suffix is always stripped from the URL. Values that
    /// don't parse or fall below [`MIN_INTERVAL_SECS`] fall back to
    /// `default_interval`.
    pub fn parse(raw: &str, default_interval: Duration) -> Self {
        let Some((url, digits)) = split_interval_suffix(raw) else {
            return Self::new(raw, default_interval);
        };

        let interval = digits
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs >= MIN_INTERVAL_SECS)
            .map(Duration::from_secs)
            .unwrap_or(default_interval);

        Self::new(url, interval)
    }

    /// The URL to probe, without any interval suffix.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The effective polling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Split `url#123` into `("url", "123")`.
fn split_interval_suffix(raw: &str) -> Option<(&str, &str)> {
    let (url, digits) = raw.rsplit_once('#')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((url, digits))
}
