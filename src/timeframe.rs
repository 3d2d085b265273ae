use chrono::{DateTime, Duration, Utc};

use crate::error::{AnalyticsError, AnalyticsOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeframe {
    label: String,
    days: i64,
}

impl Timeframe {
    /// Parses a `<N>d` label such as `7d`, `30d` or `90d`.
    pub fn parse(label: &str) -> AnalyticsOutcome<Self> {
        let invalid = || AnalyticsError::InvalidTimeframe(label.to_string());
        let days = label
            .trim()
            .strip_suffix('d')
            .and_then(|n| n.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .ok_or_else(invalid)?;

        Ok(Self {
            label: label.trim().to_string(),
            days,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days)
    }
}
