use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("invalid check-in timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    #[error("invalid timeframe {0:?}, expected a day count such as 7d, 30d or 90d")]
    InvalidTimeframe(String),
}

pub type AnalyticsOutcome<T> = Result<T, AnalyticsError>;
