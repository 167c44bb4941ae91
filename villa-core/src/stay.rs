use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A half-open stay interval `[start, end)` on the property timeline.
///
/// Two stays may touch (one ending the day the other starts) but never
/// overlap. Construct through `validate_stay` so the invariants hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StayRange {
    /// Whole nights in the stay. Strictly positive for a validated range.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StayError {
    #[error("You cannot reserve dates in the past.")]
    PastDate,
    #[error("The end date must be after the start date.")]
    InvalidRange,
}

/// Parse a submitted stay date. Accepts a plain `YYYY-MM-DD` value or an
/// RFC 3339 timestamp, which is truncated to its calendar date (time of day
/// never matters for a stay).
pub fn parse_stay_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Some(date);
    }
    raw.parse::<DateTime<FixedOffset>>()
        .ok()
        .map(|ts| ts.date_naive())
}

/// The single stay validation, shared by the date selector and the
/// reservation authority so the trust boundary re-runs exactly the same
/// rules the client already applied.
pub fn validate_stay(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<StayRange, StayError> {
    if start < today || end < today {
        return Err(StayError::PastDate);
    }
    if end <= start {
        return Err(StayError::InvalidRange);
    }
    Ok(StayRange { start, end })
}
