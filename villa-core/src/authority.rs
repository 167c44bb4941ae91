use chrono::NaiveDate;
use tracing::{error, info};
use uuid::Uuid;

use crate::repository::{ReservationStore, StoreError};
use crate::stay::{parse_stay_date, validate_stay, StayError};

#[derive(Debug, thiserror::Error)]
pub enum ReserveError {
    #[error("You cannot reserve dates in the past.")]
    PastDate,
    #[error("The end date must be after the start date.")]
    InvalidRange,
    #[error("Those dates are already reserved.")]
    Conflict,
    #[error("Server error.")]
    Store(String),
}

/// Admit or reject a candidate stay for an authenticated user. This is the
/// single entry point behind every submission route.
///
/// Validation never trusts the client; both raw dates are re-parsed and
/// re-checked here. The overlap check is NOT done as a query-then-insert
/// (two concurrent requests could both pass the query); the store's
/// constrained insert is the only overlap check, and its rejection is the
/// only conflict signal.
pub async fn reserve(
    store: &dyn ReservationStore,
    today: NaiveDate,
    user_id: Uuid,
    start_raw: &str,
    end_raw: &str,
) -> Result<Uuid, ReserveError> {
    let start = parse_stay_date(start_raw).ok_or(ReserveError::InvalidRange)?;
    let end = parse_stay_date(end_raw).ok_or(ReserveError::InvalidRange)?;

    let range = validate_stay(start, end, today).map_err(|e| match e {
        StayError::PastDate => ReserveError::PastDate,
        StayError::InvalidRange => ReserveError::InvalidRange,
    })?;

    match store.insert(user_id, range).await {
        Ok(id) => {
            info!(
                "Reservation admitted: {} [{} .. {}) for user {}",
                id, range.start, range.end, user_id
            );
            Ok(id)
        }
        Err(StoreError::Overlap) => Err(ReserveError::Conflict),
        Err(StoreError::Unavailable(msg)) => {
            error!("Reservation store failure: {}", msg);
            Err(ReserveError::Store(msg))
        }
    }
}
