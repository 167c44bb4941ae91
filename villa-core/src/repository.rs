use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stay::StayRange;

/// A persisted, admitted stay bound to an authenticated user. Never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The insert was rejected by the store's range-exclusion constraint.
    /// This is the only authoritative conflict signal.
    #[error("stay overlaps an existing reservation")]
    Overlap,

    #[error("reservation store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Atomic conditional insert: the overlap check and the write must happen
    /// as one operation, so two concurrent overlapping inserts can never both
    /// succeed.
    async fn insert(&self, user_id: Uuid, range: StayRange) -> Result<Uuid, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Reservation>, StoreError>;
}

/// In-memory store enforcing the overlap rule under a mutex, so the whole
/// check-and-insert is one critical section. Used by tests and local
/// development; production uses the Postgres exclusion constraint.
#[derive(Default)]
pub struct MemoryReservationStore {
    rows: std::sync::Mutex<Vec<Reservation>>,
}

impl MemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn insert(&self, user_id: Uuid, range: StayRange) -> Result<Uuid, StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let overlaps = rows
            .iter()
            .any(|r| range.start < r.end_date && r.start_date < range.end);
        if overlaps {
            return Err(StoreError::Overlap);
        }

        let id = Uuid::new_v4();
        rows.push(Reservation {
            id,
            user_id,
            start_date: range.start,
            end_date: range.end,
        });
        Ok(id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }
}
