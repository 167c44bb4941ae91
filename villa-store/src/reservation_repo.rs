use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use villa_core::repository::{Reservation, ReservationStore, StoreError};
use villa_core::stay::StayRange;

/// SQLSTATE raised when an insert trips the range-exclusion constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: row.id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    /// One plain insert; the `reservations` table's exclusion constraint on
    /// `daterange(start_date, end_date)` does the overlap check atomically
    /// inside the same statement. Nothing queries first.
    async fn insert(&self, user_id: Uuid, range: StayRange) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO reservations (id, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, user_id, start_date, end_date FROM reservations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(row.map(Reservation::from))
    }
}

/// A `23P01` from the constraint is a normal booking conflict; everything
/// else is a store failure. Matching is on SQLSTATE, never on message text.
fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(EXCLUSION_VIOLATION) => {
            StoreError::Overlap
        }
        _ => StoreError::Unavailable(e.to_string()),
    }
}
