use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use villa_core::identity::{NewUser, UserProfile};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("Email already exists.")]
    DuplicateEmail,
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

pub struct PgUserRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    password_hash: String,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    first_name: Option<String>,
    last_name: Option<String>,
    birth_date: Option<NaiveDate>,
    gender: Option<String>,
    country: Option<String>,
    email: String,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. Email uniqueness is left to the database's unique
    /// index; a `23505` comes back as `DuplicateEmail`.
    pub async fn create(&self, user: &NewUser, password_hash: &str) -> Result<Uuid, UserStoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, birth_date, gender, country, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.birth_date)
        .bind(&user.gender)
        .bind(&user.country)
        .bind(&user.email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                UserStoreError::DuplicateEmail
            }
            _ => UserStoreError::Unavailable(e.to_string()),
        })?;

        Ok(id)
    }

    /// Id and password hash for a login attempt, or None for an unknown
    /// email.
    pub async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(Uuid, String)>, UserStoreError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::Unavailable(e.to_string()))?;

        Ok(row.map(|r| (r.id, r.password_hash)))
    }

    pub async fn load_profile(&self, id: Uuid) -> Result<Option<UserProfile>, UserStoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT first_name, last_name, birth_date, gender, country, email FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::Unavailable(e.to_string()))?;

        Ok(row.map(|r| UserProfile {
            first_name: r.first_name,
            last_name: r.last_name,
            birth_date: r.birth_date,
            gender: r.gender,
            country: r.country,
            email: r.email,
        }))
    }
}
