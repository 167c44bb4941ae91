use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Profile fields returned by the caller-identity lookup. Never carries the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub email: String,
}

/// Registration input as submitted by the sign-up form. Email and password
/// presence is checked by the handler, not the deserializer, so an empty
/// field gets a 400 instead of a rejection.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Browsers submit an untouched date field as an empty string, which is not
/// an invalid date, just an absent one.
fn empty_date_as_none<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Claims carried in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
}

/// Password policy: at least 15 characters, or at least 8 characters with at
/// least one lowercase letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    if password.len() >= 15 {
        return true;
    }

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    password.len() >= 8 && has_lowercase && has_digit
}
