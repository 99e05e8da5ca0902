use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

// Account holder referenced by financial_assets.user_id. The password is
// stored as a hash, never plaintext, and never serialized back out.
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validates a user's fields. The hash is only checked for presence when
/// supplied; password strength rules apply before hashing, upstream.
#[allow(dead_code)]
pub fn validate_user(email: &str, password_hash: Option<&str>) -> Result<(), AppError> {
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid");

    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    if !email_regex.is_match(email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    if let Some(hash) = password_hash {
        if hash.is_empty() {
            return Err(AppError::Validation(
                "Password hash cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
