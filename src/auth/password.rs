//! bcrypt runs on the blocking pool so hashing never stalls the runtime.

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub async fn hash(plain: String, cost: u32) -> AppResult<String> {
    if plain.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await
        .map_err(|e| AppError::internal(format!("hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify(plain: String, hashed: String) -> AppResult<bool> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hashed))
        .await
        .map_err(|e| AppError::internal(format!("verify task failed: {}", e)))?;
    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!("stored password hash could not be checked: {}", e);
            Ok(false)
        }
    }
}
