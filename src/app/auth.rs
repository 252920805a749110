//! Account management and bearer-token auth.
//!
//! Passwords are stored as `salt$digest` where digest = sha256(salt || password),
//! both hex-encoded. Login issues an opaque random token persisted in
//! `api_tokens`; protected routes look the token up per request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_with_salt(&salt, password);
    format!("{}${}", hex::encode(salt), digest)
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    digest_with_salt(&salt, password) == digest_hex
}

fn digest_with_salt(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub async fn register(pool: &PgPool, username: &str, password: &str) -> Result<(), AuthError> {
    let existing = sqlx::query("SELECT 1 FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AuthError::DuplicateUsername);
    }

    sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
        .bind(username)
        .bind(hash_password(password))
        .execute(pool)
        .await?;
    Ok(())
}

/// Verifies the password and issues a fresh bearer token.
pub async fn login(pool: &PgPool, username: &str, password: &str) -> Result<String, AuthError> {
    let hash = fetch_password_hash(pool, username).await?;
    match hash {
        Some(stored) if verify_password(password, &stored) => {
            let token = new_token();
            sqlx::query("INSERT INTO api_tokens (token, username) VALUES ($1, $2)")
                .bind(&token)
                .bind(username)
                .execute(pool)
                .await?;
            Ok(token)
        }
        _ => Err(AuthError::InvalidCredentials),
    }
}

/// Resolves a bearer token to its username, if the token is known.
pub async fn authenticate(pool: &PgPool, token: &str) -> Result<Option<String>, AuthError> {
    let row = sqlx::query("SELECT username FROM api_tokens WHERE token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get::<String, _>("username")))
}

pub async fn change_password(
    pool: &PgPool,
    username: &str,
    old_password: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    let hash = fetch_password_hash(pool, username).await?;
    match hash {
        Some(stored) if verify_password(old_password, &stored) => {
            sqlx::query("UPDATE users SET password_hash = $1 WHERE username = $2")
                .bind(hash_password(new_password))
                .bind(username)
                .execute(pool)
                .await?;
            Ok(())
        }
        _ => Err(AuthError::InvalidCredentials),
    }
}

/// Deletes the account; tokens go with it (ON DELETE CASCADE).
pub async fn delete_account(pool: &PgPool, username: &str, password: &str) -> Result<(), AuthError> {
    let hash = fetch_password_hash(pool, username).await?;
    match hash {
        Some(stored) if verify_password(password, &stored) => {
            sqlx::query("DELETE FROM users WHERE username = $1")
                .bind(username)
                .execute(pool)
                .await?;
            Ok(())
        }
        _ => Err(AuthError::InvalidCredentials),
    }
}

async fn fetch_password_hash(pool: &PgPool, username: &str) -> Result<Option<String>, AuthError> {
    let row = sqlx::query("SELECT password_hash FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get::<String, _>("password_hash")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("x", "no-dollar-separator"));
        assert!(!verify_password("x", "zzzz$abcd"));
        assert!(!verify_password("x", ""));
    }
}
