// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-way password hashing (Argon2id, PHC string format).
//!
//! Request handlers use the `*_blocking` wrappers, which run Argon2 on
//! tokio's blocking pool.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{distributions::Alphanumeric, Rng};
use thiserror::Error;

/// Length of passwords produced by [`generate_password`].
pub const GENERATED_PASSWORD_LEN: usize = 10;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// An unparseable stored hash never verifies.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| PasswordError(e.to_string()))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(plain: String, stored_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&plain, &stored_hash))
        .await
        .unwrap_or(false)
}

/// Spend the cost of one verification without a stored hash, so that an
/// unknown username takes as long as a wrong password.
pub async fn verify_against_dummy(plain: String) {
    let _ = tokio::task::spawn_blocking(move || {
        static DUMMY_HASH: OnceLock<String> = OnceLock::new();
        let hash = DUMMY_HASH.get_or_init(|| hash_password("dummy-password").unwrap_or_default());
        verify_password(&plain, hash)
    })
    .await;
}

/// Random alphanumeric password for the forgotten-password flow.
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}
