// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity lookup: resolves a username to stored credentials and roles.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use validator::Validate;

use super::{
    password::{verify_against_dummy, verify_password_blocking},
    roles::RoleSet,
    AuthError,
};
use crate::store::Store;

/// Login request body.
#[derive(Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Stored identity as seen by the auth core (read-only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
    pub roles: RoleSet,
}

/// Collaborator that owns identities.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Load the identity stored under `username`.
    async fn find_by_username(&self, username: &str) -> Option<Identity>;

    /// Check credentials against the stored one-way hash.
    ///
    /// Unknown usernames and wrong passwords fail with the same error after
    /// one hash verification each.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let Some(identity) = self.find_by_username(&credentials.username).await else {
            verify_against_dummy(credentials.password.clone()).await;
            return Err(AuthError::InvalidCredentials);
        };

        if verify_password_blocking(credentials.password.clone(), identity.password_hash.clone())
            .await
        {
            Ok(identity)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Identity lookup backed by the customer records of the store.
///
/// The customer email is the username.
#[derive(Clone)]
pub struct StoreIdentityLookup {
    store: Arc<RwLock<Store>>,
}

impl StoreIdentityLookup {
    pub fn new(store: Arc<RwLock<Store>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentityLookup for StoreIdentityLookup {
    async fn find_by_username(&self, username: &str) -> Option<Identity> {
        let store = self.store.read().await;
        store.customer_by_email(username).map(|customer| Identity {
            id: customer.id,
            username: customer.email.clone(),
            password_hash: customer.password_hash.clone(),
            roles: customer.roles.clone(),
        })
    }
}
