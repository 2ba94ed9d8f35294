// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for unit and router tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::to_bytes, response::Response};
use serde_json::Value;

use crate::auth::{password::hash_password, Role, SigningSecret, TokenCodec};
use crate::mail::{MailError, MailMessage, Mailer};
use crate::models::{Customer, CustomerKind, NewCustomer};
use crate::state::AppState;
use crate::store::Store;

pub const TEST_SECRET: &str = "test-secret-0123456789abcdef-0123456789";

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(
        &SigningSecret::new(TEST_SECRET).unwrap(),
        Duration::from_secs(3600),
    )
}

pub fn test_state() -> AppState {
    AppState::new(Store::new(), test_codec())
}

/// Register a customer with the given login and roles.
pub async fn seed_identity(
    state: &AppState,
    email: &str,
    password: &str,
    roles: &[Role],
) -> Customer {
    let mut store = state.store.write().await;
    store
        .insert_customer(NewCustomer {
            name: "Test Customer".into(),
            email: email.into(),
            document: "31628382740".into(),
            kind: CustomerKind::Individual,
            phones: Vec::new(),
            addresses: Vec::new(),
            password_hash: hash_password(password).unwrap(),
            roles: roles.iter().copied().collect(),
        })
        .unwrap()
}

/// `Authorization` header value with a fresh token for `username`.
pub fn bearer(state: &AppState, username: &str) -> String {
    format!("Bearer {}", state.tokens.issue(username).unwrap())
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Mailer that keeps every message for inspection.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
