// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound mail.
//!
//! The service only needs to deliver generated passwords. [`LogMailer`] is
//! the default sink: it writes messages to the log instead of sending them.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Notice carrying a freshly generated password.
    pub fn new_password(to: &str, password: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: "New password requested".to_string(),
            body: format!("Your new password is: {password}"),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mailer that logs instead of delivering.
///
/// The body is only emitted at `debug`, since it may carry a password.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        tracing::info!(to = %message.to, subject = %message.subject, "mail queued (log sink)");
        tracing::debug!(to = %message.to, body = %message.body, "mail body");
        Ok(())
    }
}
