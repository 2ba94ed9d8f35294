// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup; a bad value stops the server before it binds.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS512 signing secret, at least 32 bytes | Required |
//! | `JWT_EXPIRATION_SECS` | Token lifetime in seconds | `86400` |
//! | `ALLOW_FRAME_EMBEDDING` | Omit `X-Frame-Options: DENY` | `false` |
//! | `SEED_DEMO_DATA` | Load the demo catalog and locations at startup | `false` |
//! | `ADMIN_EMAIL` / `ADMIN_PASSWORD` | Bootstrap administrator account | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::auth::{SigningSecret, TokenError};
use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the token signing secret. Required.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRATION_ENV: &str = "JWT_EXPIRATION_SECS";
pub const ALLOW_FRAME_EMBEDDING_ENV: &str = "ALLOW_FRAME_EMBEDDING";
pub const SEED_DEMO_DATA_ENV: &str = "SEED_DEMO_DATA";
pub const ADMIN_EMAIL_ENV: &str = "ADMIN_EMAIL";
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// One day.
pub const DEFAULT_JWT_EXPIRATION_SECS: u64 = 86_400;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("invalid JWT_SECRET: {0}")]
    Secret(#[from] TokenError),
}

/// Administrator account created at startup when absent.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub secret: SigningSecret,
    pub token_expiration: Duration,
    pub allow_frame_embedding: bool,
    pub seed_demo_data: bool,
    pub admin: Option<AdminSeed>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: host,
            })?;

        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let secret = SigningSecret::new(secret)?;

        let expiration_secs = match lookup(JWT_EXPIRATION_ENV) {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: JWT_EXPIRATION_ENV,
                        value,
                    })
                }
            },
            None => DEFAULT_JWT_EXPIRATION_SECS,
        };

        let admin = match (lookup(ADMIN_EMAIL_ENV), lookup(ADMIN_PASSWORD_ENV)) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(ADMIN_PASSWORD_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(ADMIN_EMAIL_ENV)),
        };

        Ok(Self {
            bind_addr,
            secret,
            token_expiration: Duration::from_secs(expiration_secs),
            allow_frame_embedding: flag(&lookup, ALLOW_FRAME_EMBEDDING_ENV)?,
            seed_demo_data: flag(&lookup, SEED_DEMO_DATA_ENV)?,
            admin,
            log_format: lookup(LOG_FORMAT_ENV)
                .map(|value| LogFormat::from_name(&value))
                .unwrap_or_default(),
        })
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<bool, ConfigError> {
    match lookup(name) {
        Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid { name, value }),
        None => Ok(false),
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
