// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storefront Server - catalog, customer and order API
//!
//! A stateless token-authenticated REST service. Every request is
//! authenticated on its own from the bearer token it carries; nothing about
//! a login is kept on the server.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Token codec, authorization filter and role policy
//! - `store` - In-memory catalog, customer and order tables
//! - `config` - Environment configuration
//! - `logging` - Tracing subscriber setup
//! - `mail` - Outbound mail (logged by default)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod mail;
pub mod models;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
