// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless token authentication and role-based authorization for the
//! storefront API.
//!
//! ## Auth Flow
//!
//! 1. Client sends `POST /login` with `{username, password}`
//! 2. Server verifies the password against the stored Argon2 hash and returns
//!    `Authorization: Bearer <JWT>` (HS512, fixed expiration window)
//! 3. Client sends the same header on every later request
//! 4. The authorization filter verifies the token, reloads the identity's
//!    current roles and attaches a [`SecurityContext`] to that request only
//! 5. Protected operations check the context's roles against
//!    [`policy::ACCESS_POLICY`]
//!
//! ## Security
//!
//! - No server-side session: all state round-trips through the token
//! - Public allow-list bypasses authentication per method and path
//! - Zero clock leeway on expiry

pub mod access;
pub mod context;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod roles;
pub mod token;

pub use access::AccessRules;
pub use context::SecurityContext;
pub use error::AuthError;
pub use extractor::{Authenticated, MaybeAuthenticated};
pub use identity::{Credentials, Identity, IdentityLookup, StoreIdentityLookup};
pub use policy::{enforce_policy, Operation};
pub use roles::{Role, RoleSet};
pub use token::{SigningSecret, TokenCodec, TokenError};
