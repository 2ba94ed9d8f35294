// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the request's security context.
//!
//! The authorization filter stores the [`SecurityContext`] in the request
//! extensions; handlers receive it as an explicit parameter:
//!
//! ```rust,ignore
//! async fn my_handler(Authenticated(ctx): Authenticated) -> impl IntoResponse {
//!     // ctx is this request's SecurityContext
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, SecurityContext};

/// Extractor for authenticated requests.
///
/// Rejects with `TokenInvalid` (401) when the filter attached no context.
pub struct Authenticated(pub SecurityContext);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(Authenticated)
            .ok_or(AuthError::TokenInvalid)
    }
}

/// Optional authentication extractor.
///
/// Returns `None` on anonymous requests instead of rejecting.
pub struct MaybeAuthenticated(pub Option<SecurityContext>);

impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticated(
            parts.extensions.get::<SecurityContext>().cloned(),
        ))
    }
}
