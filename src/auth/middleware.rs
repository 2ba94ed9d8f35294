// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization filter.
//!
//! Runs once per request:
//!
//! 1. Reads `Authorization: Bearer <token>`.
//! 2. If the token verifies and its subject still resolves to an identity,
//!    attaches a [`SecurityContext`] to the request extensions.
//! 3. Applies the public allow-list: public requests always continue, other
//!    requests without a context are rejected with 401.
//!
//! A missing, malformed, expired or forged token never aborts the filter by
//! itself; the request simply carries no context.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, SecurityContext};
use crate::state::AppState;

/// Scheme prefix of the `Authorization` header value.
pub const TOKEN_PREFIX: &str = "Bearer ";

/// Authorization filter middleware.
///
/// # Usage
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/orders", get(orders::page))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), authorize));
/// ```
pub async fn authorize(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(context) = resolve_context(&state, request.headers()).await {
        request.extensions_mut().insert(context);
    }

    let public = state
        .access
        .is_public(request.method(), request.uri().path());
    if !public && request.extensions().get::<SecurityContext>().is_none() {
        tracing::debug!(
            method = %request.method(),
            path = request.uri().path(),
            "rejecting unauthenticated request"
        );
        return AuthError::TokenInvalid.into_response();
    }

    next.run(request).await
}

/// Build the security context for the bearer token in `headers`, if any.
async fn resolve_context(state: &AppState, headers: &HeaderMap) -> Option<SecurityContext> {
    let header = headers.get(AUTHORIZATION)?;

    let Some(token) = bearer_token(header) else {
        tracing::debug!("ignoring authorization header without bearer token");
        return None;
    };

    let subject = match state.tokens.validate(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring invalid bearer token");
            return None;
        }
    };

    match state.identities.find_by_username(&subject).await {
        Some(identity) => Some(SecurityContext::from_identity(&identity)),
        None => {
            tracing::warn!(subject = %subject, "token subject no longer resolves to an identity");
            None
        }
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn bearer_token(value: &HeaderValue) -> Option<&str> {
    value
        .to_str()
        .ok()?
        .strip_prefix(TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Header value carrying a freshly issued token.
pub fn bearer_header(token: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(&format!("{TOKEN_PREFIX}{token}"))
        .map_err(|e| AuthError::InternalError(format!("Unrepresentable token header: {e}")))
}
