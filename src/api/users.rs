// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;

use crate::auth::{Authenticated, RoleSet, SecurityContext};

/// Response for GET /users/me
#[derive(Debug, Serialize)]
pub struct UserMeResponse {
    /// Customer record backing the login
    pub id: u64,
    /// Login name (customer email)
    pub username: String,
    /// Roles granted when this request was authenticated
    pub roles: RoleSet,
}

impl From<SecurityContext> for UserMeResponse {
    fn from(context: SecurityContext) -> Self {
        Self {
            id: context.customer_id,
            username: context.username,
            roles: context.roles,
        }
    }
}

/// Get the current authenticated user's identity and roles.
pub async fn current_user(Authenticated(context): Authenticated) -> Json<UserMeResponse> {
    Json(context.into())
}
