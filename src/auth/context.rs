// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped security context.

use serde::Serialize;

use super::{
    identity::Identity,
    roles::{intersects, Role, RoleSet},
    AuthError,
};

/// Authenticated identity attached to a single request.
///
/// Built by the authorization filter from the identity's *current* roles and
/// stored in the request extensions. It is dropped with the request and never
/// shared between requests.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SecurityContext {
    /// Customer record backing the identity
    pub customer_id: u64,
    /// Login name (customer email)
    pub username: String,
    /// Roles granted at lookup time
    pub roles: RoleSet,
}

impl SecurityContext {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            customer_id: identity.id,
            username: identity.username.clone(),
            roles: identity.roles.clone(),
        }
    }

    /// Check if the context holds at least one of `required`.
    pub fn has_any_role(&self, required: &[Role]) -> bool {
        intersects(&self.roles, required)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Admins reach every customer; everyone else only their own record.
    pub fn ensure_owner_or_admin(&self, customer_id: u64) -> Result<(), AuthError> {
        if self.is_admin() || self.customer_id == customer_id {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}
