// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// User roles for authorization.
///
/// ## Roles
///
/// - `Admin` - Catalog management plus every customer and order
/// - `Customer` - Own customer record and own orders
///
/// There is no hierarchy: an administrator account simply holds both roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Registered customer
    Customer,
}

/// Set of roles granted to an identity.
pub type RoleSet = BTreeSet<Role>;

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Customer => "CUSTOMER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when `granted` shares at least one role with `required`.
pub fn intersects(granted: &RoleSet, required: &[Role]) -> bool {
    required.iter().any(|role| granted.contains(role))
}
