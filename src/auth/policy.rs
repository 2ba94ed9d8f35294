// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role gating of protected operations.
//!
//! Every protected operation has an [`Operation`] identifier and one entry in
//! [`ACCESS_POLICY`]. The router wraps each protected handler in
//! [`enforce_policy`] with its identifier as middleware state:
//!
//! ```rust,ignore
//! delete(categories::delete.layer(middleware::from_fn_with_state(
//!     Operation::CategoryDelete,
//!     enforce_policy,
//! )))
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, Role, SecurityContext};

/// Identifier of a protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CategoryInsert,
    CategoryUpdate,
    CategoryDelete,
    ProductInsert,
    CustomerList,
    CustomerPage,
    CustomerFind,
    CustomerFindByEmail,
    CustomerUpdate,
    CustomerDelete,
    OrderFind,
    OrderInsert,
    OrderPage,
    TokenRefresh,
    CurrentUser,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::CategoryInsert,
        Operation::CategoryUpdate,
        Operation::CategoryDelete,
        Operation::ProductInsert,
        Operation::CustomerList,
        Operation::CustomerPage,
        Operation::CustomerFind,
        Operation::CustomerFindByEmail,
        Operation::CustomerUpdate,
        Operation::CustomerDelete,
        Operation::OrderFind,
        Operation::OrderInsert,
        Operation::OrderPage,
        Operation::TokenRefresh,
        Operation::CurrentUser,
    ];
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Any authenticated identity.
const AUTHENTICATED: &[Role] = &[];

/// Operation → roles of which the caller needs at least one.
pub const ACCESS_POLICY: &[(Operation, &[Role])] = &[
    (Operation::CategoryInsert, ADMIN_ONLY),
    (Operation::CategoryUpdate, ADMIN_ONLY),
    (Operation::CategoryDelete, ADMIN_ONLY),
    (Operation::ProductInsert, ADMIN_ONLY),
    (Operation::CustomerList, ADMIN_ONLY),
    (Operation::CustomerPage, ADMIN_ONLY),
    (Operation::CustomerDelete, ADMIN_ONLY),
    (Operation::CustomerFind, AUTHENTICATED),
    (Operation::CustomerFindByEmail, AUTHENTICATED),
    (Operation::CustomerUpdate, AUTHENTICATED),
    (Operation::OrderFind, AUTHENTICATED),
    (Operation::OrderInsert, AUTHENTICATED),
    (Operation::OrderPage, AUTHENTICATED),
    (Operation::TokenRefresh, AUTHENTICATED),
    (Operation::CurrentUser, AUTHENTICATED),
];

/// Roles required by `operation`.
///
/// An operation missing from the table is treated as admin-only.
pub fn required_roles(operation: Operation) -> &'static [Role] {
    ACCESS_POLICY
        .iter()
        .find(|(op, _)| *op == operation)
        .map(|(_, roles)| *roles)
        .unwrap_or(ADMIN_ONLY)
}

/// Decide whether `context` may invoke `operation`.
pub fn authorize(
    context: Option<&SecurityContext>,
    operation: Operation,
) -> Result<(), AuthError> {
    let context = context.ok_or(AuthError::TokenInvalid)?;
    let required = required_roles(operation);

    if required.is_empty() || context.has_any_role(required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Middleware enforcing [`ACCESS_POLICY`] for the operation given as state.
pub async fn enforce_policy(
    State(operation): State<Operation>,
    request: Request,
    next: Next,
) -> Response {
    let context = request.extensions().get::<SecurityContext>();

    if let Err(err) = authorize(context, operation) {
        tracing::debug!(
            ?operation,
            user = context.map(|c| c.username.as_str()).unwrap_or("<anonymous>"),
            error_code = err.error_code(),
            "operation denied"
        );
        return err.into_response();
    }

    next.run(request).await
}
