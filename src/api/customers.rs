// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Customer registration and management.
//!
//! Registration is public. Reads and updates of a single customer are open
//! to that customer and to administrators; listing and deletion are
//! administrator operations (enforced by the router's policy layer).

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::{created, Created};
use crate::{
    auth::{password::hash_password_blocking, AuthError, Authenticated, Role},
    error::ApiError,
    extractors::{PathId, ValidatedJson, ValidatedQuery},
    models::{
        Customer, CustomerUpdateRequest, EmailQuery, NewCustomer, NewCustomerRequest, Page,
        PageRequest,
    },
    state::AppState,
};

/// `POST /customers`: register a new customer account.
pub async fn insert(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NewCustomerRequest>,
) -> Result<Created<Customer>, ApiError> {
    // Hash before taking the store lock.
    let password_hash = hash_password_blocking(request.password)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let mut store = state.store.write().await;
    let customer = store.insert_customer(NewCustomer {
        name: request.name,
        email: request.email,
        document: request.document,
        kind: request.kind,
        phones: request.phones,
        addresses: request.address.into_iter().map(Into::into).collect(),
        password_hash,
        roles: [Role::Customer].into_iter().collect(),
    })?;

    tracing::info!(customer_id = customer.id, "customer registered");
    Ok(created(format!("/customers/{}", customer.id), customer))
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Customer>> {
    let store = state.store.read().await;
    Json(store.list_customers())
}

pub async fn page(
    State(state): State<AppState>,
    ValidatedQuery(request): ValidatedQuery<PageRequest>,
) -> Result<Json<Page<Customer>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.page_customers(&request)?))
}

pub async fn find(
    PathId(id): PathId,
    State(state): State<AppState>,
    Authenticated(context): Authenticated,
) -> Result<Json<Customer>, ApiError> {
    context.ensure_owner_or_admin(id)?;
    let store = state.store.read().await;
    Ok(Json(store.find_customer(id)?))
}

/// `GET /customers/email?value=`
///
/// Non-administrators may only look up their own email, so a lookup never
/// reveals whether another account exists.
pub async fn find_by_email(
    State(state): State<AppState>,
    Authenticated(context): Authenticated,
    ValidatedQuery(query): ValidatedQuery<EmailQuery>,
) -> Result<Json<Customer>, ApiError> {
    if !context.is_admin() && !context.username.eq_ignore_ascii_case(&query.value) {
        return Err(AuthError::Forbidden.into());
    }
    let store = state.store.read().await;
    Ok(Json(store.find_customer_by_email(&query.value)?))
}

pub async fn update(
    PathId(id): PathId,
    State(state): State<AppState>,
    Authenticated(context): Authenticated,
    ValidatedJson(request): ValidatedJson<CustomerUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    context.ensure_owner_or_admin(id)?;
    let mut store = state.store.write().await;
    store.update_customer(id, request)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    PathId(id): PathId,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_customer(id)?;
    tracing::info!(customer_id = id, "customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
