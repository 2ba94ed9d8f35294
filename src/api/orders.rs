// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Orders are always placed for, and listed from, the authenticated customer.

use axum::{
    extract::State,
    Json,
};

use super::{created, Created};
use crate::{
    auth::Authenticated,
    error::ApiError,
    extractors::{PathId, ValidatedJson, ValidatedQuery},
    models::{NewOrderRequest, Order, Page, PageRequest},
    state::AppState,
};

pub async fn find(
    PathId(id): PathId,
    State(state): State<AppState>,
    Authenticated(context): Authenticated,
) -> Result<Json<Order>, ApiError> {
    let store = state.store.read().await;
    let order = store.find_order(id)?;
    context.ensure_owner_or_admin(order.customer_id)?;
    Ok(Json(order))
}

pub async fn insert(
    State(state): State<AppState>,
    Authenticated(context): Authenticated,
    ValidatedJson(request): ValidatedJson<NewOrderRequest>,
) -> Result<Created<Order>, ApiError> {
    let mut store = state.store.write().await;
    let order = store.insert_order(context.customer_id, request)?;
    tracing::info!(
        order_id = order.id,
        customer_id = order.customer_id,
        total = order.total,
        "order placed"
    );
    Ok(created(format!("/orders/{}", order.id), order))
}

/// `GET /orders`: the caller's own orders, newest first by default.
pub async fn page(
    State(state): State<AppState>,
    Authenticated(context): Authenticated,
    ValidatedQuery(request): ValidatedQuery<PageRequest>,
) -> Result<Json<Page<Order>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.page_orders_of(context.customer_id, &request)?))
}
