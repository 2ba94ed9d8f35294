// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    Json,
};

use super::{created, Created};
use crate::{
    error::ApiError,
    extractors::{PathId, ValidatedJson, ValidatedQuery},
    models::{Page, PageRequest, Product, ProductRequest, ProductSearch},
    state::AppState,
};

/// `GET /products?name=&categories=1,2&page=&lines_per_page=&order_by=&direction=`
pub async fn search(
    State(state): State<AppState>,
    ValidatedQuery(search): ValidatedQuery<ProductSearch>,
    ValidatedQuery(request): ValidatedQuery<PageRequest>,
) -> Result<Json<Page<Product>>, ApiError> {
    let category_ids = search.category_ids()?;
    let store = state.store.read().await;
    Ok(Json(store.search_products(
        &search.name,
        &category_ids,
        &request,
    )?))
}

pub async fn find(
    PathId(id): PathId,
    State(state): State<AppState>,
) -> Result<Json<Product>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.find_product(id)?))
}

pub async fn insert(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<Created<Product>, ApiError> {
    let mut store = state.store.write().await;
    let product = store.insert_product(request)?;
    tracing::info!(product_id = product.id, "product created");
    Ok(created(format!("/products/{}", product.id), product))
}
