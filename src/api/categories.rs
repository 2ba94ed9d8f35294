// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::{created, Created};
use crate::{
    error::ApiError,
    extractors::{PathId, ValidatedJson, ValidatedQuery},
    models::{Category, CategoryRequest, Page, PageRequest},
    state::AppState,
};

pub async fn list(State(state): State<AppState>) -> Json<Vec<Category>> {
    let store = state.store.read().await;
    Json(store.list_categories())
}

pub async fn page(
    State(state): State<AppState>,
    ValidatedQuery(request): ValidatedQuery<PageRequest>,
) -> Result<Json<Page<Category>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.page_categories(&request)?))
}

pub async fn find(
    PathId(id): PathId,
    State(state): State<AppState>,
) -> Result<Json<Category>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.find_category(id)?))
}

pub async fn insert(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> Result<Created<Category>, ApiError> {
    let mut store = state.store.write().await;
    let category = store.insert_category(request);
    tracing::info!(category_id = category.id, "category created");
    Ok(created(format!("/categories/{}", category.id), category))
}

pub async fn update(
    PathId(id): PathId,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CategoryRequest>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.update_category(id, request)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    PathId(id): PathId,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_category(id)?;
    tracing::info!(category_id = id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}
