// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only state and city lookup used to fill in registration addresses.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    extractors::PathId,
    models::{City, Province},
    state::AppState,
};

/// `GET /states`
pub async fn list_states(State(state): State<AppState>) -> Json<Vec<Province>> {
    let store = state.store.read().await;
    Json(store.list_provinces())
}

/// `GET /states/{id}/cities`
pub async fn list_cities(
    PathId(id): PathId,
    State(state): State<AppState>,
) -> Result<Json<Vec<City>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.cities_of(id)?))
}
