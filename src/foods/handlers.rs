use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::foods::dto::FoodRecord;
use crate::foods::service::is_valid_upc;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/foods/search", get(search_foods))
        .route("/foods/autocomplete", get(autocomplete_foods))
        .route("/foods/barcode/:code", get(barcode_lookup))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<FoodRecord>> {
    Json(state.foods.search(&params.q).await)
}

#[instrument(skip(state))]
pub async fn autocomplete_foods(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<String>> {
    Json(state.foods.autocomplete(&params.q).await)
}

#[instrument(skip(state))]
pub async fn barcode_lookup(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(code): Path<String>,
) -> Result<Json<FoodRecord>, (StatusCode, String)> {
    if !is_valid_upc(&code) {
        return Err((StatusCode::BAD_REQUEST, "barcode must be 6-14 digits".into()));
    }
    match state.foods.lookup_by_code(&code).await {
        Some(record) => Ok(Json(record)),
        None => Err((StatusCode::NOT_FOUND, "no food matched this barcode".into())),
    }
}
