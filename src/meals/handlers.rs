use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::AppError;
use crate::meals::dto::{CreateMealRequest, MealDetails, MealListItem};
use crate::meals::model::Selection;
use crate::meals::services::spawn_enrichment;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", delete(delete_meal))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<MealListItem>>, AppError> {
    // Kick off the best-effort back-fill; the response does not wait for it.
    spawn_enrichment(&state);
    let meals = state.meals.list().await?;
    Ok(Json(meals.iter().map(MealListItem::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MealDetails>, (StatusCode, String)> {
    let meals = state
        .meals
        .list()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match meals.into_iter().find(|m| m.id == id) {
        Some(meal) => Ok(Json(meal.into())),
        None => Err((StatusCode::NOT_FOUND, "Meal not found".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<MealDetails>), AppError> {
    let meal = Selection::from(payload.foods).build(&payload.name, payload.photo)?;
    let meal = state.meals.save(meal).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::LOCATION,
        format!("/api/v1/meals/{}", meal.id).parse().unwrap(),
    );

    Ok((StatusCode::CREATED, headers, Json(meal.into())))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.meals.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
