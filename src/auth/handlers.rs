use axum::{routing::get, Json, Router};
use tracing::instrument;

use crate::auth::dto::ProfileResponse;
use crate::auth::extractors::AuthUser;
use crate::state::AppState;

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        avatar_url: user.avatar_url,
    })
}
