use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod extractors;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::me_routes()
}
