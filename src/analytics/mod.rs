use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod summary;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::analytics_routes())
}
