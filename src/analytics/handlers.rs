use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    analytics::summary::{summarize, AnalyticsSummary, ANALYTICS_CAP},
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    submissions::repo::{Review, Submission},
};

pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/analytics/summary", get(summary))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let submissions = Submission::list_by_user(&state.db, claims.sub, ANALYTICS_CAP).await?;

    let submission_ids: Vec<_> = submissions.iter().map(|s| s.id).collect();
    let reviews = Review::list_by_submissions(&state.db, &submission_ids, ANALYTICS_CAP).await?;

    Ok(Json(summarize(submissions, &reviews)))
}
