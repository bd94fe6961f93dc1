use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    submissions::{
        dto::{ReviewDetails, SubmitRequest, SubmitResponse},
        repo::Submission,
        service::{self, HISTORY_LIMIT},
    },
};

pub fn code_routes() -> Router<AppState> {
    Router::new()
        .route("/code/submit", post(submit_code))
        .route("/code/history", get(history))
}

pub fn review_routes() -> Router<AppState> {
    Router::new().route("/review/:submission_id", get(get_review))
}

#[instrument(skip(state, payload))]
pub async fn submit_code(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let (submission, review) = service::submit_for_review(&state, claims.sub, payload).await?;

    Ok(Json(SubmitResponse {
        submission_id: submission.id,
        review_id: review.id,
        message: "Code submitted and analyzed successfully",
    }))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<Submission>>, ApiError> {
    let submissions = Submission::list_by_user(&state.db, claims.sub, HISTORY_LIMIT).await?;
    Ok(Json(submissions))
}

#[instrument(skip(state))]
pub async fn get_review(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<ReviewDetails>, ApiError> {
    let (submission, review) = service::review_details(&state, submission_id, claims.sub).await?;
    Ok(Json(ReviewDetails { submission, review }))
}
