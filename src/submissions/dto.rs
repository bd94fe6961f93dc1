use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::submissions::repo::{Review, Submission};

/// Request body for a code submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub language: String,
    pub category: String,
    pub problem_description: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub submission_id: Uuid,
    pub review_id: Uuid,
    pub message: &'static str,
}

/// A submission together with its review, returned to the owner.
#[derive(Debug, Serialize)]
pub struct ReviewDetails {
    pub submission: Submission,
    pub review: Review,
}
