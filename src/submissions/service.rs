//! The submit → analyze → store pipeline.

use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{analyze_or_fallback, AnalysisRequest};
use crate::error::ApiError;
use crate::state::AppState;
use crate::submissions::dto::SubmitRequest;
use crate::submissions::repo::{Review, Submission};

/// History endpoint returns at most this many submissions.
pub const HISTORY_LIMIT: i64 = 100;

/// Persists the submission, runs one analysis attempt, persists the review.
///
/// The submission is written before the analysis call so a record exists no
/// matter what the upstream does; the analysis step cannot fail (it degrades
/// to the fallback payload), so every submission ends up with a review.
pub async fn submit_for_review(
    state: &AppState,
    user_id: Uuid,
    req: SubmitRequest,
) -> Result<(Submission, Review), ApiError> {
    let submission = Submission::create(
        &state.db,
        user_id,
        &req.language,
        &req.category,
        &req.problem_description,
        &req.code,
    )
    .await?;

    let analysis_req = AnalysisRequest {
        language: req.language,
        category: req.category,
        problem_description: req.problem_description,
        code: req.code,
    };
    let timeout = Duration::from_secs(state.config.ai.timeout_secs);
    let analysis = analyze_or_fallback(state.analyzer.as_ref(), timeout, &analysis_req).await;

    let review = Review::create(&state.db, submission.id, &analysis).await?;

    info!(
        submission_id = %submission.id,
        review_id = %review.id,
        rating = %review.rating,
        "submission reviewed"
    );
    Ok((submission, review))
}

/// Ownership is exclusive: only the recorded owner may read a submission.
fn ensure_owner(submission: &Submission, requester_id: Uuid) -> Result<(), ApiError> {
    if submission.user_id != requester_id {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// Loads a submission and its review for the requester, enforcing ownership.
pub async fn review_details(
    state: &AppState,
    submission_id: Uuid,
    requester_id: Uuid,
) -> Result<(Submission, Review), ApiError> {
    let submission = Submission::find_by_id(&state.db, submission_id)
        .await?
        .ok_or(ApiError::NotFound("Submission"))?;

    ensure_owner(&submission, requester_id)?;

    // The pipeline guarantees a review exists; a missing one still has to
    // answer cleanly (e.g. a crash between the two writes).
    let review = Review::find_by_submission(&state.db, submission_id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    Ok((submission, review))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        analyze_or_fallback, AnalysisError, CodeAnalysis, CodeAnalyzer, Rating,
    };
    use crate::auth::jwt::JwtKeys;
    use crate::auth::password::{hash_password, verify_password};
    use async_trait::async_trait;
    use time::OffsetDateTime;

    fn submission_owned_by(user_id: Uuid, code: &str) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            user_id,
            language: "python".into(),
            category: "DSA".into(),
            problem_description: "reverse a list".into(),
            code: code.into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    struct UnavailableAnalyzer;

    #[async_trait]
    impl CodeAnalyzer for UnavailableAnalyzer {
        async fn analyze(&self, _req: &AnalysisRequest) -> Result<CodeAnalysis, AnalysisError> {
            Err(AnalysisError::Api(503))
        }
    }

    #[test]
    fn owner_may_read_their_submission() {
        let owner = Uuid::new_v4();
        let submission = submission_owned_by(owner, "c");
        assert!(ensure_owner(&submission, owner).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let submission = submission_owned_by(Uuid::new_v4(), "c");
        let err = ensure_owner(&submission, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    /// The register → submit → read-back flow short of the database, with the
    /// upstream analyzer down the whole time.
    #[tokio::test]
    async fn registered_user_submits_while_upstream_is_down() {
        // Register user A.
        let hash = hash_password("P1").expect("hash");
        assert!(verify_password("P1", &hash).expect("verify"));

        let keys = JwtKeys::new("dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "a@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@x.com");

        // Submit with the analyzer failing: the analysis still comes back whole.
        let code = "def f(x): return x[::-1]";
        let req = AnalysisRequest {
            language: "python".into(),
            category: "DSA".into(),
            problem_description: "reverse a list".into(),
            code: code.into(),
        };
        let analysis =
            analyze_or_fallback(&UnavailableAnalyzer, Duration::from_secs(5), &req).await;
        assert_eq!(analysis.rating, Rating::Beginner);
        assert_eq!(analysis.optimized_code, code);
        assert!(!analysis.time_complexity.is_empty());
        assert!(!analysis.edge_cases.is_empty());
        assert!(!analysis.interview_questions.is_empty());

        // Only A may read the resulting submission back.
        let submission = submission_owned_by(claims.sub, code);
        assert!(ensure_owner(&submission, claims.sub).is_ok());
        let other = Uuid::new_v4();
        assert!(matches!(
            ensure_owner(&submission, other).unwrap_err(),
            ApiError::Forbidden
        ));
    }
}
