use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analysis::CodeAnalysis;

/// One unit of user-supplied code plus problem context. Append-only: created
/// by the pipeline, never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub language: String,
    pub category: String,
    pub problem_description: String,
    pub code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The structured analysis attached 1:1 to a submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub time_complexity: String,
    pub space_complexity: String,
    pub edge_cases: Vec<String>,
    pub code_structure: String,
    pub optimization_suggestions: Vec<String>,
    pub interview_readiness: String,
    pub rating: String,
    pub optimized_code: String,
    pub interview_questions: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Submission {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        language: &str,
        category: &str,
        problem_description: &str,
        code: &str,
    ) -> anyhow::Result<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (user_id, language, category, problem_description, code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, language, category, problem_description, code, created_at
            "#,
        )
        .bind(user_id)
        .bind(language)
        .bind(category)
        .bind(problem_description)
        .bind(code)
        .fetch_one(db)
        .await?;
        Ok(submission)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, user_id, language, category, problem_description, code, created_at
            FROM submissions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(submission)
    }

    /// Newest first, capped.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, user_id, language, category, problem_description, code, created_at
            FROM submissions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

impl Review {
    pub async fn create(
        db: &PgPool,
        submission_id: Uuid,
        analysis: &CodeAnalysis,
    ) -> anyhow::Result<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                submission_id, time_complexity, space_complexity, edge_cases,
                code_structure, optimization_suggestions, interview_readiness,
                rating, optimized_code, interview_questions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, submission_id, time_complexity, space_complexity, edge_cases,
                      code_structure, optimization_suggestions, interview_readiness,
                      rating, optimized_code, interview_questions, created_at
            "#,
        )
        .bind(submission_id)
        .bind(&analysis.time_complexity)
        .bind(&analysis.space_complexity)
        .bind(&analysis.edge_cases)
        .bind(&analysis.code_structure)
        .bind(&analysis.optimization_suggestions)
        .bind(&analysis.interview_readiness)
        .bind(analysis.rating.as_str())
        .bind(&analysis.optimized_code)
        .bind(&analysis.interview_questions)
        .fetch_one(db)
        .await?;
        Ok(review)
    }

    pub async fn find_by_submission(
        db: &PgPool,
        submission_id: Uuid,
    ) -> anyhow::Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, submission_id, time_complexity, space_complexity, edge_cases,
                   code_structure, optimization_suggestions, interview_readiness,
                   rating, optimized_code, interview_questions, created_at
            FROM reviews
            WHERE submission_id = $1
            "#,
        )
        .bind(submission_id)
        .fetch_optional(db)
        .await?;
        Ok(review)
    }

    pub async fn list_by_submissions(
        db: &PgPool,
        submission_ids: &[Uuid],
        limit: i64,
    ) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, submission_id, time_complexity, space_complexity, edge_cases,
                   code_structure, optimization_suggestions, interview_readiness,
                   rating, optimized_code, interview_questions, created_at
            FROM reviews
            WHERE submission_id = ANY($1)
            LIMIT $2
            "#,
        )
        .bind(submission_ids)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
