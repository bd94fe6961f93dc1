//! AI code analysis boundary.
//!
//! The analyzer is a capability: a real upstream-calling implementation and a
//! disabled one share the `CodeAnalyzer` trait, picked once at startup. Callers
//! never see an analyzer error; `analyze_or_fallback` absorbs every failure
//! into a deterministic placeholder payload so the review pipeline cannot be
//! blocked by upstream availability.

mod client;

pub use client::OpenAiAnalyzer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Inputs to a single analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub language: String,
    pub category: String,
    pub problem_description: String,
    pub code: String,
}

/// Three-level readiness label assigned by the reviewer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rating {
    Beginner,
    #[serde(rename = "Interview-Ready")]
    InterviewReady,
    #[serde(rename = "Production-Grade")]
    ProductionGrade,
}

impl Rating {
    pub const ALL: [Rating; 3] = [
        Rating::Beginner,
        Rating::InterviewReady,
        Rating::ProductionGrade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Beginner => "Beginner",
            Rating::InterviewReady => "Interview-Ready",
            Rating::ProductionGrade => "Production-Grade",
        }
    }
}

/// The strict JSON contract the upstream model must answer with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnalysis {
    pub time_complexity: String,
    pub space_complexity: String,
    pub edge_cases: Vec<String>,
    pub code_structure: String,
    pub optimization_suggestions: Vec<String>,
    pub interview_readiness: String,
    pub rating: Rating,
    pub optimized_code: String,
    pub interview_questions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis disabled: no API key configured")]
    Disabled,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Api(u16),

    #[error("upstream returned an empty completion")]
    EmptyCompletion,

    #[error("completion did not match the analysis contract: {0}")]
    Contract(#[from] serde_json::Error),

    #[error("analysis timed out")]
    Timeout,
}

#[async_trait]
pub trait CodeAnalyzer: Send + Sync {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<CodeAnalysis, AnalysisError>;
}

/// No-op implementation used when no API key is configured.
pub struct DisabledAnalyzer;

#[async_trait]
impl CodeAnalyzer for DisabledAnalyzer {
    async fn analyze(&self, _req: &AnalysisRequest) -> Result<CodeAnalysis, AnalysisError> {
        Err(AnalysisError::Disabled)
    }
}

/// Neutral placeholder analysis: every narrative field reads as pending,
/// rating bottoms out at Beginner and the "optimized" code is the input
/// unchanged.
pub fn fallback_analysis(code: &str) -> CodeAnalysis {
    CodeAnalysis {
        time_complexity: "Analysis pending".into(),
        space_complexity: "Analysis pending".into(),
        edge_cases: vec!["Edge case analysis in progress".into()],
        code_structure: "Code structure evaluation in progress".into(),
        optimization_suggestions: vec!["Optimization suggestions will be provided shortly".into()],
        interview_readiness: "Interview readiness assessment in progress".into(),
        rating: Rating::Beginner,
        optimized_code: code.to_string(),
        interview_questions: vec!["Interview questions will be generated shortly".into()],
    }
}

/// Single attempt, bounded by `timeout`, no retries. Any failure is logged
/// and replaced by the fallback, so the result is always a valid analysis.
pub async fn analyze_or_fallback(
    analyzer: &dyn CodeAnalyzer,
    timeout: Duration,
    req: &AnalysisRequest,
) -> CodeAnalysis {
    let outcome = tokio::time::timeout(timeout, analyzer.analyze(req))
        .await
        .map_err(|_| AnalysisError::Timeout)
        .and_then(|r| r);

    match outcome {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(error = %e, "AI analysis failed; using fallback");
            fallback_analysis(&req.code)
        }
    }
}
