//! Upstream chat-completions client.
//!
//! Sends the review prompt to an OpenAI-compatible endpoint and parses the
//! completion body against the analysis contract. Errors are returned to the
//! combinator in `mod.rs`, which turns them into the fallback payload.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use super::{AnalysisError, AnalysisRequest, CodeAnalysis, CodeAnalyzer};

const SYSTEM_MESSAGE: &str =
    "You are an expert code reviewer and technical interviewer. Always respond with valid JSON.";

pub struct OpenAiAnalyzer {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiAnalyzer {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let token_val = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| anyhow::anyhow!("invalid API key format"))?;
        headers.insert(AUTHORIZATION, token_val);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait::async_trait]
impl CodeAnalyzer for OpenAiAnalyzer {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<CodeAnalysis, AnalysisError> {
        let prompt = build_prompt(req);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        let resp = self
            .http
            .post(self.completions_url())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AnalysisError::Api(status.as_u16()));
        }

        let completion: ChatCompletionResponse = resp.json().await?;
        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or(AnalysisError::EmptyCompletion)?;

        let analysis: CodeAnalysis = serde_json::from_str(strip_code_fence(content))?;
        Ok(analysis)
    }
}

/// Models sometimes wrap the JSON answer in a markdown fence despite the
/// JSON-only directive; tolerate that one deviation.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn build_prompt(req: &AnalysisRequest) -> String {
    format!(
        r#"You are a senior software engineer and FAANG interviewer.

Analyze the following {language} code for a {category} problem.

Problem Description:
{problem}

Code:
{code}

Tasks:
1. Determine time and space complexity
2. Identify missing edge cases (list specific cases)
3. Evaluate code structure and readability
4. Suggest specific optimizations
5. Label the code as: Beginner, Interview-Ready, or Production-Grade
6. Provide an optimized version of the code with clear improvements
7. Generate 3-5 technical interview questions based on this code

Respond ONLY with valid JSON in this exact format:
{{
    "timeComplexity": "O(...) explanation",
    "spaceComplexity": "O(...) explanation",
    "edgeCases": ["edge case 1", "edge case 2"],
    "codeStructure": "detailed evaluation of structure and readability",
    "optimizationSuggestions": ["suggestion 1", "suggestion 2"],
    "interviewReadiness": "detailed feedback on interview readiness",
    "rating": "Beginner|Interview-Ready|Production-Grade",
    "optimizedCode": "complete optimized version of the code",
    "interviewQuestions": ["question 1", "question 2", "question 3"]
}}"#,
        language = req.language,
        category = req.category,
        problem = req.problem_description,
        code = req.code,
    )
}
