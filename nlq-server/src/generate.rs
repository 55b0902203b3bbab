//! Candidate generation: natural-language question in, SQL-looking text out.
//!
//! Nothing produced here is trusted. The prompt asks for a bounded `SELECT`,
//! but the model can ignore it (or be talked out of it by the question), so
//! every candidate goes through [`nlq_guard::QueryValidator`] before use.

use crate::config::GeminiConfig;
use async_trait::async_trait;
use nlq_guard::{MAX_ROW_LIMIT, TableSchema};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures talking to the generator. These are infrastructure problems,
/// distinct from a candidate being rejected.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport failure or undecodable body.
    #[error("generator request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success HTTP status.
    #[error("generator returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the provider, if any.
        message: String,
    },
    /// The reply held no usable text.
    #[error("generator returned no candidate text")]
    EmptyResponse,
}

/// Produces a candidate query for a question.
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    /// Turn `question` into candidate SQL text.
    async fn generate(&self, question: &str) -> Result<String, GenerationError>;
}

/// Build the instruction sent to the model for `table`.
pub fn build_prompt(table: &TableSchema, question: &str) -> String {
    let columns = table
        .columns()
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Convert the following natural language question into a SQL SELECT query for a \
         SQLite table called \"{table}\" with columns {columns}.\n\
         \n\
         Rules:\n\
         - Only generate SELECT queries (no INSERT, UPDATE, DELETE, or DROP)\n\
         - Always include \"LIMIT {MAX_ROW_LIMIT}\" at the end\n\
         - Return only the SQL query, nothing else\n\
         \n\
         Question: {question}\n\
         \n\
         SQL:",
        table = table.name(),
    )
}

/// Strip Markdown code fences and trailing terminators from a model reply.
///
/// Cosmetic only: interior text is left alone for the validator to judge.
pub fn tidy_candidate(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop an info string such as "sql" on the opening fence line.
        let body = match rest.split_once('\n') {
            Some((info, body)) if !info.trim().contains(' ') => body,
            _ => rest,
        };
        let body = body.trim_end();
        text = body.strip_suffix("```").unwrap_or(body);
    }

    text.trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace())
        .to_string()
}

// ============================================================================
// GEMINI
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

/// Candidate generator backed by the Gemini `generateContent` REST API.
pub struct GeminiGenerator {
    client: Client,
    config: GeminiConfig,
    table: &'static TableSchema,
}

impl GeminiGenerator {
    /// Create a generator that prompts for queries over `table`.
    pub fn new(config: GeminiConfig, table: &'static TableSchema) -> Self {
        Self::with_client(Client::new(), config, table)
    }

    /// Create a generator with a preconfigured HTTP client.
    pub const fn with_client(
        client: Client,
        config: GeminiConfig,
        table: &'static TableSchema,
    ) -> Self {
        Self {
            client,
            config,
            table,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl CandidateGenerator for GeminiGenerator {
    async fn generate(&self, question: &str) -> Result<String, GenerationError> {
        let prompt = build_prompt(self.table, question);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };

        tracing::debug!(model = %self.config.model, "requesting candidate query");
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map_or(error_text, |body| body.error.message);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response.json().await?;
        let candidate = reply
            .into_text()
            .map(|text| tidy_candidate(&text))
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(candidate)
    }
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("config", &self.config)
            .field("table", &self.table.name())
            .finish_non_exhaustive()
    }
}
