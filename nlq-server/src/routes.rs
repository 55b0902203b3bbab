//! HTTP surface.
//!
//! | Route | Body | Success |
//! |-------|------|---------|
//! | `GET /health` | none | `{"status":"ok"}` |
//! | `POST /query` | `{"question": "..."}` | `{"sql", "columns", "rows"}` |
//!
//! Failures are RFC 7807 Problem Details (`application/problem+json`).

use crate::constants::MIME_PROBLEM_JSON;
use crate::execute::QueryExecutor;
use crate::generate::CandidateGenerator;
use crate::service::{QueryAnswer, QueryService, ServiceError};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `POST /query` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// Natural-language question.
    pub question: String,
}

/// `GET /health` response body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Health {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
}

/// RFC 7807 Problem Details body.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Short summary of the status.
    pub title: &'static str,
    /// HTTP status code.
    pub status: u16,
    /// Human-readable explanation.
    pub detail: String,
    /// Machine-readable rejection code, for rejected queries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

/// Build the router over `service`.
pub fn router<G, E>(service: Arc<QueryService<G, E>>) -> Router
where
    G: CandidateGenerator + 'static,
    E: QueryExecutor + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/query", post(query::<G, E>))
        .with_state(service)
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn query<G, E>(
    State(service): State<Arc<QueryService<G, E>>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryAnswer>, ServiceError>
where
    G: CandidateGenerator + 'static,
    E: QueryExecutor + 'static,
{
    service.answer(&request.question).await.map(Json)
}

const fn status_title(code: u16) -> &'static str {
    match code {
        400 => "Bad Request",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        504 => "Gateway Timeout",
        _ => "Error",
    }
}

impl ServiceError {
    /// HTTP status for this failure class.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::EmptyQuestion | Self::QuestionTooLong { .. } => StatusCode::BAD_REQUEST,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Generation(_) => StatusCode::BAD_GATEWAY,
            Self::GenerationTimeout(_) | Self::ExecutionTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Problem Details body for this failure.
    ///
    /// Collaborator errors are summarised; their inner messages stay in the logs.
    pub fn problem(&self) -> Problem {
        let status = self.status().as_u16();
        Problem {
            kind: "about:blank",
            title: status_title(status),
            status,
            detail: self.to_string(),
            code: match self {
                Self::Rejected(rejection) => Some(rejection.reason.kind()),
                _ => None,
            },
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, MIME_PROBLEM_JSON)],
            Json(self.problem()),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::ExecutionError;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::EmptyQuestion.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::QuestionTooLong { max: 10 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::GenerationTimeout(Duration::from_secs(1)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ServiceError::Execution(ExecutionError::Database(rusqlite::Error::QueryReturnedNoRows))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejection_problem() {
        let rejection = nlq_guard::QueryValidator::default()
            .validate("DELETE FROM users")
            .unwrap_err();
        let problem = ServiceError::from(rejection).problem();

        assert_eq!(problem.status, 422);
        assert_eq!(problem.title, "Unprocessable Entity");
        assert_eq!(problem.code, Some("not_a_select"));
        assert_eq!(problem.detail, "Only SELECT queries are allowed");
    }

    #[test]
    fn test_problem_hides_collaborator_detail() {
        let err = ServiceError::Execution(ExecutionError::Database(rusqlite::Error::QueryReturnedNoRows));
        let json = serde_json::to_value(err.problem()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "about:blank",
                "title": "Internal Server Error",
                "status": 500,
                "detail": "query execution failed",
            })
        );
    }
}
