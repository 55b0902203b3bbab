//! Request orchestration: generate, validate, execute.
//!
//! The three failure classes stay distinct all the way out: a generator
//! failure, a rejected candidate and an execution failure each have their
//! own [`ServiceError`] variant, log target and HTTP status.

use crate::config::Config;
use crate::constants::MAX_QUESTION_LEN;
use crate::execute::{ExecutionError, QueryExecutor};
use crate::generate::{CandidateGenerator, GenerationError};
use nlq_guard::{QueryValidator, Rejection};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Successful answer to a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    /// The validated SQL that was executed.
    pub sql: String,
    /// Column names in result order.
    pub columns: Vec<String>,
    /// Result rows, at most [`nlq_guard::MAX_ROW_LIMIT`].
    pub rows: Vec<Vec<Value>>,
}

/// Why a question could not be answered.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The question was blank.
    #[error("question must not be empty")]
    EmptyQuestion,
    /// The question exceeded [`MAX_QUESTION_LEN`].
    #[error("question is longer than {max} bytes")]
    QuestionTooLong {
        /// Byte limit.
        max: usize,
    },
    /// The generator failed.
    #[error("candidate generation failed")]
    Generation(#[source] GenerationError),
    /// The generator did not answer in time.
    #[error("candidate generation timed out after {0:?}")]
    GenerationTimeout(Duration),
    /// The candidate failed validation and was not executed.
    #[error("{}", .0.reason)]
    Rejected(#[from] Rejection),
    /// The executor failed.
    #[error("query execution failed")]
    Execution(#[source] ExecutionError),
    /// The executor did not answer in time.
    #[error("query execution timed out after {0:?}")]
    ExecutionTimeout(Duration),
}

/// Orchestrates one generator, the validator and one executor.
#[derive(Debug)]
pub struct QueryService<G, E> {
    generator: G,
    executor: E,
    validator: QueryValidator,
    generate_timeout: Duration,
    execute_timeout: Duration,
}

impl<G, E> QueryService<G, E>
where
    G: CandidateGenerator,
    E: QueryExecutor,
{
    /// Build a service over the builtin schema.
    pub fn new(
        generator: G,
        executor: E,
        generate_timeout: Duration,
        execute_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            executor,
            validator: QueryValidator::default(),
            generate_timeout,
            execute_timeout,
        }
    }

    /// Build a service using the timeouts from `config`.
    pub fn from_config(generator: G, executor: E, config: &Config) -> Self {
        Self::new(
            generator,
            executor,
            config.generate_timeout,
            config.execute_timeout,
        )
    }

    /// Replace the validator (e.g. one over a custom registry).
    #[must_use]
    pub fn with_validator(mut self, validator: QueryValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Validator in use.
    pub const fn validator(&self) -> QueryValidator {
        self.validator
    }

    /// Answer `question`.
    ///
    /// The candidate reaches the executor only as a
    /// [`ValidatedQuery`](nlq_guard::ValidatedQuery).
    pub async fn answer(&self, question: &str) -> Result<QueryAnswer, ServiceError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ServiceError::EmptyQuestion);
        }
        if question.len() > MAX_QUESTION_LEN {
            return Err(ServiceError::QuestionTooLong {
                max: MAX_QUESTION_LEN,
            });
        }

        tracing::info!(
            target: "nlq::service",
            question_len = question.len(),
            "generating candidate"
        );
        let candidate = match timeout(self.generate_timeout, self.generator.generate(question)).await
        {
            Ok(Ok(candidate)) => candidate,
            Ok(Err(e)) => {
                tracing::error!(target: "nlq::generator", error = %e, "generation failed");
                return Err(ServiceError::Generation(e));
            }
            Err(_) => {
                tracing::error!(
                    target: "nlq::generator",
                    timeout = ?self.generate_timeout,
                    "generation timed out"
                );
                return Err(ServiceError::GenerationTimeout(self.generate_timeout));
            }
        };

        let query = match self.validator.validate(&candidate) {
            Ok(query) => query,
            Err(rejection) => {
                tracing::warn!(
                    target: "nlq::validator",
                    kind = rejection.reason.kind(),
                    reason = %rejection.reason,
                    "candidate rejected"
                );
                tracing::debug!(
                    target: "nlq::validator",
                    candidate = %rejection.candidate,
                    "rejected candidate text"
                );
                return Err(rejection.into());
            }
        };

        let sql = query.as_str().to_string();
        tracing::info!(target: "nlq::service", sql = %sql, limit = query.limit(), "executing");

        let rows = match timeout(self.execute_timeout, self.executor.execute(query)).await {
            Ok(Ok(rows)) => rows,
            Ok(Err(e)) => {
                tracing::error!(target: "nlq::executor", error = %e, sql = %sql, "execution failed");
                return Err(ServiceError::Execution(e));
            }
            Err(_) => {
                tracing::error!(
                    target: "nlq::executor",
                    timeout = ?self.execute_timeout,
                    sql = %sql,
                    "execution timed out"
                );
                return Err(ServiceError::ExecutionTimeout(self.execute_timeout));
            }
        };

        tracing::info!(target: "nlq::service", rows = rows.rows.len(), "answered");
        Ok(QueryAnswer {
            sql,
            columns: rows.columns,
            rows: rows.rows,
        })
    }
}
