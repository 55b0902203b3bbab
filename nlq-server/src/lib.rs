//! Natural-language questions answered with guarded SQL.
//!
//! A request flows through three collaborators:
//!
//! ```text
//! question ──► CandidateGenerator ──► QueryValidator ──► QueryExecutor ──► rows
//!              (untrusted text)        (nlq-guard)        (ValidatedQuery only)
//! ```
//!
//! [`service::QueryService`] wires them together and keeps their failures
//! apart; [`routes::router`] exposes it over HTTP. The generator and executor
//! are traits so tests (and other backends) can substitute their own.

pub mod config;
pub mod constants;
pub mod env;
pub mod execute;
pub mod generate;
pub mod routes;
pub mod service;
pub mod telemetry;

pub use config::{Config, ConfigError, Overrides};
pub use execute::{ExecutionError, QueryExecutor, Rows, SqliteExecutor};
pub use generate::{CandidateGenerator, GeminiGenerator, GenerationError};
pub use routes::router;
pub use service::{QueryAnswer, QueryService, ServiceError};
