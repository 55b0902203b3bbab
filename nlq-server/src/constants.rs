//! Centralized constants for the service.
//!
//! Defaults here are starting points for [`Config`](crate::config::Config);
//! every one of them can be overridden by the config file, the environment
//! or the command line.

// ============================================================================
// SERVER DEFAULTS
// ============================================================================

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Default `SQLite` database file.
pub const DEFAULT_DATABASE: &str = "db.sqlite";

/// Maximum accepted question length in bytes.
pub const MAX_QUESTION_LEN: usize = 2000;

// ============================================================================
// GENERATOR DEFAULTS
// ============================================================================

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Seconds allowed for one generation call.
pub const DEFAULT_GENERATE_TIMEOUT_SECS: u64 = 30;

/// Seconds allowed for one query execution.
pub const DEFAULT_EXECUTE_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// ENVIRONMENT VARIABLES
// ============================================================================

/// Listen address.
pub const ENV_BIND: &str = "NLQ_BIND";
/// Database file path.
pub const ENV_DATABASE: &str = "NLQ_DATABASE";
/// Gemini API key.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Gemini model name.
pub const ENV_GEMINI_MODEL: &str = "NLQ_GEMINI_MODEL";
/// Gemini REST endpoint.
pub const ENV_GEMINI_BASE_URL: &str = "NLQ_GEMINI_BASE_URL";
/// Generation timeout in seconds.
pub const ENV_GENERATE_TIMEOUT: &str = "NLQ_GENERATE_TIMEOUT_SECS";
/// Execution timeout in seconds.
pub const ENV_EXECUTE_TIMEOUT: &str = "NLQ_EXECUTE_TIMEOUT_SECS";
/// Emit logs as JSON lines.
pub const ENV_LOG_JSON: &str = "NLQ_LOG_JSON";

// ============================================================================
// HTTP
// ============================================================================

/// RFC 7807 Problem Details MIME type.
pub const MIME_PROBLEM_JSON: &str = "application/problem+json";
