//! Environment variable snapshot.
//!
//! The process environment is read once at startup into an [`EnvCache`] and
//! handed to [`Config`](crate::config::Config). Nothing else in the service
//! reads environment variables, so configuration stays an explicit value.
//!
//! # Example
//!
//! ```
//! use nlq_server::env::EnvCache;
//!
//! let env = EnvCache::new(vec![("NLQ_LOG_JSON".to_string(), "yes".to_string())]);
//! assert!(env.bool("NLQ_LOG_JSON", false));
//! assert_eq!(env.get_or("NLQ_BIND", "127.0.0.1:8000"), "127.0.0.1:8000");
//! ```

use std::collections::HashMap;
use std::str::FromStr;

/// Environment variable cache for repeated lookups.
#[derive(Debug, Clone, Default)]
pub struct EnvCache {
    map: HashMap<String, String>,
}

impl EnvCache {
    /// Create a cache from explicit key/value pairs.
    #[must_use]
    pub fn new(env: Vec<(String, String)>) -> Self {
        Self {
            map: env.into_iter().collect(),
        }
    }

    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            map: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Get a variable; empty values count as unset.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Get a variable or return a default value.
    #[must_use]
    pub fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or(default).to_string()
    }

    /// Get a variable as a boolean.
    ///
    /// Returns `true` if the value is "true", "1", or "yes" (case-insensitive).
    #[must_use]
    pub fn bool(&self, name: &str, default: bool) -> bool {
        self.get(name).map_or(default, |v| {
            let v_lower = v.trim().to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes"
        })
    }

    /// Parse a variable, returning the raw text on failure.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, String> {
        self.get(name)
            .map(|raw| raw.trim().parse().map_err(|_| raw.to_string()))
            .transpose()
    }
}
