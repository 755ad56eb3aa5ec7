//! Runtime configuration for matching and path search.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```
//! use roadmatch::{Config, QueueKind};
//!
//! let config = Config::from_json(r#"{ "search": { "queue": "binary", "threads": 4 } }"#).unwrap();
//! assert_eq!(config.search.queue, QueueKind::Binary);
//! assert_eq!(config.search.threads, 4);
//! assert_eq!(config.matching, Default::default());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::frontier::QueueKind;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Map matching settings.
    pub matching: MatchingConfig,
    /// Shortest-path settings.
    pub search: SearchConfig,
}

/// Settings for [`crate::MapMatcher`] and index construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Fraction of the point extent added on each side when index bounds are
    /// fitted to the points.
    pub padding: f64,
    /// Reject matches farther than this many metres. `None` accepts any match.
    pub max_distance_m: Option<f64>,
    /// Worker threads for batch matching; 0 uses rayon's default.
    pub threads: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            padding: 0.01,
            max_distance_m: None,
            threads: 0,
        }
    }
}

/// Settings for [`crate::PathSearch`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Frontier implementation.
    pub queue: QueueKind,
    /// Worker threads for batch searches; 0 uses rayon's default.
    pub threads: usize,
    /// Per-search time limit in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl SearchConfig {
    /// The per-search time limit, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Config {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed JSON, [`ConfigError::Invalid`] for
    /// out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let padding = self.matching.padding;
        if !padding.is_finite() || padding < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "matching.padding must be a finite non-negative number, got {padding}"
            )));
        }
        if let Some(d) = self.matching.max_distance_m.filter(|d| d.is_nan() || *d <= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "matching.max_distance_m must be positive, got {d}"
            )));
        }
        Ok(())
    }
}
