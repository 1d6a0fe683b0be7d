//! Mapper configuration, from defaults, JSON, or the environment

use std::env;
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{DEFAULT_MAX_DEPTH, ENV_LOG_PLANS, ENV_MAX_DEPTH, ENV_TRACE_LEVEL};
use crate::error::{Error, Result};
use crate::support::tracing::TracingLevel;

/// Settings shared by every mapper a [`MapperCache`](crate::MapperCache) builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Deepest nesting of complex type pairs a plan may contain
    pub max_depth:   usize,
    /// Dump each built plan as JSON at debug level
    pub log_plans:   bool,
    /// Tracing level applied when a cache is created with this configuration
    pub trace_level: Option<TracingLevel>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_depth:   DEFAULT_MAX_DEPTH,
            log_plans:   false,
            trace_level: None,
        }
    }
}

impl MapperConfig {
    /// Defaults overridden by `SHAPE_MAPPER_*` environment variables
    ///
    /// Unparseable values are reported with a warning and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(max_depth) = env_value::<usize>(ENV_MAX_DEPTH) {
            config.max_depth = max_depth;
        }
        if let Ok(raw) = env::var(ENV_LOG_PLANS) {
            config.log_plans = matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config.trace_level = env_value::<TracingLevel>(ENV_TRACE_LEVEL);
        config
    }

    /// Parse a configuration from JSON; missing fields keep their defaults
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|error| Report::new(Error::Configuration(error.to_string())))
    }

    /// Same configuration with a different depth limit
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Same configuration with plan dumping switched on or off
    #[must_use]
    pub const fn with_log_plans(mut self, log_plans: bool) -> Self {
        self.log_plans = log_plans;
        self
    }
}

fn env_value<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {name}={raw}: not a valid value");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_json_fills_defaults() {
        let config = MapperConfig::from_json(r#"{ "max_depth": 4 }"#).unwrap();
        assert_eq!(config.max_depth, 4);
        assert!(!config.log_plans);
        assert_eq!(config.trace_level, None);

        let config = MapperConfig::from_json(r#"{ "trace_level": "debug" }"#).unwrap();
        assert_eq!(config.trace_level, Some(TracingLevel::Debug));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let report = MapperConfig::from_json(r#"{ "depth": 4 }"#).unwrap_err();
        assert_eq!(report.current_context().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_builders_override_fields() {
        let config = MapperConfig::default()
            .with_max_depth(2)
            .with_log_plans(true);
        assert_eq!(config.max_depth, 2);
        assert!(config.log_plans);
    }
}
