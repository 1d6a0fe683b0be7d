//! Tracing setup with a level that can be changed at runtime

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(1); // WARN: a library stays quiet unless asked

/// Tracing filter whose level can be changed while the process runs
#[derive(Clone)]
pub struct DynamicFilter;

impl<S> Layer<S> for DynamicFilter
where
    S: Subscriber,
{
    fn enabled(
        &self,
        metadata: &tracing::Metadata<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) -> bool {
        level_rank(*metadata.level()) <= CURRENT_LEVEL.load(Ordering::Relaxed)
    }
}

const fn level_rank(level: Level) -> u8 {
    match level {
        Level::ERROR => 0,
        Level::WARN => 1,
        Level::INFO => 2,
        Level::DEBUG => 3,
        Level::TRACE => 4,
    }
}

/// Tracing levels that can be selected at runtime or through configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings, the default
    Warn,
    /// Mapper builds and cache activity
    Info,
    /// Plan decisions, including dumped plans when enabled
    Debug,
    /// Everything, including shape introspection
    Trace,
}

impl TracingLevel {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        }
    }

    /// Lower-case level name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Install a stderr subscriber filtered by [`DynamicFilter`]
///
/// Returns `false` when the process already has a global subscriber, in which case
/// that subscriber keeps receiving the mapper's events.
pub fn init_tracing() -> bool {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true);

    Registry::default()
        .with(DynamicFilter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
}

/// Set the current tracing level
pub fn set_tracing_level(level: TracingLevel) {
    CURRENT_LEVEL.store(level.as_u8(), Ordering::Relaxed);
    tracing::info!("Tracing level set to: {}", level.as_str());
}

/// Get the current tracing level
pub fn get_current_tracing_level() -> TracingLevel {
    match CURRENT_LEVEL.load(Ordering::Relaxed) {
        0 => TracingLevel::Error,
        2 => TracingLevel::Info,
        3 => TracingLevel::Debug,
        4 => TracingLevel::Trace,
        _ => TracingLevel::Warn,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_tracing_level_from_str() {
        assert_eq!(TracingLevel::from_str("error"), Ok(TracingLevel::Error));
        assert_eq!(TracingLevel::from_str("WARN"), Ok(TracingLevel::Warn));
        assert_eq!(TracingLevel::from_str("Info"), Ok(TracingLevel::Info));
        assert_eq!(TracingLevel::from_str("debug"), Ok(TracingLevel::Debug));
        assert_eq!(TracingLevel::from_str("trace"), Ok(TracingLevel::Trace));

        assert!(TracingLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_tracing_level_as_str_matches_display() {
        for level in [
            TracingLevel::Error,
            TracingLevel::Warn,
            TracingLevel::Info,
            TracingLevel::Debug,
            TracingLevel::Trace,
        ] {
            assert_eq!(level.as_str(), level.to_string());
        }
    }

    #[test]
    fn test_filter_ranks_levels() {
        assert!(level_rank(Level::ERROR) < level_rank(Level::WARN));
        assert!(level_rank(Level::DEBUG) < level_rank(Level::TRACE));
    }

    #[test]
    fn test_set_level_is_observed() {
        set_tracing_level(TracingLevel::Trace);
        assert_eq!(get_current_tracing_level(), TracingLevel::Trace);
        assert!(level_rank(Level::TRACE) <= CURRENT_LEVEL.load(Ordering::Relaxed));

        set_tracing_level(TracingLevel::Warn);
        assert_eq!(get_current_tracing_level(), TracingLevel::Warn);
    }
}
