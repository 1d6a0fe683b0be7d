//! Constants for plan building and configuration

use std::ops::Deref;

// ============================================================================
// RECURSION
// ============================================================================

/// Default maximum nesting of complex type pairs within one plan
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Depth of the type pair currently being planned, the root pair being zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecursionDepth(usize);

impl RecursionDepth {
    /// The root type pair
    pub const ZERO: Self = Self(0);

    /// Depth of a nested type pair
    pub const fn increment(self) -> Self { Self(self.0 + 1) }

    /// Whether planning at this depth would exceed `limit`
    pub const fn exceeds_limit(self, limit: usize) -> bool { self.0 > limit }
}

impl Deref for RecursionDepth {
    type Target = usize;

    fn deref(&self) -> &Self::Target { &self.0 }
}

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// Overrides [`DEFAULT_MAX_DEPTH`]
pub const ENV_MAX_DEPTH: &str = "SHAPE_MAPPER_MAX_DEPTH";

/// `true`/`1` dumps every built plan as JSON at debug level
pub const ENV_LOG_PLANS: &str = "SHAPE_MAPPER_LOG_PLANS";

/// Initial tracing level: error, warn, info, debug, trace
pub const ENV_TRACE_LEVEL: &str = "SHAPE_MAPPER_TRACE_LEVEL";

// ============================================================================
// NAMING
// ============================================================================

/// Joins the input and output type names into a mapper name, `OriginToDestination`
pub const MAPPER_NAME_SEPARATOR: &str = "To";
