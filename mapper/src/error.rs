use error_stack::Report;
use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::shape::CapabilityKind;

/// Result type for the `shape_mapper` library
pub type Result<T> = std::result::Result<T, Report<Error>>;

/// Category of an [`Error`], independent of its structured fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum ErrorKind {
    /// A property exposes a disallowed external-resource capability
    ForbiddenCapability,
    /// An array or collection property has no structurally compatible counterpart
    StructuralMismatch,
    /// Building the operation for a property failed
    PlanGeneration,
    /// A built mapper could not be bound to the requested type pair
    Instantiation,
    /// No coercion exists between the two property types
    Unconvertible,
    /// Nested type pairs exceeded the configured depth
    RecursionLimitExceeded,
    /// Executing a plan against concrete values failed
    Conversion,
    /// Mapper configuration could not be loaded
    Configuration,
    /// Internal invariant broken
    InvalidState,
}

/// Every failure the mapper can report, one variant per [`ErrorKind`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A property holds a handle to an external resource
    #[error(
        "property `{property}` of type `{type_name}` exposes a forbidden {capability} capability and cannot be mapped"
    )]
    ForbiddenCapability {
        /// Rejected property
        property:   String,
        /// Declared type of the property
        type_name:  String,
        /// Resource found in that type
        capability: CapabilityKind,
    },

    /// An array or collection property has no structurally compatible counterpart
    #[error(
        "mismatch on container assignment between `{source_element}` and `{destination_element}` on property `{property}` inside type `{enclosing_type}`"
    )]
    StructuralMismatch {
        /// Element type on the source side, or the type itself if not a container
        source_element:      String,
        /// Element type on the destination side, or the type itself if not a container
        destination_element: String,
        /// Property being planned
        property:            String,
        /// Source type declaring the property
        enclosing_type:      String,
    },

    /// Planning one property failed; the cause is the next context in the report
    #[error("failed to generate the mapping of property `{property}` from `{input}` to `{output}`")]
    PlanGeneration {
        /// Source type of the pair
        input:    String,
        /// Destination type of the pair
        output:   String,
        /// Property being planned
        property: String,
    },

    /// A built mapper could not be bound to the requested pair
    #[error("unable to instantiate mapper from `{input}` to `{output}`")]
    Instantiation {
        /// Requested source type
        input:  String,
        /// Requested destination type
        output: String,
    },

    /// No operation converts between the two types
    #[error("no conversion from `{source_type}` to `{destination_type}`")]
    Unconvertible {
        /// Source property type
        source_type:      String,
        /// Destination property type
        destination_type: String,
    },

    /// Nested complex pairs went deeper than the configured limit
    #[error("mapping `{input}` to `{output}` exceeded the maximum nesting depth of {limit}")]
    RecursionLimitExceeded {
        /// Source type of the pair that hit the limit
        input:  String,
        /// Destination type of the pair that hit the limit
        output: String,
        /// Configured maximum depth
        limit:  usize,
    },

    /// Executing a plan against concrete objects failed
    #[error("failed to map a value with `{mapper}`")]
    Conversion {
        /// Name of the mapper, `{Input}To{Output}`
        mapper: String,
    },

    /// Configuration could not be parsed
    #[error("invalid mapper configuration: {0}")]
    Configuration(String),

    /// Internal invariant broken
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// The category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ForbiddenCapability { .. } => ErrorKind::ForbiddenCapability,
            Self::StructuralMismatch { .. } => ErrorKind::StructuralMismatch,
            Self::PlanGeneration { .. } => ErrorKind::PlanGeneration,
            Self::Instantiation { .. } => ErrorKind::Instantiation,
            Self::Unconvertible { .. } => ErrorKind::Unconvertible,
            Self::RecursionLimitExceeded { .. } => ErrorKind::RecursionLimitExceeded,
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidState(_) => ErrorKind::InvalidState,
        }
    }

    /// Create a `PlanGeneration` error for one property of a type pair
    pub fn plan_generation(
        input: impl Into<String>,
        output: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self::PlanGeneration {
            input:    input.into(),
            output:   output.into(),
            property: property.into(),
        }
    }

    /// Create an `Unconvertible` error
    pub fn unconvertible(
        source_type: impl Into<String>,
        destination_type: impl Into<String>,
    ) -> Self {
        Self::Unconvertible {
            source_type:      source_type.into(),
            destination_type: destination_type.into(),
        }
    }
}

/// Inspection helpers for the context chain of a [`Report<Error>`]
///
/// `PlanGeneration` wraps the failure that caused it, so the kind a caller cares about
/// (say `ForbiddenCapability`) usually sits below the outermost context.
pub trait ReportExt {
    /// All error kinds in the chain, outermost first
    fn error_kinds(&self) -> Vec<ErrorKind>;

    /// Whether any context in the chain has the given kind
    fn contains_kind(&self, kind: ErrorKind) -> bool;

    /// The innermost [`Error`] in the chain
    fn root_error(&self) -> Option<&Error>;
}

impl ReportExt for Report<Error> {
    fn error_kinds(&self) -> Vec<ErrorKind> {
        self.frames()
            .filter_map(|frame| frame.downcast_ref::<Error>())
            .map(Error::kind)
            .collect()
    }

    fn contains_kind(&self, kind: ErrorKind) -> bool {
        self.frames()
            .filter_map(|frame| frame.downcast_ref::<Error>())
            .any(|error| error.kind() == kind)
    }

    fn root_error(&self) -> Option<&Error> {
        self.frames()
            .filter_map(|frame| frame.downcast_ref::<Error>())
            .last()
    }
}
