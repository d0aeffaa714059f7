//! Error types for ISA-95 kernel operations.

use isa95_space::{HostVersion, SpaceError};

/// Errors raised by the attachment operations and the installer.
///
/// Every variant is fatal to the single operation that raised it, and is
/// raised before the space is mutated.
#[derive(Debug, thiserror::Error)]
pub enum Isa95Error {
    /// A type, reference type, data type or node could not be resolved in
    /// any applicable namespace.
    #[error("cannot find {what} {name}")]
    NotFound { what: &'static str, name: String },

    /// The caller combined incompatible options or left out a mandatory one.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An attribute was attached to a type definition without a modelling rule.
    #[error("a modelling rule is required when attaching to type definition {parent}")]
    MissingModellingRule { parent: String },

    /// A resolved type definition is outside its category's base type.
    #[error("{type_definition} must be a subtype of {base_type}")]
    SubtypeViolation {
        type_definition: String,
        base_type: String,
    },

    /// An attribute would rebind a field that is already bound.
    #[error("field {field} is already bound on {parent}")]
    FieldCollision { parent: String, field: String },

    /// The host space is older than the oldest supported version.
    #[error("host version {actual} is older than the minimum supported {minimum}")]
    IncompatibleHost {
        actual: HostVersion,
        minimum: HostVersion,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Space(#[from] SpaceError),
}

impl Isa95Error {
    pub(crate) fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }
}
