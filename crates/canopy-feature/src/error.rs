//! Definition-time errors
//!
//! All validation happens eagerly while a feature tree is being defined,
//! never at computation time. Nothing in this layer silently corrects a
//! contract violation; a constructed node is guaranteed type-safe to
//! evaluate.

use thiserror::Error;

use canopy_types::{EntityId, VariableKind};

/// Errors raised while defining a feature.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Base features span more than one entity.
    ///
    /// Transform primitives operate within a single table; mixing entities
    /// means the arrays being combined have no shared row identity.
    #[error("more than one entity for base features: `{expected}` and `{found}`")]
    EntityMismatch {
        /// Entity of the first base feature.
        expected: EntityId,
        /// The other entity encountered.
        found: EntityId,
    },

    /// A base feature's kind satisfies no declared input contract at its
    /// argument position.
    ///
    /// Contracts are matched by subtype relationship, so this is only
    /// raised when the kind is outside every accepted hierarchy branch.
    #[error(
        "`{feature}` has kind {actual}, which satisfies no input contract of `{primitive}` at position {position}"
    )]
    TypeContractViolation {
        /// Transformation name whose contract was violated.
        primitive: &'static str,
        /// Zero-based argument position.
        position: usize,
        /// Display name of the offending feature.
        feature: String,
        /// The feature's actual kind.
        actual: VariableKind,
    },

    /// A constructor argument is neither a feature nor a column resolvable
    /// against the inferred entity.
    #[error("argument {position} of `{primitive}` cannot be coerced to a feature: {reason}")]
    ArgumentCoercion {
        /// Transformation name being constructed.
        primitive: &'static str,
        /// Zero-based argument position.
        position: usize,
        /// What went wrong (unknown column, no entity to infer, ...).
        reason: String,
    },
}
