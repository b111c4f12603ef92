//! Variable-kind taxonomy
//!
//! Every column carries a semantic kind beyond its physical storage type:
//! an integer column may be an ordinal, an id, or a plain numeric, and
//! primitives accept or reject it on that basis. The taxonomy is a closed
//! enum with an explicit parent table; there is no runtime registration.
//!
//! # Subtype table
//!
//! - `Categorical`, `Ordinal`, `Id` → `Discrete`
//! - `TimeIndex` → `Datetime`, `DatetimeTimeIndex` → `TimeIndex`
//! - every kind → `Variable` (the root)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic classification of a data column.
///
/// Kinds form a subtype hierarchy rooted at [`VariableKind::Variable`].
/// Input contracts are matched by subtype relationship, not exact equality:
/// an `Id` column satisfies a `Discrete` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    /// Root of the hierarchy; accepted by contracts over any column.
    Variable,
    /// Continuous numeric values.
    Numeric,
    /// True/false values.
    Boolean,
    /// Values drawn from an unordered finite domain.
    Discrete,
    /// Discrete values with no intrinsic order (labels).
    Categorical,
    /// Discrete values with an intrinsic order (ranks, calendar components).
    Ordinal,
    /// Discrete values identifying rows of some entity.
    Id,
    /// Free-form text.
    Text,
    /// Points in time.
    Datetime,
    /// A datetime column that orders an entity's rows.
    TimeIndex,
    /// The designated time index of an entity.
    DatetimeTimeIndex,
    /// Durations between points in time.
    Timedelta,
}

impl VariableKind {
    /// Immediate supertype, or `None` for the root.
    pub const fn parent(self) -> Option<VariableKind> {
        match self {
            VariableKind::Variable => None,
            VariableKind::Categorical | VariableKind::Ordinal | VariableKind::Id => {
                Some(VariableKind::Discrete)
            }
            VariableKind::TimeIndex => Some(VariableKind::Datetime),
            VariableKind::DatetimeTimeIndex => Some(VariableKind::TimeIndex),
            _ => Some(VariableKind::Variable),
        }
    }

    /// Reflexive-transitive subtype check against a contract kind.
    ///
    /// `satisfies` walks the parent chain, so `DatetimeTimeIndex` satisfies
    /// `TimeIndex`, `Datetime`, and `Variable`.
    pub fn satisfies(self, contract: VariableKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == contract {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Lowercase name, stable across releases.
    pub const fn as_str(self) -> &'static str {
        match self {
            VariableKind::Variable => "variable",
            VariableKind::Numeric => "numeric",
            VariableKind::Boolean => "boolean",
            VariableKind::Discrete => "discrete",
            VariableKind::Categorical => "categorical",
            VariableKind::Ordinal => "ordinal",
            VariableKind::Id => "id",
            VariableKind::Text => "text",
            VariableKind::Datetime => "datetime",
            VariableKind::TimeIndex => "time_index",
            VariableKind::DatetimeTimeIndex => "datetime_time_index",
            VariableKind::Timedelta => "timedelta",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
