//! Primitive descriptors and the catalog registry
//!
//! Every transformation in the catalog is described by one static
//! [`PrimitiveDescriptor`]: its lowercase name, the input type contracts it
//! accepts, the kind it returns, and the flags a synthesis engine needs to
//! schedule it. Descriptors are collected into [`PRIMITIVES`] at link time
//! with [`linkme::distributed_slice`], so catalog modules register
//! themselves and the registry stays open to downstream crates.

use linkme::distributed_slice;

use canopy_types::VariableKind;

/// Type contract and flags of one transformation.
///
/// `input_types` is a set of alternative contracts ("overloads"); each
/// alternative is a sequence of accepted kinds matched positionally against
/// the base features, by subtype relationship rather than exact equality.
pub struct PrimitiveDescriptor {
    /// Transformation identifier, lowercase (e.g. "is_null", "diff").
    pub name: &'static str,
    /// Alternative input contracts, each one kind per argument position.
    pub input_types: &'static [&'static [VariableKind]],
    /// Kind of the produced column.
    pub return_type: VariableKind,
    /// The bound function takes a reference time beyond the input arrays.
    pub uses_calc_time: bool,
    /// Reserved for primitives whose computation depends on a
    /// rolling/windowed context. No current primitive sets it.
    pub rolling_function: bool,
    /// One-line description.
    pub doc: &'static str,
}

impl PrimitiveDescriptor {
    /// Checks whether a sequence of argument kinds satisfies any declared
    /// contract (same arity, every position a subtype match).
    pub fn accepts(&self, kinds: &[VariableKind]) -> bool {
        self.input_types.iter().any(|contract| {
            contract.len() == kinds.len()
                && kinds
                    .iter()
                    .zip(contract.iter())
                    .all(|(kind, expected)| kind.satisfies(*expected))
        })
    }
}

/// Distributed slice collecting every catalog descriptor.
///
/// Populated at link time by the catalog modules.
#[distributed_slice]
pub static PRIMITIVES: [PrimitiveDescriptor];

/// All registered transformation names.
pub fn all_names() -> impl Iterator<Item = &'static str> {
    PRIMITIVES.iter().map(|p| p.name)
}

/// Look up a descriptor by name.
pub fn get(name: &str) -> Option<&'static PrimitiveDescriptor> {
    PRIMITIVES.iter().find(|p| p.name == name)
}

/// Check if a name is a known transformation.
pub fn is_known(name: &str) -> bool {
    get(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_by_subtype() {
        let desc = PrimitiveDescriptor {
            name: "test_grouped",
            input_types: &[&[VariableKind::Numeric, VariableKind::Discrete]],
            return_type: VariableKind::Numeric,
            uses_calc_time: false,
            rolling_function: false,
            doc: "",
        };
        assert!(desc.accepts(&[VariableKind::Numeric, VariableKind::Id]));
        assert!(desc.accepts(&[VariableKind::Numeric, VariableKind::Categorical]));
        assert!(!desc.accepts(&[VariableKind::Numeric, VariableKind::Numeric]));
        assert!(!desc.accepts(&[VariableKind::Numeric]));
    }

    #[test]
    fn test_accepts_any_overload() {
        let desc = PrimitiveDescriptor {
            name: "test_overloaded",
            input_types: &[&[VariableKind::DatetimeTimeIndex], &[VariableKind::Datetime]],
            return_type: VariableKind::Timedelta,
            uses_calc_time: true,
            rolling_function: false,
            doc: "",
        };
        assert!(desc.accepts(&[VariableKind::Datetime]));
        assert!(desc.accepts(&[VariableKind::DatetimeTimeIndex]));
        assert!(!desc.accepts(&[VariableKind::Numeric]));
    }

    #[test]
    fn test_lookup() {
        // Registered by the catalog modules in this crate.
        assert!(is_known("is_null"));
        assert!(is_known("diff"));
        assert!(!is_known("nonexistent"));
    }
}
