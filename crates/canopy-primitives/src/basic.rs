//! Elementwise transformations
//!
//! Missingness tests, absolute value, negation, percentile ranks, and
//! list membership.

use linkme::distributed_slice;

use canopy_feature::{DefinitionError, FeatureArg};
use canopy_types::{DataArray, Datum, VariableKind};

use crate::compute::Computation;
use crate::descriptor::{PrimitiveDescriptor, PRIMITIVES};
use crate::transform::TransformFeature;

#[distributed_slice(PRIMITIVES)]
pub static IS_NULL: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "is_null",
    input_types: &[&[VariableKind::Variable]],
    return_type: VariableKind::Boolean,
    uses_calc_time: false,
    rolling_function: false,
    doc: "True where the value is missing",
};

#[distributed_slice(PRIMITIVES)]
pub static ABSOLUTE: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "absolute",
    input_types: &[&[VariableKind::Numeric]],
    return_type: VariableKind::Numeric,
    uses_calc_time: false,
    rolling_function: false,
    doc: "Elementwise absolute value",
};

#[distributed_slice(PRIMITIVES)]
pub static NOT: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "not",
    input_types: &[&[VariableKind::Boolean]],
    return_type: VariableKind::Boolean,
    uses_calc_time: false,
    rolling_function: false,
    doc: "Elementwise logical negation",
};

#[distributed_slice(PRIMITIVES)]
pub static PERCENTILE: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "percentile",
    input_types: &[&[VariableKind::Numeric]],
    return_type: VariableKind::Numeric,
    uses_calc_time: false,
    rolling_function: false,
    doc: "Percentile rank within the full column, ties averaged",
};

#[distributed_slice(PRIMITIVES)]
pub static ISIN: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "isin",
    input_types: &[&[VariableKind::Variable]],
    return_type: VariableKind::Boolean,
    uses_calc_time: false,
    rolling_function: false,
    doc: "Membership in a list bound at construction",
};

/// True where the value is missing: `is_null(x)`
pub fn is_null(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(&IS_NULL, vec![base.into()], Computation::IsNull)
}

/// Elementwise absolute value: `absolute(x)`
pub fn absolute(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(&ABSOLUTE, vec![base.into()], Computation::Absolute)
}

/// Elementwise logical negation: `not(x)`
pub fn not(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(&NOT, vec![base.into()], Computation::Not)
}

/// Each value replaced by its percentile rank in (0, 1]: `percentile(x)`
pub fn percentile(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(&PERCENTILE, vec![base.into()], Computation::Percentile)
}

/// True where the value is a member of `values`: `isin(x, values)`
///
/// The list is bound at construction, not per call; an empty list matches
/// nothing. Display name: `x.isin([v, ...])`.
pub fn is_in(
    base: impl Into<FeatureArg>,
    values: Vec<Datum>,
) -> Result<TransformFeature, DefinitionError> {
    let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
    TransformFeature::build_named(
        &ISIN,
        vec![base.into()],
        Computation::IsIn { values },
        |bases| format!("{}.isin([{}])", bases[0].name(), rendered.join(", ")),
    )
}

pub(crate) fn is_null_values(array: &DataArray) -> Vec<Option<bool>> {
    (0..array.len())
        .map(|i| Some(array.datum(i).is_null()))
        .collect()
}

pub(crate) fn absolute_values(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(f64::abs)).collect()
}

pub(crate) fn not_values(values: &[Option<bool>]) -> Vec<Option<bool>> {
    values.iter().map(|v| v.map(|b| !b)).collect()
}

/// Average-rank percentile over the non-missing values.
///
/// Missing values stay missing and are excluded from the denominator.
pub(crate) fn percentile_values(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    present.sort_by(|a, b| a.1.total_cmp(&b.1));

    let count = present.len() as f64;
    let mut out = vec![None; values.len()];
    let mut i = 0;
    while i < present.len() {
        let mut j = i;
        while j + 1 < present.len() && present[j + 1].1 == present[i].1 {
            j += 1;
        }
        // Tied values share the average of their one-based ranks.
        let rank = (i + j + 2) as f64 / 2.0;
        for &(index, _) in &present[i..=j] {
            out[index] = Some(rank / count);
        }
        i = j + 1;
    }
    out
}

pub(crate) fn is_in_values(array: &DataArray, values: &[Datum]) -> Vec<Option<bool>> {
    (0..array.len())
        .map(|i| {
            let datum = array.datum(i);
            Some(values.iter().any(|candidate| datum.matches(candidate)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{column, log_entity};
    use canopy_feature::Feature;

    #[test]
    fn test_is_null_marks_missing() {
        let out = Computation::IsNull
            .apply(&[DataArray::Numeric(vec![Some(1.0), None, Some(3.0)])], None)
            .unwrap();
        assert_eq!(
            out,
            DataArray::Boolean(vec![Some(false), Some(true), Some(false)])
        );
    }

    #[test]
    fn test_absolute() {
        let out = Computation::Absolute
            .apply(&[DataArray::Numeric(vec![Some(-2.5), Some(4.0), None])], None)
            .unwrap();
        assert_eq!(out, DataArray::Numeric(vec![Some(2.5), Some(4.0), None]));
    }

    #[test]
    fn test_not() {
        let out = Computation::Not
            .apply(&[DataArray::Boolean(vec![Some(true), None, Some(false)])], None)
            .unwrap();
        assert_eq!(out, DataArray::Boolean(vec![Some(false), None, Some(true)]));
    }

    #[test]
    fn test_percentile_evenly_spaced() {
        let out = percentile_values(&[Some(10.0), Some(20.0), Some(30.0), Some(40.0)]);
        assert_eq!(out, vec![Some(0.25), Some(0.5), Some(0.75), Some(1.0)]);
    }

    #[test]
    fn test_percentile_averages_ties_and_skips_missing() {
        let out = percentile_values(&[Some(1.0), Some(1.0), None, Some(2.0)]);
        // Ranks 1 and 2 average to 1.5 over 3 present values.
        assert_eq!(out, vec![Some(0.5), Some(0.5), None, Some(1.0)]);
    }

    #[test]
    fn test_is_in_membership() {
        let array = DataArray::Integer(vec![Some(1), Some(2), Some(3), Some(4)]);
        let out = is_in_values(&array, &[Datum::Int(1), Datum::Int(3)]);
        assert_eq!(out, vec![Some(true), Some(false), Some(true), Some(false)]);
    }

    #[test]
    fn test_is_in_empty_list_matches_nothing() {
        let array = DataArray::Integer(vec![Some(1), None]);
        let out = is_in_values(&array, &[]);
        assert_eq!(out, vec![Some(false), Some(false)]);
    }

    #[test]
    fn test_is_in_display_name_embeds_list() {
        let entity = log_entity();
        let value = column(&entity, "value");
        let f = is_in(&value, vec![Datum::Int(1), Datum::Int(3)]).unwrap();
        assert_eq!(f.name(), "value.isin([1, 3])");
    }

    #[test]
    fn test_not_display_name() {
        let entity = log_entity();
        let flag = column(&entity, "flag");
        assert_eq!(not(&flag).unwrap().name(), "NOT(flag)");
    }

    #[test]
    fn test_is_null_accepts_any_kind() {
        let entity = log_entity();
        for name in ["value", "flag", "session_id", "happened_at"] {
            let f = column(&entity, name);
            assert!(is_null(&f).is_ok(), "is_null rejected column {name}");
        }
    }
}
