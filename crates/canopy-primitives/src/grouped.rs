//! Grouped previous-row transformations
//!
//! `diff` and `time_since_previous` relate each row to the immediately
//! preceding row *within its group*, where the group is defined by a
//! Discrete-kind key feature passed as the last argument. Output preserves
//! the input row order; the first row of each group (and every row of a
//! singleton group) yields the missing sentinel.
//!
//! The previous-row relationship is group-order-dependent, so each column
//! is processed as one unit; callers wanting parallelism must partition by
//! the grouping key first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use linkme::distributed_slice;

use canopy_feature::{DefinitionError, FeatureArg};
use canopy_types::{DataArray, Datum, VariableKind};

use crate::compute::{Computation, EvalError};
use crate::descriptor::{PrimitiveDescriptor, PRIMITIVES};
use crate::duration::total_seconds;
use crate::transform::TransformFeature;

#[distributed_slice(PRIMITIVES)]
pub static DIFF: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "diff",
    input_types: &[&[VariableKind::Numeric, VariableKind::Discrete]],
    return_type: VariableKind::Numeric,
    uses_calc_time: false,
    rolling_function: false,
    doc: "Per-group difference from the previous row",
};

#[distributed_slice(PRIMITIVES)]
pub static TIME_SINCE_PREVIOUS: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "time_since_previous",
    input_types: &[&[VariableKind::DatetimeTimeIndex, VariableKind::Discrete]],
    return_type: VariableKind::Numeric,
    uses_calc_time: false,
    rolling_function: false,
    doc: "Per-group seconds since the previous row",
};

/// This row's value minus the previous value within the same group:
/// `diff(x, group)`. Display name: `DIFF(x by group)`.
pub fn diff(
    base: impl Into<FeatureArg>,
    group: impl Into<FeatureArg>,
) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build_named(
        &DIFF,
        vec![base.into(), group.into()],
        Computation::Diff,
        |bases| format!("DIFF({} by {})", bases[0].name(), bases[1].name()),
    )
}

/// Seconds between this row's time and the previous row's time within the
/// same group: `time_since_previous(t, group)`. Display name:
/// `time_since_previous_by_<group>`.
pub fn time_since_previous(
    time_index: impl Into<FeatureArg>,
    group: impl Into<FeatureArg>,
) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build_named(
        &TIME_SINCE_PREVIOUS,
        vec![time_index.into(), group.into()],
        Computation::TimeSincePrevious,
        |bases| format!("time_since_previous_by_{}", bases[1].name()),
    )
}

/// Hashable view of a grouping-key scalar.
///
/// Float keys hash by bit pattern; arrays are homogeneous, so the variant
/// never mixes within one call.
#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey {
    Bool(bool),
    Int(i64),
    Bits(u64),
    Text(String),
}

impl GroupKey {
    /// `None` for missing keys: the row belongs to no group.
    fn from_datum(datum: Datum) -> Option<GroupKey> {
        match datum {
            Datum::Null => None,
            Datum::Bool(v) => Some(GroupKey::Bool(v)),
            Datum::Int(v) => Some(GroupKey::Int(v)),
            Datum::Float(v) => Some(GroupKey::Bits(v.to_bits())),
            Datum::Text(v) => Some(GroupKey::Text(v)),
            Datum::Datetime(v) => Some(GroupKey::Int(v.timestamp_micros())),
            Datum::Timedelta(v) => Some(GroupKey::Int(v.num_milliseconds())),
        }
    }
}

/// Pairs each row's value with the previous value in its group.
///
/// A missing value still becomes the group's previous value, so the next
/// row in the group yields the sentinel too.
fn pair_with_previous<T: Clone>(
    primitive: &'static str,
    values: &[Option<T>],
    keys: &DataArray,
) -> Result<Vec<Option<(T, T)>>, EvalError> {
    if keys.len() != values.len() {
        return Err(EvalError::LengthMismatch {
            primitive,
            left: values.len(),
            right: keys.len(),
        });
    }

    let mut last: HashMap<GroupKey, Option<T>> = HashMap::new();
    let mut out = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        let Some(key) = GroupKey::from_datum(keys.datum(i)) else {
            out.push(None);
            continue;
        };
        let previous = last.insert(key, value.clone());
        out.push(match (previous.flatten(), value.clone()) {
            (Some(previous), Some(current)) => Some((previous, current)),
            _ => None,
        });
    }
    Ok(out)
}

pub(crate) fn diff_values(
    primitive: &'static str,
    values: &[Option<f64>],
    keys: &DataArray,
) -> Result<Vec<Option<f64>>, EvalError> {
    let pairs = pair_with_previous(primitive, values, keys)?;
    Ok(pairs
        .into_iter()
        .map(|pair| pair.map(|(previous, current)| current - previous))
        .collect())
}

pub(crate) fn time_since_previous_values(
    primitive: &'static str,
    values: &[Option<DateTime<Utc>>],
    keys: &DataArray,
) -> Result<Vec<Option<f64>>, EvalError> {
    let pairs = pair_with_previous(primitive, values, keys)?;
    Ok(pairs
        .into_iter()
        .map(|pair| pair.map(|(previous, current)| total_seconds(current - previous)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{column, log_entity};
    use canopy_feature::Feature;
    use chrono::{Duration, TimeZone};

    fn keys(names: &[Option<&str>]) -> DataArray {
        DataArray::Text(names.iter().map(|n| n.map(str::to_owned)).collect())
    }

    #[test]
    fn test_first_row_of_each_group_is_missing() {
        let out = diff_values(
            "diff",
            &[Some(1.0), Some(3.0), Some(10.0)],
            &keys(&[Some("g1"), Some("g1"), Some("g2")]),
        )
        .unwrap();
        assert_eq!(out, vec![None, Some(2.0), None]);
    }

    #[test]
    fn test_interleaved_groups_preserve_row_order() {
        let out = diff_values(
            "diff",
            &[Some(1.0), Some(2.0), Some(10.0), Some(4.0)],
            &keys(&[Some("a"), Some("b"), Some("a"), Some("b")]),
        )
        .unwrap();
        assert_eq!(out, vec![None, None, Some(9.0), Some(2.0)]);
    }

    #[test]
    fn test_missing_value_poisons_neighboring_diffs() {
        let out = diff_values(
            "diff",
            &[Some(1.0), None, Some(4.0)],
            &keys(&[Some("g"), Some("g"), Some("g")]),
        )
        .unwrap();
        // Row 1 has no value; row 2's previous is the missing row.
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn test_missing_group_key_yields_missing() {
        let out = diff_values(
            "diff",
            &[Some(1.0), Some(2.0), Some(3.0)],
            &keys(&[Some("g"), None, Some("g")]),
        )
        .unwrap();
        assert_eq!(out, vec![None, None, Some(2.0)]);
    }

    #[test]
    fn test_singleton_groups_all_missing() {
        let out = diff_values(
            "diff",
            &[Some(1.0), Some(2.0)],
            &keys(&[Some("a"), Some("b")]),
        )
        .unwrap();
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn test_time_since_previous_in_seconds() {
        let t1 = Utc.with_ymd_and_hms(2017, 3, 15, 12, 0, 0).unwrap();
        let t2 = t1 + Duration::seconds(90);
        let t3 = t1 + Duration::seconds(300);
        let out = time_since_previous_values(
            "time_since_previous",
            &[Some(t1), Some(t2), Some(t3)],
            &keys(&[Some("g1"), Some("g1"), Some("g2")]),
        )
        .unwrap();
        assert_eq!(out, vec![None, Some(90.0), None]);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let err = diff_values("diff", &[Some(1.0)], &keys(&[Some("a"), Some("b")])).unwrap_err();
        assert!(matches!(
            err,
            EvalError::LengthMismatch { primitive: "diff", left: 1, right: 2 }
        ));
    }

    #[test]
    fn test_group_key_must_be_discrete() {
        let entity = log_entity();
        let value = column(&entity, "value");
        let numeric_group = column(&entity, "amount");
        let err = diff(&value, &numeric_group).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::TypeContractViolation { primitive: "diff", position: 1, .. }
        ));
    }

    #[test]
    fn test_categorical_group_key_satisfies_contract() {
        let entity = log_entity();
        let value = column(&entity, "value");
        let category = column(&entity, "kind");
        assert!(diff(&value, &category).is_ok());
    }

    #[test]
    fn test_display_names() {
        let entity = log_entity();
        let value = column(&entity, "value");
        let at = column(&entity, "occurred_at");
        let group = column(&entity, "session_id");

        assert_eq!(diff(&value, &group).unwrap().name(), "DIFF(value by session_id)");
        assert_eq!(
            time_since_previous(&at, &group).unwrap().name(),
            "time_since_previous_by_session_id"
        );
    }
}
