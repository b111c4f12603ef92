//! Calc-time-aware transformations
//!
//! `time_since` and `days_since` measure each value against an externally
//! supplied reference time. The reference is always an explicit parameter
//! of the bound function; when the caller passes `None`, the wall clock is
//! read at call time, never at construction time.

use chrono::{DateTime, Utc};
use linkme::distributed_slice;

use canopy_feature::{DefinitionError, FeatureArg};
use canopy_types::VariableKind;

use crate::compute::Computation;
use crate::descriptor::{PrimitiveDescriptor, PRIMITIVES};
use crate::duration::DurationUnit;
use crate::transform::TransformFeature;

#[distributed_slice(PRIMITIVES)]
pub static TIME_SINCE: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "time_since",
    input_types: &[&[VariableKind::DatetimeTimeIndex], &[VariableKind::Datetime]],
    return_type: VariableKind::Timedelta,
    uses_calc_time: true,
    rolling_function: false,
    doc: "Timedelta between the reference time and each value",
};

#[distributed_slice(PRIMITIVES)]
pub static DAYS_SINCE: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "days_since",
    input_types: &[&[VariableKind::DatetimeTimeIndex]],
    return_type: VariableKind::Numeric,
    uses_calc_time: true,
    rolling_function: false,
    doc: "Days between the reference time and each value",
};

/// Reference time minus the value: `time_since(x)`
pub fn time_since(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(&TIME_SINCE, vec![base.into()], Computation::TimeSince)
}

/// Reference time minus the value, in whole/fractional days: `days_since(x)`
pub fn days_since(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(&DAYS_SINCE, vec![base.into()], Computation::DaysSince)
}

pub(crate) fn time_since_values(
    values: &[Option<DateTime<Utc>>],
    reference: DateTime<Utc>,
) -> Vec<Option<chrono::Duration>> {
    values.iter().map(|v| v.map(|t| reference - t)).collect()
}

pub(crate) fn days_since_values(
    values: &[Option<DateTime<Utc>>],
    reference: DateTime<Utc>,
) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| v.map(|t| DurationUnit::Days.convert(reference - t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{column, log_entity};
    use canopy_feature::Feature;
    use canopy_types::DataArray;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_explicit_reference_time_is_exact() {
        let reference = Utc.with_ymd_and_hms(2017, 3, 15, 12, 0, 0).unwrap();
        let earlier = reference - Duration::hours(6);
        let out = Computation::TimeSince
            .apply(
                &[DataArray::Datetime(vec![Some(earlier), None])],
                Some(reference),
            )
            .unwrap();
        assert_eq!(
            out,
            DataArray::Timedelta(vec![Some(Duration::hours(6)), None])
        );
    }

    #[test]
    fn test_days_since_is_fractional() {
        let reference = Utc.with_ymd_and_hms(2017, 3, 15, 12, 0, 0).unwrap();
        let out = Computation::DaysSince
            .apply(
                &[DataArray::Datetime(vec![Some(reference - Duration::hours(36))])],
                Some(reference),
            )
            .unwrap();
        assert_eq!(out, DataArray::Numeric(vec![Some(1.5)]));
    }

    #[test]
    fn test_missing_reference_substitutes_call_time() {
        let value = Utc.with_ymd_and_hms(2017, 3, 15, 12, 0, 0).unwrap();
        let arrays = [DataArray::Datetime(vec![Some(value)])];

        let before = Utc::now();
        let out = Computation::TimeSince.apply(&arrays, None).unwrap();
        let after = Utc::now();

        let got = out.as_timedelta().unwrap()[0].unwrap();
        assert!(got >= before - value);
        assert!(got <= after - value);
    }

    #[test]
    fn test_time_since_accepts_both_overloads() {
        let entity = log_entity();
        // The declared time index and a plain datetime column both satisfy
        // the contract.
        let indexed = column(&entity, "occurred_at");
        let plain = column(&entity, "happened_at");
        assert!(time_since(&indexed).is_ok());
        assert!(time_since(&plain).is_ok());
        assert_eq!(
            time_since(&indexed).unwrap().name(),
            "TIME_SINCE(occurred_at)"
        );
    }

    #[test]
    fn test_days_since_requires_time_index() {
        let entity = log_entity();
        let plain = column(&entity, "happened_at");
        assert!(matches!(
            days_since(&plain).unwrap_err(),
            DefinitionError::TypeContractViolation { primitive: "days_since", .. }
        ));
        assert!(days_since(&column(&entity, "occurred_at")).is_ok());
    }

    #[test]
    fn test_descriptors_flag_calc_time() {
        assert!(TIME_SINCE.uses_calc_time);
        assert!(DAYS_SINCE.uses_calc_time);
    }
}
