//! Datetime unit family
//!
//! Extracts calendar/time components from datetime columns as integer
//! ordinals, plus the weekend test. The family shares one contract
//! (Datetime → Ordinal) and one parameterized constructor; each unit keeps
//! its own name identity and registry row.

use chrono::{DateTime, Datelike, Timelike, Utc};
use linkme::distributed_slice;

use canopy_feature::{DefinitionError, FeatureArg};
use canopy_types::VariableKind;

use crate::compute::Computation;
use crate::descriptor::{PrimitiveDescriptor, PRIMITIVES};
use crate::transform::TransformFeature;

macro_rules! calendar_units {
    ($($(#[$meta:meta])* ($unit:ident, $desc:ident, $ctor:ident, $name:literal, $doc:literal)),+ $(,)?) => {
        /// Calendar/time component extracted by the datetime unit family.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CalendarUnit {
            $(
                #[doc = $doc]
                $unit,
            )+
        }

        impl CalendarUnit {
            /// The unit's transformation name (e.g. "day", "weekday").
            pub const fn primitive_name(self) -> &'static str {
                match self {
                    $(CalendarUnit::$unit => $name,)+
                }
            }

            /// The unit's registered descriptor.
            pub fn descriptor(self) -> &'static PrimitiveDescriptor {
                match self {
                    $(CalendarUnit::$unit => &$desc,)+
                }
            }
        }

        $(
            #[distributed_slice(PRIMITIVES)]
            pub static $desc: PrimitiveDescriptor = PrimitiveDescriptor {
                name: $name,
                input_types: &[&[VariableKind::Datetime]],
                return_type: VariableKind::Ordinal,
                uses_calc_time: false,
                rolling_function: false,
                doc: $doc,
            };

            $(#[$meta])*
            pub fn $ctor(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
                calendar(CalendarUnit::$unit, base)
            }
        )+
    };
}

calendar_units! {
    /// Day of month, 1-31: `day(x)`
    (Day, DAY, day, "day", "Day of month"),
    /// Hour of day, 0-23: `hour(x)`
    (Hour, HOUR, hour, "hour", "Hour of day"),
    /// Second of minute, 0-59: `second(x)`
    (Second, SECOND, second, "second", "Second of minute"),
    /// Minute of hour, 0-59: `minute(x)`
    (Minute, MINUTE, minute, "minute", "Minute of hour"),
    /// ISO week of year, 1-53: `week(x)`
    (Week, WEEK, week, "week", "ISO week of year"),
    /// Month of year, 1-12: `month(x)`
    (Month, MONTH, month, "month", "Month of year"),
    /// Calendar year: `year(x)`
    (Year, YEAR, year, "year", "Calendar year"),
    /// Weekday index, 0=Monday through 6=Sunday: `weekday(x)`
    (Weekday, WEEKDAY, weekday, "weekday", "Weekday index, 0=Monday"),
}

#[distributed_slice(PRIMITIVES)]
pub static IS_WEEKEND: PrimitiveDescriptor = PrimitiveDescriptor {
    name: "is_weekend",
    input_types: &[&[VariableKind::Datetime]],
    return_type: VariableKind::Boolean,
    uses_calc_time: false,
    rolling_function: false,
    doc: "True on Saturday and Sunday",
};

/// Parameterized constructor for the whole family: unit → contract and
/// extraction rule.
pub fn calendar(
    unit: CalendarUnit,
    base: impl Into<FeatureArg>,
) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(unit.descriptor(), vec![base.into()], Computation::Calendar(unit))
}

/// True where the weekday index exceeds 4: `is_weekend(x)`
pub fn is_weekend(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(&IS_WEEKEND, vec![base.into()], Computation::Weekend)
}

fn extract(unit: CalendarUnit, value: DateTime<Utc>) -> i64 {
    match unit {
        CalendarUnit::Day => i64::from(value.day()),
        CalendarUnit::Hour => i64::from(value.hour()),
        CalendarUnit::Second => i64::from(value.second()),
        CalendarUnit::Minute => i64::from(value.minute()),
        CalendarUnit::Week => i64::from(value.iso_week().week()),
        CalendarUnit::Month => i64::from(value.month()),
        CalendarUnit::Year => i64::from(value.year()),
        CalendarUnit::Weekday => i64::from(value.weekday().num_days_from_monday()),
    }
}

pub(crate) fn extract_values(
    unit: CalendarUnit,
    values: &[Option<DateTime<Utc>>],
) -> Vec<Option<i64>> {
    values.iter().map(|v| v.map(|dt| extract(unit, dt))).collect()
}

pub(crate) fn weekend_values(values: &[Option<DateTime<Utc>>]) -> Vec<Option<bool>> {
    values
        .iter()
        .map(|v| v.map(|dt| dt.weekday().num_days_from_monday() > 4))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{column, log_entity};
    use canopy_feature::Feature;
    use canopy_types::DataArray;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        // Wednesday 2017-03-15 14:25:09 UTC.
        Utc.with_ymd_and_hms(2017, 3, 15, 14, 25, 9).unwrap()
    }

    #[test]
    fn test_component_extraction() {
        let dt = sample();
        assert_eq!(extract(CalendarUnit::Day, dt), 15);
        assert_eq!(extract(CalendarUnit::Hour, dt), 14);
        assert_eq!(extract(CalendarUnit::Minute, dt), 25);
        assert_eq!(extract(CalendarUnit::Second, dt), 9);
        assert_eq!(extract(CalendarUnit::Week, dt), 11);
        assert_eq!(extract(CalendarUnit::Month, dt), 3);
        assert_eq!(extract(CalendarUnit::Year, dt), 2017);
        assert_eq!(extract(CalendarUnit::Weekday, dt), 2);
    }

    #[test]
    fn test_weekend_boundary() {
        let friday = Utc.with_ymd_and_hms(2017, 3, 17, 12, 0, 0).unwrap();
        let saturday = Utc.with_ymd_and_hms(2017, 3, 18, 12, 0, 0).unwrap();
        let sunday = Utc.with_ymd_and_hms(2017, 3, 19, 12, 0, 0).unwrap();
        let out = weekend_values(&[Some(friday), Some(saturday), Some(sunday), None]);
        assert_eq!(out, vec![Some(false), Some(true), Some(true), None]);
    }

    #[test]
    fn test_units_keep_distinct_identity() {
        let entity = log_entity();
        let at = column(&entity, "happened_at");
        let d = day(&at).unwrap();
        let h = hour(&at).unwrap();
        assert_eq!(d.name(), "DAY(happened_at)");
        assert_eq!(h.name(), "HOUR(happened_at)");
        assert_ne!(d.descriptor().name, h.descriptor().name);
        assert_eq!(d.variable_type(), VariableKind::Ordinal);
    }

    #[test]
    fn test_family_applies_through_computation() {
        let out = Computation::Calendar(CalendarUnit::Month)
            .apply(&[DataArray::Datetime(vec![Some(sample()), None])], None)
            .unwrap();
        assert_eq!(out, DataArray::Integer(vec![Some(3), None]));
    }

    #[test]
    fn test_rejects_non_datetime_base() {
        let entity = log_entity();
        let value = column(&entity, "value");
        assert!(matches!(
            day(&value).unwrap_err(),
            DefinitionError::TypeContractViolation { primitive: "day", .. }
        ));
    }
}
