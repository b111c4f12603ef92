//! Timedelta unit family
//!
//! Converts duration columns into counts of a named unit. Counts are total
//! (fractional), so 90 minutes is 1.5 hours. Units without a direct
//! representation derive from the seconds- or days-based count through an
//! explicit conversion table; months and years use fixed approximations
//! (365-day year, 12/365 month) rather than calendar arithmetic, and those
//! constants are load-bearing for downstream consumers.

use chrono::Duration;
use linkme::distributed_slice;

use canopy_feature::{DefinitionError, FeatureArg};
use canopy_types::VariableKind;

use crate::compute::Computation;
use crate::descriptor::{PrimitiveDescriptor, PRIMITIVES};
use crate::transform::TransformFeature;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

macro_rules! duration_units {
    ($($(#[$meta:meta])* ($unit:ident, $desc:ident, $ctor:ident, $name:literal, $doc:literal)),+ $(,)?) => {
        /// Unit a duration column is counted in.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DurationUnit {
            $(
                #[doc = $doc]
                $unit,
            )+
        }

        impl DurationUnit {
            /// The unit's transformation name (e.g. "days", "hours").
            pub const fn primitive_name(self) -> &'static str {
                match self {
                    $(DurationUnit::$unit => $name,)+
                }
            }

            /// The unit's registered descriptor.
            pub fn descriptor(self) -> &'static PrimitiveDescriptor {
                match self {
                    $(DurationUnit::$unit => &$desc,)+
                }
            }
        }

        $(
            #[distributed_slice(PRIMITIVES)]
            pub static $desc: PrimitiveDescriptor = PrimitiveDescriptor {
                name: $name,
                input_types: &[&[VariableKind::Timedelta]],
                return_type: VariableKind::Numeric,
                uses_calc_time: false,
                rolling_function: false,
                doc: $doc,
            };

            $(#[$meta])*
            pub fn $ctor(base: impl Into<FeatureArg>) -> Result<TransformFeature, DefinitionError> {
                duration(DurationUnit::$unit, base)
            }
        )+
    };
}

duration_units! {
    /// Total days, fractional: `days(x)`
    (Days, DAYS, days, "days", "Duration as a count of days"),
    /// Total hours, fractional: `hours(x)`
    (Hours, HOURS, hours, "hours", "Duration as a count of hours"),
    /// Total seconds, fractional: `seconds(x)`
    (Seconds, SECONDS, seconds, "seconds", "Duration as a count of seconds"),
    /// Total minutes, fractional: `minutes(x)`
    (Minutes, MINUTES, minutes, "minutes", "Duration as a count of minutes"),
    /// Days / 7: `weeks(x)`
    (Weeks, WEEKS, weeks, "weeks", "Duration as a count of weeks"),
    /// Days * 12/365, a non-calendar-aware approximation: `months(x)`
    (Months, MONTHS, months, "months", "Duration as an approximate count of months"),
    /// Days / 365, a non-calendar-aware approximation: `years(x)`
    (Years, YEARS, years, "years", "Duration as an approximate count of years"),
}

impl DurationUnit {
    /// Converts one duration into this unit's count.
    ///
    /// The conversion table, with `seconds` as the base count:
    /// minutes = seconds/60, hours = seconds/3600, days = seconds/86400,
    /// weeks = days/7, months = days × (12/365), years = days/365.
    pub fn convert(self, value: Duration) -> f64 {
        let seconds = total_seconds(value);
        match self {
            DurationUnit::Seconds => seconds,
            DurationUnit::Minutes => seconds / SECONDS_PER_MINUTE,
            DurationUnit::Hours => seconds / SECONDS_PER_HOUR,
            DurationUnit::Days => seconds / SECONDS_PER_DAY,
            DurationUnit::Weeks => seconds / SECONDS_PER_DAY / 7.0,
            DurationUnit::Months => seconds / SECONDS_PER_DAY * (12.0 / 365.0),
            DurationUnit::Years => seconds / SECONDS_PER_DAY / 365.0,
        }
    }
}

/// Parameterized constructor for the whole family: unit → contract and
/// conversion rule.
pub fn duration(
    unit: DurationUnit,
    base: impl Into<FeatureArg>,
) -> Result<TransformFeature, DefinitionError> {
    TransformFeature::build(unit.descriptor(), vec![base.into()], Computation::Duration(unit))
}

/// Total fractional seconds of a duration, sign-preserving.
pub(crate) fn total_seconds(value: Duration) -> f64 {
    value.num_seconds() as f64 + f64::from(value.subsec_nanos()) * 1e-9
}

pub(crate) fn convert_values(
    unit: DurationUnit,
    values: &[Option<Duration>],
) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(|d| unit.convert(d))).collect()
}
