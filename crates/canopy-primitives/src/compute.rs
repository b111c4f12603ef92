//! Deferred vectorized computations
//!
//! [`Computation`] is the value a constructed transform binds instead of
//! executing anything eagerly. Parameters fixed at construction (a
//! membership list, a time unit) are carried as plain data in the variant,
//! so every computation is referentially transparent and testable in
//! isolation.
//!
//! `apply` is pure: it never mutates its inputs and holds no shared state,
//! so concurrent invocation across instances and row batches needs no
//! coordination. The grouped computations process the full column as one
//! unit; the previous-row relationship is group-order-dependent and not
//! decomposable into arbitrary row ranges.

use chrono::{DateTime, Utc};
use thiserror::Error;

use canopy_types::{DataArray, Datum};

use crate::calendar::CalendarUnit;
use crate::duration::DurationUnit;
use crate::{basic, calendar, duration, grouped, since};

/// Computation-time failures.
///
/// Definition-time validation guarantees kind-correct *features*; the
/// resolved arrays are supplied later by an external runtime and may still
/// disagree with the contract. Nothing here is silently corrected.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Wrong number of input arrays for the computation.
    #[error("`{primitive}` expects {expected} input array(s), got {got}")]
    WrongArity {
        /// Transformation name.
        primitive: &'static str,
        /// Declared arity.
        expected: usize,
        /// Arrays supplied.
        got: usize,
    },

    /// An input array's physical variant does not match the contract.
    #[error("`{primitive}` expects a {expected} array at position {position}, got {got}")]
    ArrayKind {
        /// Transformation name.
        primitive: &'static str,
        /// Zero-based array position.
        position: usize,
        /// Expected variant name.
        expected: &'static str,
        /// Supplied variant name.
        got: &'static str,
    },

    /// Positionally aligned input arrays differ in length.
    #[error("`{primitive}` input arrays must share one length: {left} vs {right}")]
    LengthMismatch {
        /// Transformation name.
        primitive: &'static str,
        /// Length of the first array.
        left: usize,
        /// Length of the offending array.
        right: usize,
    },
}

/// A deferred, pure, vectorized computation.
///
/// Input arrays are positionally aligned with the transform's base
/// features; grouped computations take the grouping key's resolved values
/// last. Calc-time-aware computations additionally consume the reference
/// time; `None` substitutes the wall clock at call time, never at
/// construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum Computation {
    /// True where the value is missing.
    IsNull,
    /// Elementwise absolute value.
    Absolute,
    /// Elementwise logical negation.
    Not,
    /// Average-rank percentile within the full column.
    Percentile,
    /// Membership in the bound list.
    IsIn {
        /// Values bound at construction; empty means nothing matches.
        values: Vec<Datum>,
    },
    /// True on Saturday/Sunday.
    Weekend,
    /// Calendar component extraction.
    Calendar(CalendarUnit),
    /// Duration-to-unit-count conversion.
    Duration(DurationUnit),
    /// Reference time minus value.
    TimeSince,
    /// Day-count form of `TimeSince`.
    DaysSince,
    /// Per-group seconds since the previous row.
    TimeSincePrevious,
    /// Per-group difference from the previous row.
    Diff,
}

impl Computation {
    /// The owning transformation's name, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Computation::IsNull => "is_null",
            Computation::Absolute => "absolute",
            Computation::Not => "not",
            Computation::Percentile => "percentile",
            Computation::IsIn { .. } => "isin",
            Computation::Weekend => "is_weekend",
            Computation::Calendar(unit) => unit.primitive_name(),
            Computation::Duration(unit) => unit.primitive_name(),
            Computation::TimeSince => "time_since",
            Computation::DaysSince => "days_since",
            Computation::TimeSincePrevious => "time_since_previous",
            Computation::Diff => "diff",
        }
    }

    /// True when `apply` consumes the reference time.
    pub fn uses_calc_time(&self) -> bool {
        matches!(self, Computation::TimeSince | Computation::DaysSince)
    }

    /// Runs the computation over resolved input arrays.
    ///
    /// Safe to call repeatedly; inputs are never mutated.
    pub fn apply(
        &self,
        arrays: &[DataArray],
        reference_time: Option<DateTime<Utc>>,
    ) -> Result<DataArray, EvalError> {
        let name = self.name();
        match self {
            Computation::IsNull => {
                let input = expect_one(name, arrays)?;
                Ok(DataArray::Boolean(basic::is_null_values(input)))
            }
            Computation::Absolute => {
                let values = numeric(name, 0, expect_one(name, arrays)?)?;
                Ok(DataArray::Numeric(basic::absolute_values(values)))
            }
            Computation::Not => {
                let values = boolean(name, 0, expect_one(name, arrays)?)?;
                Ok(DataArray::Boolean(basic::not_values(values)))
            }
            Computation::Percentile => {
                let values = numeric(name, 0, expect_one(name, arrays)?)?;
                Ok(DataArray::Numeric(basic::percentile_values(values)))
            }
            Computation::IsIn { values } => {
                let input = expect_one(name, arrays)?;
                Ok(DataArray::Boolean(basic::is_in_values(input, values)))
            }
            Computation::Weekend => {
                let values = datetime(name, 0, expect_one(name, arrays)?)?;
                Ok(DataArray::Boolean(calendar::weekend_values(values)))
            }
            Computation::Calendar(unit) => {
                let values = datetime(name, 0, expect_one(name, arrays)?)?;
                Ok(DataArray::Integer(calendar::extract_values(*unit, values)))
            }
            Computation::Duration(unit) => {
                let values = timedelta(name, 0, expect_one(name, arrays)?)?;
                Ok(DataArray::Numeric(duration::convert_values(*unit, values)))
            }
            Computation::TimeSince => {
                let values = datetime(name, 0, expect_one(name, arrays)?)?;
                let reference = reference_time.unwrap_or_else(Utc::now);
                Ok(DataArray::Timedelta(since::time_since_values(values, reference)))
            }
            Computation::DaysSince => {
                let values = datetime(name, 0, expect_one(name, arrays)?)?;
                let reference = reference_time.unwrap_or_else(Utc::now);
                Ok(DataArray::Numeric(since::days_since_values(values, reference)))
            }
            Computation::TimeSincePrevious => {
                let [base, keys] = expect_two(name, arrays)?;
                let values = datetime(name, 0, base)?;
                Ok(DataArray::Numeric(grouped::time_since_previous_values(
                    name, values, keys,
                )?))
            }
            Computation::Diff => {
                let [base, keys] = expect_two(name, arrays)?;
                let values = numeric(name, 0, base)?;
                Ok(DataArray::Numeric(grouped::diff_values(name, values, keys)?))
            }
        }
    }
}

fn expect_one<'a>(
    primitive: &'static str,
    arrays: &'a [DataArray],
) -> Result<&'a DataArray, EvalError> {
    match arrays {
        [one] => Ok(one),
        _ => Err(EvalError::WrongArity {
            primitive,
            expected: 1,
            got: arrays.len(),
        }),
    }
}

fn expect_two<'a>(
    primitive: &'static str,
    arrays: &'a [DataArray],
) -> Result<[&'a DataArray; 2], EvalError> {
    match arrays {
        [base, keys] => Ok([base, keys]),
        _ => Err(EvalError::WrongArity {
            primitive,
            expected: 2,
            got: arrays.len(),
        }),
    }
}

fn numeric<'a>(
    primitive: &'static str,
    position: usize,
    array: &'a DataArray,
) -> Result<&'a [Option<f64>], EvalError> {
    array.as_numeric().ok_or_else(|| EvalError::ArrayKind {
        primitive,
        position,
        expected: "numeric",
        got: array.kind_name(),
    })
}

fn boolean<'a>(
    primitive: &'static str,
    position: usize,
    array: &'a DataArray,
) -> Result<&'a [Option<bool>], EvalError> {
    array.as_boolean().ok_or_else(|| EvalError::ArrayKind {
        primitive,
        position,
        expected: "boolean",
        got: array.kind_name(),
    })
}

fn datetime<'a>(
    primitive: &'static str,
    position: usize,
    array: &'a DataArray,
) -> Result<&'a [Option<DateTime<Utc>>], EvalError> {
    array.as_datetime().ok_or_else(|| EvalError::ArrayKind {
        primitive,
        position,
        expected: "datetime",
        got: array.kind_name(),
    })
}

fn timedelta<'a>(
    primitive: &'static str,
    position: usize,
    array: &'a DataArray,
) -> Result<&'a [Option<chrono::Duration>], EvalError> {
    array.as_timedelta().ok_or_else(|| EvalError::ArrayKind {
        primitive,
        position,
        expected: "timedelta",
        got: array.kind_name(),
    })
}
