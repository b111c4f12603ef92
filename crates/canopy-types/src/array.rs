//! Columnar arrays
//!
//! [`DataArray`] is the unit of vectorized computation: one typed column
//! with per-element missingness. Primitives consume borrowed arrays and
//! produce a fresh array tagged with their declared output kind; inputs are
//! never mutated.

use chrono::{DateTime, Duration, Utc};

use crate::Datum;

/// A typed column with per-element missingness.
#[derive(Debug, Clone, PartialEq)]
pub enum DataArray {
    /// True/false column.
    Boolean(Vec<Option<bool>>),
    /// Integer column (ids, ordinals).
    Integer(Vec<Option<i64>>),
    /// Float column.
    Numeric(Vec<Option<f64>>),
    /// Text column.
    Text(Vec<Option<String>>),
    /// Datetime column (UTC).
    Datetime(Vec<Option<DateTime<Utc>>>),
    /// Duration column.
    Timedelta(Vec<Option<Duration>>),
}

impl DataArray {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            DataArray::Boolean(v) => v.len(),
            DataArray::Integer(v) => v.len(),
            DataArray::Numeric(v) => v.len(),
            DataArray::Text(v) => v.len(),
            DataArray::Datetime(v) => v.len(),
            DataArray::Timedelta(v) => v.len(),
        }
    }

    /// True when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical variant name, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            DataArray::Boolean(_) => "boolean",
            DataArray::Integer(_) => "integer",
            DataArray::Numeric(_) => "numeric",
            DataArray::Text(_) => "text",
            DataArray::Datetime(_) => "datetime",
            DataArray::Timedelta(_) => "timedelta",
        }
    }

    /// Borrow as a boolean column.
    pub fn as_boolean(&self) -> Option<&[Option<bool>]> {
        match self {
            DataArray::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as an integer column.
    pub fn as_integer(&self) -> Option<&[Option<i64>]> {
        match self {
            DataArray::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a float column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            DataArray::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a text column.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            DataArray::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a datetime column.
    pub fn as_datetime(&self) -> Option<&[Option<DateTime<Utc>>]> {
        match self {
            DataArray::Datetime(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a duration column.
    pub fn as_timedelta(&self) -> Option<&[Option<Duration>]> {
        match self {
            DataArray::Timedelta(v) => Some(v),
            _ => None,
        }
    }

    /// Scalar view of row `i`; missing values come back as [`Datum::Null`].
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds, like slice indexing.
    pub fn datum(&self, i: usize) -> Datum {
        match self {
            DataArray::Boolean(v) => v[i].map_or(Datum::Null, Datum::Bool),
            DataArray::Integer(v) => v[i].map_or(Datum::Null, Datum::Int),
            DataArray::Numeric(v) => v[i].map_or(Datum::Null, Datum::Float),
            DataArray::Text(v) => v[i].clone().map_or(Datum::Null, Datum::Text),
            DataArray::Datetime(v) => v[i].map_or(Datum::Null, Datum::Datetime),
            DataArray::Timedelta(v) => v[i].map_or(Datum::Null, Datum::Timedelta),
        }
    }
}
