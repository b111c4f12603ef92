//! Scalar values
//!
//! [`Datum`] is the tagged scalar used for default values, membership lists,
//! and element-wise views into a [`crate::DataArray`]. Missingness is a
//! first-class variant (`Null`) rather than an `Option` wrapper so that a
//! default value and a missing value share one representation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// A single dynamically-typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// Missing/undefined.
    Null,
    /// True/false.
    Bool(bool),
    /// 64-bit signed integer (ids, ordinals, integer columns).
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Point in time (UTC).
    Datetime(DateTime<Utc>),
    /// Duration between points in time.
    Timedelta(Duration),
}

impl Datum {
    /// True for the `Null` variant.
    pub const fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Numeric view: `Int` widens to `f64`, `Float` passes through.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Int(v) => Some(*v as f64),
            Datum::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to extract a boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to extract a text reference.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Datum::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Membership equality, as used by list-membership primitives.
    ///
    /// `Null` matches nothing (not even `Null`), and integer/float values
    /// compare numerically, so `Int(1)` matches `Float(1.0)`.
    pub fn matches(&self, other: &Datum) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        if let (Datum::Int(a), Datum::Int(b)) = (self, other) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a == b;
        }
        self == other
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => f.write_str("null"),
            Datum::Bool(v) => write!(f, "{v}"),
            Datum::Int(v) => write!(f, "{v}"),
            Datum::Float(v) => write!(f, "{v}"),
            Datum::Text(s) => write!(f, "\"{s}\""),
            Datum::Datetime(t) => write!(f, "{}", t.to_rfc3339()),
            Datum::Timedelta(d) => write!(f, "{}s", d.num_seconds()),
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_owned())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Text(v)
    }
}

impl From<DateTime<Utc>> for Datum {
    fn from(v: DateTime<Utc>) -> Self {
        Datum::Datetime(v)
    }
}

impl From<Duration> for Datum {
    fn from(v: Duration) -> Self {
        Datum::Timedelta(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_matches_nothing() {
        assert!(!Datum::Null.matches(&Datum::Null));
        assert!(!Datum::Null.matches(&Datum::Int(0)));
        assert!(!Datum::Int(0).matches(&Datum::Null));
    }

    #[test]
    fn test_numeric_cross_type_match() {
        assert!(Datum::Int(1).matches(&Datum::Float(1.0)));
        assert!(Datum::Float(2.5).matches(&Datum::Float(2.5)));
        assert!(!Datum::Int(1).matches(&Datum::Float(1.5)));
    }

    #[test]
    fn test_text_match_is_exact() {
        assert!(Datum::from("a").matches(&Datum::from("a")));
        assert!(!Datum::from("a").matches(&Datum::from("A")));
    }

    #[test]
    fn test_display() {
        assert_eq!(Datum::Int(3).to_string(), "3");
        assert_eq!(Datum::from("x").to_string(), "\"x\"");
        assert_eq!(Datum::Null.to_string(), "null");
    }
}
