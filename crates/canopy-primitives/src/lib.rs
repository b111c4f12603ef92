//! Canopy Primitives
//!
//! The typed catalog of feature-transformation primitives. Each primitive
//! declares a type contract (accepted input variable kinds, produced output
//! kind), a deterministic naming rule used for deduplication, and a
//! deferred vectorized computation bound as a plain value rather than
//! executed immediately.
//!
//! # Architecture
//!
//! The catalog uses [`linkme::distributed_slice`] for compile-time
//! registration:
//!
//! 1. Each catalog module registers one [`PrimitiveDescriptor`] static per
//!    transformation
//! 2. At link time, all registrations are collected into [`PRIMITIVES`]
//! 3. At runtime, the registry provides lookup by name for validation and
//!    catalog enumeration
//!
//! Constructing a primitive validates eagerly: arguments are coerced to
//! feature nodes, all base features must share one entity, and every base
//! must satisfy the declared contract at its position by subtype. A
//! constructed [`TransformFeature`] is immutable and type-safe to evaluate;
//! its [`Computation`] is pure and safe to invoke concurrently across
//! instances.
//!
//! # Example
//!
//! ```
//! use canopy_feature::{ColumnFeature, Entity, Feature};
//! use canopy_types::{DataArray, VariableKind};
//!
//! let entity = Entity::new("transactions")
//!     .with_variable("amount", VariableKind::Numeric)
//!     .into_ref();
//! let amount = ColumnFeature::new(&entity, "amount").unwrap().into_ref();
//!
//! let feature = canopy_primitives::absolute(&amount).unwrap();
//! assert_eq!(feature.name(), "ABSOLUTE(amount)");
//!
//! let out = feature
//!     .function()
//!     .apply(&[DataArray::Numeric(vec![Some(-3.0), None])], None)
//!     .unwrap();
//! assert_eq!(out, DataArray::Numeric(vec![Some(3.0), None]));
//! ```

pub mod basic;
pub mod calendar;
pub mod compute;
pub mod descriptor;
pub mod duration;
pub mod grouped;
pub mod since;
pub mod transform;

pub use compute::{Computation, EvalError};
pub use descriptor::{all_names, get, is_known, PrimitiveDescriptor, PRIMITIVES};
pub use transform::TransformFeature;

pub use basic::{absolute, is_in, is_null, not, percentile};
pub use calendar::{
    calendar, day, hour, is_weekend, minute, month, second, week, weekday, year, CalendarUnit,
};
pub use duration::{
    days, duration, hours, minutes, months, seconds, weeks, years, DurationUnit,
};
pub use grouped::{diff, time_since_previous};
pub use since::{days_since, time_since};
