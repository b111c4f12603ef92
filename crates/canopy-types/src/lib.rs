//! Canopy Types
//!
//! Core data types shared across the Canopy crates: the variable-kind
//! taxonomy, scalar values, columnar arrays, and typed identifiers.
//!
//! # Architecture
//!
//! - [`VariableKind`] — a closed taxonomy of semantic column kinds with an
//!   explicit subtype table, checked by [`VariableKind::satisfies`]
//! - [`Datum`] — a tagged scalar value, including `Null` for missingness
//! - [`DataArray`] — a typed column with per-element missingness, the unit
//!   of vectorized computation
//! - [`EntityId`] / [`VariableId`] — typed string wrappers identifying
//!   tables and columns
//!
//! This crate defines pure data structures only. Validation and computation
//! live in `canopy-feature` and `canopy-primitives`.

pub mod array;
pub mod datum;
pub mod ids;
pub mod kind;

pub use array::DataArray;
pub use datum::Datum;
pub use ids::{EntityId, VariableId};
pub use kind::VariableKind;
