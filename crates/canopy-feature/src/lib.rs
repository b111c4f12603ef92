//! Canopy Feature
//!
//! Feature nodes and the contracts they satisfy. A feature is either a raw
//! column of an entity or the application of a primitive to other features;
//! this crate provides the leaf (raw-column) node, the [`Feature`] trait
//! both node shapes implement, argument coercion from raw column names, and
//! the definition-time error taxonomy.
//!
//! # Design
//!
//! - [`Entity`] — the minimal schema interface to the external storage
//!   layer: an id plus an ordered column → kind map. How columns are loaded
//!   is out of scope.
//! - [`Feature`] — the seam the primitive layer composes over: owning
//!   entity, variable kind, default value, expanding flag, and a stable
//!   display name used for deduplication.
//! - [`FeatureArg`] / [`coerce`] — constructor arguments may be features or
//!   raw column names; names are resolved against the entity inferred from
//!   their feature siblings.
//! - [`DefinitionError`] — every contract violation is raised eagerly at
//!   construction. A successfully constructed node is type-safe to evaluate.

pub mod entity;
pub mod error;
pub mod feature;

pub use entity::{Entity, EntityRef};
pub use error::DefinitionError;
pub use feature::{coerce, ColumnFeature, Feature, FeatureArg, FeatureRef};
