//! Feature nodes
//!
//! A feature is a node in a directed computation tree over an entity's
//! columns. This module defines the [`Feature`] trait both node shapes
//! implement, the raw-column leaf node, and the coercion that turns bare
//! column names into leaf nodes during primitive construction.
//!
//! Feature trees are DAGs, not strict trees: a node may be referenced by
//! several downstream primitives, so nodes are shared through `Arc`.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use canopy_types::{Datum, VariableId, VariableKind};

use crate::entity::EntityRef;
use crate::error::DefinitionError;

/// Shared handle to any feature node.
pub type FeatureRef = Arc<dyn Feature>;

/// A node wrapping either a raw column or a primitive application.
///
/// The trait is the seam between this layer and the primitive catalog:
/// everything a downstream primitive needs from its base features is here.
pub trait Feature: Send + Sync {
    /// Owning entity.
    fn entity(&self) -> &EntityRef;

    /// Semantic kind of the values this feature produces.
    fn variable_type(&self) -> VariableKind;

    /// Scalar used for missing/undefined results.
    fn default_value(&self) -> Datum;

    /// True when the value depends on an expanding window of history
    /// rather than being fixed at a point in time.
    fn expanding(&self) -> bool;

    /// Stable display name. Two structurally identical nodes render the
    /// same name; the synthesis engine deduplicates on it.
    fn name(&self) -> &str;
}

impl fmt::Debug for dyn Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name())
            .field("variable_type", &self.variable_type())
            .field("expanding", &self.expanding())
            .finish()
    }
}

/// Leaf node: a raw column of an entity.
#[derive(Debug, Clone)]
pub struct ColumnFeature {
    entity: EntityRef,
    variable: VariableId,
    kind: VariableKind,
    default: Datum,
    expanding: bool,
}

impl ColumnFeature {
    /// Wraps a column of `entity`, resolving its kind from the schema.
    pub fn new(
        entity: &EntityRef,
        column: impl Into<VariableId>,
    ) -> Result<Self, DefinitionError> {
        let variable = column.into();
        let kind = entity.kind_of(&variable).ok_or_else(|| {
            DefinitionError::ArgumentCoercion {
                primitive: "column",
                position: 0,
                reason: format!("entity `{}` has no variable `{}`", entity.id(), variable),
            }
        })?;
        Ok(Self {
            entity: Arc::clone(entity),
            variable,
            kind,
            default: Datum::Null,
            expanding: false,
        })
    }

    /// Sets the scalar substituted for missing/undefined results.
    pub fn with_default(mut self, default: Datum) -> Self {
        self.default = default;
        self
    }

    /// Marks the column as expanding (e.g. materialized from an expanding
    /// aggregation upstream of this layer).
    pub fn with_expanding(mut self, expanding: bool) -> Self {
        self.expanding = expanding;
        self
    }

    /// Wrap in a shared handle.
    pub fn into_ref(self) -> FeatureRef {
        Arc::new(self)
    }
}

impl Feature for ColumnFeature {
    fn entity(&self) -> &EntityRef {
        &self.entity
    }

    fn variable_type(&self) -> VariableKind {
        self.kind
    }

    fn default_value(&self) -> Datum {
        self.default.clone()
    }

    fn expanding(&self) -> bool {
        self.expanding
    }

    fn name(&self) -> &str {
        self.variable.as_str()
    }
}

/// One positional constructor argument: an existing feature, or a raw
/// column name to be resolved during coercion.
pub enum FeatureArg {
    /// Already a feature node.
    Feature(FeatureRef),
    /// Bare column name, resolved against the inferred entity.
    Column(String),
}

impl From<FeatureRef> for FeatureArg {
    fn from(f: FeatureRef) -> Self {
        FeatureArg::Feature(f)
    }
}

impl From<&FeatureRef> for FeatureArg {
    fn from(f: &FeatureRef) -> Self {
        FeatureArg::Feature(Arc::clone(f))
    }
}

impl From<ColumnFeature> for FeatureArg {
    fn from(f: ColumnFeature) -> Self {
        FeatureArg::Feature(Arc::new(f))
    }
}

impl From<&str> for FeatureArg {
    fn from(name: &str) -> Self {
        FeatureArg::Column(name.to_owned())
    }
}

impl From<String> for FeatureArg {
    fn from(name: String) -> Self {
        FeatureArg::Column(name)
    }
}

/// Coerces positional constructor arguments into feature nodes.
///
/// The owning entity is inferred from the first argument that already is a
/// feature; bare column names are then resolved against its schema. Fails
/// with [`DefinitionError::ArgumentCoercion`] when a name cannot be
/// resolved or when every argument is a bare name (no entity to infer).
///
/// Entity *consistency* across the coerced features is checked by the
/// caller, not here.
pub fn coerce(
    primitive: &'static str,
    args: Vec<FeatureArg>,
) -> Result<Vec<FeatureRef>, DefinitionError> {
    let entity = args.iter().find_map(|arg| match arg {
        FeatureArg::Feature(f) => Some(Arc::clone(f.entity())),
        FeatureArg::Column(_) => None,
    });

    args.into_iter()
        .enumerate()
        .map(|(position, arg)| match arg {
            FeatureArg::Feature(f) => Ok(f),
            FeatureArg::Column(name) => {
                let entity = entity.as_ref().ok_or_else(|| {
                    DefinitionError::ArgumentCoercion {
                        primitive,
                        position,
                        reason: format!(
                            "`{name}` is a bare column name and no feature argument \
                             is present to infer the owning entity from"
                        ),
                    }
                })?;
                trace!(primitive, column = %name, entity = %entity.id(), "wrapping raw column");
                let feature =
                    ColumnFeature::new(entity, name.as_str()).map_err(|err| match err {
                        DefinitionError::ArgumentCoercion { reason, .. } => {
                            DefinitionError::ArgumentCoercion {
                                primitive,
                                position,
                                reason,
                            }
                        }
                        other => other,
                    })?;
                Ok(feature.into_ref())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    fn log_entity() -> EntityRef {
        Entity::new("log")
            .with_variable("value", VariableKind::Numeric)
            .with_variable("session_id", VariableKind::Id)
            .into_ref()
    }

    #[test]
    fn test_column_feature_resolves_kind() {
        let entity = log_entity();
        let f = ColumnFeature::new(&entity, "value").unwrap();
        assert_eq!(f.variable_type(), VariableKind::Numeric);
        assert_eq!(f.name(), "value");
        assert!(!f.expanding());
        assert!(f.default_value().is_null());
    }

    #[test]
    fn test_unknown_column_fails() {
        let entity = log_entity();
        let err = ColumnFeature::new(&entity, "nope").unwrap_err();
        assert!(matches!(err, DefinitionError::ArgumentCoercion { .. }));
    }

    #[test]
    fn test_coerce_resolves_bare_names_against_sibling_entity() {
        let entity = log_entity();
        let value = ColumnFeature::new(&entity, "value").unwrap().into_ref();
        let coerced = coerce("diff", vec![FeatureArg::from(&value), FeatureArg::from("session_id")])
            .unwrap();
        assert_eq!(coerced.len(), 2);
        assert_eq!(coerced[1].name(), "session_id");
        assert_eq!(coerced[1].variable_type(), VariableKind::Id);
    }

    #[test]
    fn test_coerce_without_entity_fails() {
        let err = coerce("is_null", vec![FeatureArg::from("value")]).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::ArgumentCoercion { primitive: "is_null", position: 0, .. }
        ));
    }

    #[test]
    fn test_default_value_override() {
        let entity = log_entity();
        let f = ColumnFeature::new(&entity, "value")
            .unwrap()
            .with_default(Datum::Float(0.0));
        assert_eq!(f.default_value(), Datum::Float(0.0));
    }
}
