//! Entity schemas
//!
//! An entity is a table of rows; this layer only sees its identity and the
//! semantic kind of each column. Column order is preserved so display output
//! and serialization are stable.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use canopy_types::{EntityId, VariableId, VariableKind};

/// Shared handle to an entity schema.
///
/// Feature trees are DAGs; nodes share their entity through `Arc`.
pub type EntityRef = Arc<Entity>;

/// Identity and column kinds of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    variables: IndexMap<VariableId, VariableKind>,
}

impl Entity {
    /// Creates an empty schema.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            variables: IndexMap::new(),
        }
    }

    /// Adds a column with its semantic kind.
    pub fn with_variable(mut self, name: impl Into<VariableId>, kind: VariableKind) -> Self {
        self.variables.insert(name.into(), kind);
        self
    }

    /// Wrap in a shared handle.
    pub fn into_ref(self) -> EntityRef {
        Arc::new(self)
    }

    /// Entity identity.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Kind of a column, if the column exists.
    pub fn kind_of(&self, variable: &VariableId) -> Option<VariableKind> {
        self.variables.get(variable).copied()
    }

    /// Columns in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = (&VariableId, VariableKind)> {
        self.variables.iter().map(|(id, kind)| (id, *kind))
    }
}
