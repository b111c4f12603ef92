//! Transform feature nodes
//!
//! [`TransformFeature`] is one application of a catalog transformation to
//! one or more base features of a single entity. Constructed once at
//! feature-tree definition time, immutable afterwards; the bound
//! computation runs later, against arrays resolved by an external runtime.
//!
//! Validation is eager: argument coercion, the single-entity invariant, and
//! the positional type-contract match all happen here, so a value of this
//! type is guaranteed type-safe to evaluate.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use canopy_feature::{coerce, DefinitionError, EntityRef, Feature, FeatureArg, FeatureRef};
use canopy_types::{Datum, VariableKind};

use crate::compute::Computation;
use crate::descriptor::PrimitiveDescriptor;

/// One primitive application, composable as a base of further primitives.
pub struct TransformFeature {
    descriptor: &'static PrimitiveDescriptor,
    entity: EntityRef,
    base_features: Vec<FeatureRef>,
    computation: Computation,
    expanding: bool,
    name: String,
}

impl TransformFeature {
    /// Builds with the default display name: `NAME(base, ...)`.
    pub(crate) fn build(
        descriptor: &'static PrimitiveDescriptor,
        args: Vec<FeatureArg>,
        computation: Computation,
    ) -> Result<Self, DefinitionError> {
        Self::build_named(descriptor, args, computation, |bases| {
            render_call(descriptor.name, bases)
        })
    }

    /// Builds with a custom display-name renderer, applied after coercion.
    ///
    /// Renderers must stay deterministic over the base features and bound
    /// parameters; the rendered name is the deduplication identity.
    pub(crate) fn build_named(
        descriptor: &'static PrimitiveDescriptor,
        args: Vec<FeatureArg>,
        computation: Computation,
        namer: impl FnOnce(&[FeatureRef]) -> String,
    ) -> Result<Self, DefinitionError> {
        if args.is_empty() {
            return Err(DefinitionError::ArgumentCoercion {
                primitive: descriptor.name,
                position: 0,
                reason: "at least one base feature is required".to_owned(),
            });
        }
        let base_features = coerce(descriptor.name, args)?;

        let entity = Arc::clone(base_features[0].entity());
        for feature in &base_features[1..] {
            if feature.entity().id() != entity.id() {
                return Err(DefinitionError::EntityMismatch {
                    expected: entity.id().clone(),
                    found: feature.entity().id().clone(),
                });
            }
        }

        check_contract(descriptor, &base_features)?;

        let expanding = base_features.iter().any(|f| f.expanding());
        let name = namer(&base_features);
        trace!(primitive = descriptor.name, feature = %name, "defined transform feature");

        Ok(Self {
            descriptor,
            entity,
            base_features,
            computation,
            expanding,
            name,
        })
    }

    /// The transformation's type contract.
    pub fn descriptor(&self) -> &'static PrimitiveDescriptor {
        self.descriptor
    }

    /// Base features, ordered and position-significant.
    pub fn base_features(&self) -> &[FeatureRef] {
        &self.base_features
    }

    /// The bound computation, applied later to resolved arrays.
    pub fn function(&self) -> &Computation {
        &self.computation
    }

    /// Wrap in a shared handle for use as a base of further primitives.
    pub fn into_ref(self) -> FeatureRef {
        Arc::new(self)
    }
}

impl Feature for TransformFeature {
    fn entity(&self) -> &EntityRef {
        &self.entity
    }

    fn variable_type(&self) -> VariableKind {
        self.descriptor.return_type
    }

    fn default_value(&self) -> Datum {
        // Propagated from the first base feature, never independently set.
        self.base_features[0].default_value()
    }

    fn expanding(&self) -> bool {
        self.expanding
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TransformFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformFeature")
            .field("primitive", &self.descriptor.name)
            .field("name", &self.name)
            .field("entity", &self.entity.id())
            .field("expanding", &self.expanding)
            .finish()
    }
}

/// Default display name: uppercased transformation name with comma-joined
/// base names in parentheses, e.g. `IS_NULL(amount)`.
fn render_call(name: &str, bases: &[FeatureRef]) -> String {
    let args: Vec<&str> = bases.iter().map(|f| f.name()).collect();
    format!("{}({})", name.to_uppercase(), args.join(", "))
}

fn check_contract(
    descriptor: &'static PrimitiveDescriptor,
    features: &[FeatureRef],
) -> Result<(), DefinitionError> {
    let kinds: Vec<VariableKind> = features.iter().map(|f| f.variable_type()).collect();
    if descriptor.accepts(&kinds) {
        return Ok(());
    }

    // Diagnose against the alternative that matches furthest: report the
    // first position where the closest same-arity contract fails.
    let position = descriptor
        .input_types
        .iter()
        .filter(|contract| contract.len() == kinds.len())
        .map(|contract| {
            kinds
                .iter()
                .zip(contract.iter())
                .position(|(kind, expected)| !kind.satisfies(*expected))
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);

    Err(DefinitionError::TypeContractViolation {
        primitive: descriptor.name,
        position,
        feature: features[position].name().to_owned(),
        actual: kinds[position],
    })
}
