//! Join edges between two attribute locations.

use crate::entity::{
    AttributeDefinition, Entity, EntityDefinitionProvider, EntityLocation, EntityType,
    PropertySelector,
};
use crate::error::{Error, Result};

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRelationType {
    InnerJoin,
    LeftJoin,
}

/// A join edge: `relation` is joined onto the already-present `source`.
///
/// Equality is structural over all five fields, which is what lets a
/// selection ignore a relation it already holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRelation {
    pub relation_type: EntityRelationType,
    pub source_location: EntityLocation,
    pub source_attribute: AttributeDefinition,
    pub relation_location: EntityLocation,
    pub relation_attribute: AttributeDefinition,
}

impl EntityRelation {
    /// Build a relation from two selectors.
    ///
    /// An explicit alias wins over the alias declared on the selector.
    pub fn join<S: Entity, R: Entity>(
        provider: &dyn EntityDefinitionProvider,
        relation_type: EntityRelationType,
        source: &(impl PropertySelector<S> + ?Sized),
        relation: &(impl PropertySelector<R> + ?Sized),
        source_alias: Option<&str>,
        relation_alias: Option<&str>,
    ) -> Result<Self> {
        let (source_location, source_attribute) =
            resolve_side(provider, EntityType::of::<S>(), source, source_alias)?;
        let (relation_location, relation_attribute) =
            resolve_side(provider, EntityType::of::<R>(), relation, relation_alias)?;

        Ok(Self {
            relation_type,
            source_location,
            source_attribute,
            relation_location,
            relation_attribute,
        })
    }
}

fn resolve_side<X>(
    provider: &dyn EntityDefinitionProvider,
    entity: EntityType,
    selector: &(impl PropertySelector<X> + ?Sized),
    alias: Option<&str>,
) -> Result<(EntityLocation, AttributeDefinition)> {
    let invalid = |reason: String| Error::InvalidRelation {
        selector: selector.describe(),
        reason,
    };

    let alias = alias.or(selector.entity_alias());
    if alias.is_some_and(|a| a.trim().is_empty()) {
        return Err(Error::invalid_argument("join alias must not be blank"));
    }

    let definition = provider
        .resolve(entity)
        .map_err(|e| invalid(e.to_string()))?;
    let location = definition.location().aliased(alias);
    let attribute = definition
        .find_direct_attribute(alias, selector.property_name())
        .ok_or_else(|| {
            invalid(format!(
                "no attribute '{}' on {}.{}",
                selector.property_name(),
                location.container,
                location.name
            ))
        })?;

    Ok((location, attribute))
}
