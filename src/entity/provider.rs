//! EntityDefinitionProvider trait definition.
//!
//! The provider turns an entity type into its resolved [`EntityDefinition`].
//! Builders hold a shared provider and resolve every selector through it, so
//! unresolvable references fail at the call that introduced them.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use super::definition::{AttributeDefinition, EntityDefinition, EntityLocation};
use super::selector::Entity;
use crate::error::{Error, Result};

/// Runtime handle for an [`Entity`] type.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
    describe: fn() -> EntityDefinition,
}

impl EntityType {
    pub fn of<E: Entity>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
            describe: E::definition,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The definition as declared by the type, before validation.
    pub fn declared_definition(&self) -> EntityDefinition {
        (self.describe)()
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityType").field(&self.name).finish()
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

/// Resolves entity types to their definitions.
///
/// Implementations must be deterministic and free of side effects visible
/// to callers; caching is allowed.
pub trait EntityDefinitionProvider: Send + Sync + fmt::Debug {
    fn resolve(&self, entity: EntityType) -> Result<Arc<EntityDefinition>>;

    /// Table occurrence of `entity`, aliased when `alias` is given.
    fn entity_location(&self, entity: EntityType, alias: Option<&str>) -> Result<EntityLocation> {
        Ok(self.resolve(entity)?.location().aliased(alias))
    }

    /// Attribute of `entity` by property name, relocated onto `alias`.
    fn find_attribute(
        &self,
        entity: EntityType,
        alias: Option<&str>,
        property_name: &str,
    ) -> Result<Option<AttributeDefinition>> {
        Ok(self.resolve(entity)?.find_attribute(alias, property_name))
    }
}

/// Shared provider handle held by builders and the statement compiler.
pub type DefinitionProvider = Arc<dyn EntityDefinitionProvider>;

/// Provider reading each type's [`Entity::definition`] and caching it.
#[derive(Debug, Default)]
pub struct AnnotationDefinitionProvider {
    cache: DashMap<TypeId, Arc<EntityDefinition>>,
}

impl AnnotationDefinitionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new provider behind a shared handle.
    pub fn shared() -> DefinitionProvider {
        Arc::new(Self::new())
    }

    /// Number of cached definitions.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl EntityDefinitionProvider for AnnotationDefinitionProvider {
    fn resolve(&self, entity: EntityType) -> Result<Arc<EntityDefinition>> {
        if let Some(definition) = self.cache.get(&entity.id()) {
            return Ok(Arc::clone(definition.value()));
        }

        let definition = entity.declared_definition();
        if let Err(e) = validate(&definition, entity.name()) {
            tracing::warn!(entity = entity.name(), error = %e, "entisql.definition.rejected");
            return Err(e);
        }

        tracing::trace!(
            entity = entity.name(),
            attributes = definition.attributes().len(),
            "entisql.definition.resolved"
        );
        let definition = Arc::new(definition);
        self.cache.insert(entity.id(), Arc::clone(&definition));
        Ok(definition)
    }
}

fn validate(definition: &EntityDefinition, entity: &str) -> Result<()> {
    let invalid = |reason: String| Error::InvalidDefinition {
        entity: entity.to_string(),
        reason,
    };

    let location = definition.location();
    if location.container.trim().is_empty() || location.name.trim().is_empty() {
        return Err(invalid("container and table name must not be blank".into()));
    }
    if definition.attributes().is_empty() {
        return Err(invalid("no attributes declared".into()));
    }

    let mut seen = HashSet::new();
    for attribute in definition.attributes() {
        if attribute.property_name.trim().is_empty() || attribute.physical_name.trim().is_empty() {
            return Err(invalid(format!(
                "attribute {} has a blank name",
                attribute.ordinal
            )));
        }
        if !seen.insert(attribute.property_name.as_str()) {
            return Err(invalid(format!(
                "property '{}' declared twice",
                attribute.property_name
            )));
        }
    }

    Ok(())
}
