//! Update sets: assignments applied to the rows an entity set matches.

use std::fmt;

use super::selection::{EntitySet, EntitySetBuilder};
use crate::entity::{AttributeDefinition, DefinitionProvider, Entity, PropertySelector, Value};
use crate::error::{Error, Result};

/// Assignments plus the relations and filters selecting the rows to update.
pub struct UpdateSet<E> {
    entity_set: EntitySet<E>,
    values: Vec<(AttributeDefinition, Value)>,
}

impl<E: Entity> UpdateSet<E> {
    pub fn new(provider: DefinitionProvider) -> Result<Self> {
        Ok(Self {
            entity_set: EntitySet::new(provider)?,
            values: Vec::new(),
        })
    }

    /// Assign `value` to the property behind `selector`. A later assignment
    /// to the same attribute replaces the earlier one.
    pub fn set(
        mut self,
        selector: &(impl PropertySelector<E> + ?Sized),
        value: impl Into<Value>,
    ) -> Result<Self> {
        let attribute = self.entity_set.resolve_attribute(selector)?;
        self.assign(attribute, value.into());
        Ok(self)
    }

    /// Assign each selected property the value read from `example`.
    pub fn set_from(mut self, example: &E, selectors: &[&dyn PropertySelector<E>]) -> Result<Self> {
        if selectors.is_empty() {
            return Err(Error::invalid_argument("set_from requires at least one selector"));
        }
        for selector in selectors {
            let attribute = self.entity_set.resolve_attribute(*selector)?;
            self.assign(attribute, selector.extract(example));
        }
        Ok(self)
    }

    fn assign(&mut self, attribute: AttributeDefinition, value: Value) {
        match self
            .values
            .iter_mut()
            .find(|(existing, _)| existing.property_name == attribute.property_name)
        {
            Some(slot) => slot.1 = value,
            None => self.values.push((attribute, value)),
        }
    }
}

impl<E> UpdateSet<E> {
    pub fn entity_set(&self) -> &EntitySet<E> {
        &self.entity_set
    }

    /// Assignments in declaration order.
    pub fn values(&self) -> &[(AttributeDefinition, Value)] {
        &self.values
    }
}

impl<E> Clone for UpdateSet<E> {
    fn clone(&self) -> Self {
        Self {
            entity_set: self.entity_set.clone(),
            values: self.values.clone(),
        }
    }
}

impl<E> fmt::Debug for UpdateSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateSet")
            .field("entity_set", &self.entity_set)
            .field("values", &self.values)
            .finish()
    }
}

impl<E: Entity> EntitySetBuilder<E> for UpdateSet<E> {
    fn entity_set(&self) -> &EntitySet<E> {
        &self.entity_set
    }

    fn entity_set_mut(&mut self) -> &mut EntitySet<E> {
        &mut self.entity_set
    }
}
