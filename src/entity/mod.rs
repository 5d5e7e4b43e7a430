//! Entity metadata.
//!
//! This module maps entity types to tables and columns:
//!
//! - [`Entity`] - implemented by mapped types, returns the type's definition
//! - [`Field`] - typed property selector, the unit every builder call takes
//! - [`EntityDefinition`] / [`AttributeDefinition`] - resolved table and column mapping
//! - [`EntityDefinitionProvider`] - resolves and caches definitions
//! - [`Value`] - literal values bound to positional parameters

mod definition;
mod provider;
mod selector;
mod value;

pub use definition::{
    distinct_by, same_attribute, AttributeDefinition, EntityDefinition, EntityDefinitionBuilder,
    EntityLocation,
};
pub use provider::{
    AnnotationDefinitionProvider, DefinitionProvider, EntityDefinitionProvider, EntityType,
};
pub use selector::{Entity, Field, PropertySelector};
pub use value::Value;
