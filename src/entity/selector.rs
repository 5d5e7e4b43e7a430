//! Typed property selectors.
//!
//! A [`Field`] names one property of an entity and knows how to read it from
//! an instance. Fields are declared once per entity, usually as associated
//! constants, and replace runtime inspection of property accessors.
//!
//! ```ignore
//! impl Order {
//!     pub const ID: Field<Order, i64> = Field::new("Id", |o: &Order| o.id);
//!     pub const CUSTOMER_ID: Field<Order, i64> =
//!         Field::new("CustomerId", |o: &Order| o.customer_id);
//! }
//! ```

use std::fmt;

use super::definition::EntityDefinition;
use super::value::Value;

/// A mapped entity type.
///
/// The definition plays the role of the type's mapping annotations and must
/// be deterministic: providers call it once and cache the result.
pub trait Entity: 'static {
    fn definition() -> EntityDefinition;
}

/// Object-safe view of a property selector for entity `E`.
pub trait PropertySelector<E: ?Sized> {
    fn property_name(&self) -> &'static str;

    /// Alias declared for the entity occurrence this selector reads through.
    fn entity_alias(&self) -> Option<&'static str>;

    /// Read the property value from an instance.
    fn extract(&self, item: &E) -> Value;

    /// Human-readable form used in diagnostics.
    fn describe(&self) -> String {
        let type_name = std::any::type_name::<E>();
        let short = type_name.rsplit("::").next().unwrap_or(type_name);
        match self.entity_alias() {
            Some(alias) => format!("{}({}).{}", short, alias, self.property_name()),
            None => format!("{}.{}", short, self.property_name()),
        }
    }
}

/// A typed property token: name, optional entity alias and accessor.
pub struct Field<E, V> {
    name: &'static str,
    alias: Option<&'static str>,
    accessor: fn(&E) -> V,
}

impl<E, V> Field<E, V> {
    pub const fn new(name: &'static str, accessor: fn(&E) -> V) -> Self {
        Self {
            name,
            alias: None,
            accessor,
        }
    }

    /// Read through an aliased occurrence of the entity.
    pub const fn with_alias(self, alias: &'static str) -> Self {
        Self {
            name: self.name,
            alias: Some(alias),
            accessor: self.accessor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    pub fn get(&self, item: &E) -> V {
        (self.accessor)(item)
    }
}

impl<E, V> Clone for Field<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for Field<E, V> {}

impl<E, V> fmt::Debug for Field<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .finish()
    }
}

impl<E, V: Into<Value>> PropertySelector<E> for Field<E, V> {
    fn property_name(&self) -> &'static str {
        self.name
    }

    fn entity_alias(&self) -> Option<&'static str> {
        self.alias
    }

    fn extract(&self, item: &E) -> Value {
        self.get(item).into()
    }
}
