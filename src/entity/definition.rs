//! Entity definitions: tables, their columns and the roles those columns play.

/// A table occurrence of an entity within one statement.
///
/// When an alias is set it supersedes `container.name` in every rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityLocation {
    pub container: String,
    pub name: String,
    pub alias: Option<String>,
}

impl EntityLocation {
    pub fn new(container: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Copy of this location with `alias` applied when one is given.
    pub fn aliased(&self, alias: Option<&str>) -> Self {
        match alias {
            Some(alias) => self.clone().with_alias(alias),
            None => self.clone(),
        }
    }

    /// The alias, or the table name when unaliased.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One mapped column of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDefinition {
    /// Table occurrence that owns the column.
    pub entity: EntityLocation,
    pub property_name: String,
    pub physical_name: String,
    /// Output alias, set when the property name differs from the column name.
    pub alias: Option<String>,
    pub ordinal: usize,
    pub is_primary_key: bool,
    /// Database-generated identity (auto-number) column.
    pub is_identity: bool,
    /// Read-only column computed by the database.
    pub is_computed: bool,
    /// Column read from a related entity rather than the entity's own table.
    pub is_related: bool,
}

impl AttributeDefinition {
    pub fn is_insertable(&self) -> bool {
        !self.is_identity && !self.is_computed && !self.is_related
    }

    pub fn is_updateable(&self) -> bool {
        !self.is_primary_key && self.is_insertable()
    }

    /// The alias, or the physical column name when unaliased.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.physical_name)
    }
}

/// Attribute identity: same table occurrence and same property.
pub fn same_attribute(a: &AttributeDefinition, b: &AttributeDefinition) -> bool {
    a.entity == b.entity && a.property_name == b.property_name
}

/// Removes later duplicates under `eq`, keeping first-seen order.
pub fn distinct_by<T: Clone>(items: &[T], eq: fn(&T, &T) -> bool) -> Vec<T> {
    let mut distinct: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !distinct.iter().any(|seen| eq(seen, item)) {
            distinct.push(item.clone());
        }
    }
    distinct
}

/// The resolved mapping of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    location: EntityLocation,
    attributes: Vec<AttributeDefinition>,
}

impl EntityDefinition {
    pub fn builder(container: impl Into<String>, name: impl Into<String>) -> EntityDefinitionBuilder {
        EntityDefinitionBuilder {
            location: EntityLocation::new(container, name),
            attributes: Vec::new(),
        }
    }

    pub fn location(&self) -> &EntityLocation {
        &self.location
    }

    /// Every attribute in ordinal order.
    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    /// Attributes stored on the entity's own table.
    pub fn direct_attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter().filter(|a| !a.is_related)
    }

    /// Attributes a selection returns by default.
    pub fn returnable_attributes(&self) -> Vec<AttributeDefinition> {
        self.attributes.clone()
    }

    pub fn insertable_attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter().filter(|a| a.is_insertable())
    }

    pub fn updateable_attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter().filter(|a| a.is_updateable())
    }

    pub fn primary_key_attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter().filter(|a| a.is_primary_key)
    }

    pub fn identity_attribute(&self) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.is_identity)
    }

    /// Find an attribute by property name.
    ///
    /// With an `entity_alias`, a direct attribute is returned relocated onto
    /// the aliased table occurrence; a related attribute only matches when the
    /// alias names its own location.
    pub fn find_attribute(
        &self,
        entity_alias: Option<&str>,
        property_name: &str,
    ) -> Option<AttributeDefinition> {
        let attribute = self
            .attributes
            .iter()
            .find(|a| a.property_name == property_name)?;

        if attribute.is_related {
            return match entity_alias {
                Some(alias) if alias != attribute.entity.reference_name() => None,
                _ => Some(attribute.clone()),
            };
        }

        Some(Self::relocate(attribute, entity_alias))
    }

    /// Find an attribute stored on the entity's own table.
    pub fn find_direct_attribute(
        &self,
        entity_alias: Option<&str>,
        property_name: &str,
    ) -> Option<AttributeDefinition> {
        self.direct_attributes()
            .find(|a| a.property_name == property_name)
            .map(|a| Self::relocate(a, entity_alias))
    }

    fn relocate(attribute: &AttributeDefinition, entity_alias: Option<&str>) -> AttributeDefinition {
        let mut attribute = attribute.clone();
        attribute.entity = attribute.entity.aliased(entity_alias);
        attribute
    }
}

/// Declares the attributes of an entity in ordinal order.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until built"]
pub struct EntityDefinitionBuilder {
    location: EntityLocation,
    attributes: Vec<AttributeDefinition>,
}

#[derive(Clone, Copy, Default)]
struct Roles {
    primary_key: bool,
    identity: bool,
    computed: bool,
}

impl EntityDefinitionBuilder {
    /// Primary key column whose value the caller supplies.
    pub fn key(self, property: &str) -> Self {
        let roles = Roles {
            primary_key: true,
            ..Roles::default()
        };
        self.direct(property, property, roles)
    }

    /// Primary key generated by the database.
    pub fn identity_key(self, property: &str) -> Self {
        let roles = Roles {
            primary_key: true,
            identity: true,
            ..Roles::default()
        };
        self.direct(property, property, roles)
    }

    /// Column stored under the property's own name.
    pub fn column(self, property: &str) -> Self {
        self.direct(property, property, Roles::default())
    }

    /// Column stored under a different physical name.
    pub fn mapped(self, property: &str, physical_name: &str) -> Self {
        self.direct(property, physical_name, Roles::default())
    }

    /// Read-only column computed by the database.
    pub fn computed(self, property: &str) -> Self {
        let roles = Roles {
            computed: true,
            ..Roles::default()
        };
        self.direct(property, property, roles)
    }

    /// Column read from a related table occurrence.
    pub fn related(mut self, property: &str, location: EntityLocation, physical_name: &str) -> Self {
        let ordinal = self.attributes.len();
        self.attributes.push(AttributeDefinition {
            entity: location,
            property_name: property.into(),
            physical_name: physical_name.into(),
            alias: output_alias(property, physical_name),
            ordinal,
            is_primary_key: false,
            is_identity: false,
            is_computed: false,
            is_related: true,
        });
        self
    }

    pub fn build(self) -> EntityDefinition {
        EntityDefinition {
            location: self.location,
            attributes: self.attributes,
        }
    }

    fn direct(mut self, property: &str, physical_name: &str, roles: Roles) -> Self {
        let ordinal = self.attributes.len();
        self.attributes.push(AttributeDefinition {
            entity: self.location.clone(),
            property_name: property.into(),
            physical_name: physical_name.into(),
            alias: output_alias(property, physical_name),
            ordinal,
            is_primary_key: roles.primary_key,
            is_identity: roles.identity,
            is_computed: roles.computed,
            is_related: false,
        });
        self
    }
}

fn output_alias(property: &str, physical_name: &str) -> Option<String> {
    (property != physical_name).then(|| property.to_string())
}
