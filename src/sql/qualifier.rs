//! Name qualification: escaped table and column references.
//!
//! Two paths exist on purpose. [`NameQualifier::qualify`] follows aliases, so
//! a table joined twice under different aliases yields distinct column
//! references. [`NameQualifier::reference_name`] always names the physical
//! table, for references that bypass any join alias.

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};
use crate::entity::{AttributeDefinition, EntityLocation};
use crate::error::{Error, Result};

/// Escapes and qualifies identifiers for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameQualifier {
    dialect: Dialect,
}

impl NameQualifier {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Quote one identifier.
    pub fn escape(&self, identifier: &str) -> Result<String> {
        Ok(self.dialect.quote_identifier(checked(identifier)?))
    }

    /// Unqualified identifier token, e.g. a column in a SET list or an
    /// output alias.
    pub fn identifier(&self, name: &str) -> Result<Token> {
        Ok(Token::Ident(checked(name)?.to_string()))
    }

    /// Location as seen inside a scope that aliases every table with
    /// `suffix` appended to its reference name.
    pub fn scoped(location: &EntityLocation, suffix: Option<&str>) -> EntityLocation {
        match suffix {
            Some(suffix) => {
                let alias = format!("{}{}", location.reference_name(), suffix);
                location.clone().with_alias(alias)
            }
            None => location.clone(),
        }
    }

    /// Physical table: `container.name`.
    pub fn table(&self, location: &EntityLocation) -> Result<Token> {
        Ok(Token::QualifiedIdent {
            schema: Some(checked(&location.container)?.to_string()),
            name: checked(&location.name)?.to_string(),
        })
    }

    /// Table reference for FROM and JOIN: `container.name [AS alias]`.
    pub fn table_source(&self, location: &EntityLocation) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(self.table(location)?);
        if let Some(alias) = &location.alias {
            ts.space().push(Token::As).space().push(self.identifier(alias)?);
        }
        Ok(ts)
    }

    /// Canonical name of a table occurrence: the alias when set, else
    /// `container.name`.
    pub fn entity_path(&self, location: &EntityLocation) -> Result<Vec<String>> {
        match &location.alias {
            Some(alias) => Ok(vec![checked(alias)?.to_string()]),
            None => Ok(vec![
                checked(&location.container)?.to_string(),
                checked(&location.name)?.to_string(),
            ]),
        }
    }

    /// Column reference through the attribute's own table occurrence, or
    /// through the named table expression `location`.
    ///
    /// Through a table expression the column is known by its output name
    /// (alias when set, else physical name).
    pub fn qualify(&self, attribute: &AttributeDefinition, location: Option<&str>) -> Result<Token> {
        match location {
            Some(location) => Ok(Token::Path(vec![
                checked(location)?.to_string(),
                checked(attribute.reference_name())?.to_string(),
            ])),
            None => self.column(&attribute.entity, attribute),
        }
    }

    /// Column reference through `location`, which may differ from the
    /// attribute's own location when a scope suffix applies.
    pub fn column(&self, location: &EntityLocation, attribute: &AttributeDefinition) -> Result<Token> {
        let mut path = self.entity_path(location)?;
        path.push(checked(&attribute.physical_name)?.to_string());
        Ok(Token::Path(path))
    }

    /// Column reference through the physical table, ignoring any alias.
    pub fn reference_name(&self, attribute: &AttributeDefinition) -> Result<Token> {
        Ok(Token::Path(vec![
            checked(&attribute.entity.container)?.to_string(),
            checked(&attribute.entity.name)?.to_string(),
            checked(&attribute.physical_name)?.to_string(),
        ]))
    }

    /// Select list item: the column, followed by `AS alias` when the
    /// attribute is exposed under a different name.
    pub fn select_item(
        &self,
        attribute: &AttributeDefinition,
        suffix: Option<&str>,
    ) -> Result<TokenStream> {
        let location = Self::scoped(&attribute.entity, suffix);
        let mut ts = TokenStream::new();
        ts.push(self.column(&location, attribute)?);
        if let Some(alias) = &attribute.alias {
            ts.space().push(Token::As).space().push(self.identifier(alias)?);
        }
        Ok(ts)
    }
}

fn checked(identifier: &str) -> Result<&str> {
    if identifier.trim().is_empty() {
        return Err(Error::InvalidIdentifier);
    }
    Ok(identifier)
}
