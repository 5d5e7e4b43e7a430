//! DML (Data Manipulation Language) statements.
//!
//! INSERT, UPDATE and DELETE compiled by [`RepositoryAdapter`] from entity
//! definitions, update sets and entity sets.
//!
//! # Examples
//!
//! ```ignore
//! use entisql::prelude::*;
//!
//! let adapter = RepositoryAdapter::new(Dialect::TSql, AnnotationDefinitionProvider::shared());
//!
//! // INSERT: values bind in insertable attribute order
//! let insert = adapter.create_insertion_statement::<Order>()?;
//!
//! // UPDATE
//! let update = UpdateSet::<Order>::new(adapter.provider().clone())?
//!     .set(&Order::NOTE, "shipped")?
//!     .where_equal(&Order::ID, 7)?;
//! let stmt = adapter.create_update_statement(&update)?;
//!
//! // DELETE
//! let set = EntitySet::<Order>::new(adapter.provider().clone())?.where_null(&Order::NOTE)?;
//! let stmt = adapter.create_deletion_statement(&set)?;
//! ```

use super::adapter::{RepositoryAdapter, Statement, StatementKind};
use super::dialect::SqlDialect;
use super::join::JoinOptions;
use super::parameter::ParameterList;
use super::token::{Token, TokenStream};
use crate::entity::{Entity, EntityType, PropertySelector, Value};
use crate::error::{Error, Result};
use crate::model::{EntitySet, UpdateSet};

impl RepositoryAdapter {
    // ========================================================================
    // INSERT
    // ========================================================================

    /// `INSERT INTO <table> (<columns>) VALUES (<placeholders>)` over the
    /// insertable attributes of `E`, followed by identity capture when `E`
    /// has an identity column.
    ///
    /// The statement carries no values. Bind one value per insertable
    /// attribute in definition order, e.g. with [`Self::insertion_values`].
    pub fn create_insertion_statement<E: Entity>(&self) -> Result<Statement> {
        let definition = self.provider().resolve(EntityType::of::<E>())?;
        let columns: Vec<_> = definition.insertable_attributes().collect();
        if columns.is_empty() {
            return Err(Error::InvalidDefinition {
                entity: definition.location().name.clone(),
                reason: "no insertable attributes".to_string(),
            });
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Insert)
            .space()
            .push(Token::Into)
            .space()
            .push(self.qualifier().table(definition.location())?)
            .space()
            .lparen();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(self.qualifier().identifier(&column.physical_name)?);
        }
        ts.rparen().line(0).push(Token::Values).space().lparen();
        for i in 0..columns.len() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Param(i));
        }
        ts.rparen();

        if let Some(identity) = definition.identity_attribute() {
            ts.append(&self.dialect().emit_identity_capture(&identity.physical_name)?);
        }

        Ok(self.finish(StatementKind::Insert, &ts, ParameterList::new()))
    }

    /// Values of `item` for an insertion statement, in placeholder order.
    ///
    /// Each insertable attribute reads through the selector naming its
    /// property; attributes without a selector bind null.
    pub fn insertion_values<E: Entity>(
        &self,
        item: &E,
        selectors: &[&dyn PropertySelector<E>],
    ) -> Result<Vec<Value>> {
        let definition = self.provider().resolve(EntityType::of::<E>())?;
        Ok(definition
            .insertable_attributes()
            .map(|attribute| {
                selectors
                    .iter()
                    .find(|s| s.property_name() == attribute.property_name)
                    .map_or(Value::Null, |s| s.extract(item))
            })
            .collect())
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    /// `UPDATE <table> SET ... [FROM <joins>] [WHERE ...]`.
    ///
    /// Assignments to key, identity, computed or related attributes are
    /// skipped. SET values bind before filter values.
    pub fn create_update_statement<E>(&self, update: &UpdateSet<E>) -> Result<Statement> {
        let set = update.entity_set();
        let root = set.definition().location();
        self.check_joined_dml(set, "UPDATE with joined tables")?;

        let mut params = ParameterList::new();
        let mut assignments = Vec::new();
        for (attribute, value) in update.values() {
            if !attribute.is_updateable() {
                continue;
            }
            let mut ts = TokenStream::new();
            ts.push(self.qualifier().identifier(&attribute.physical_name)?)
                .space()
                .push(Token::Eq)
                .space();
            if value.is_null() {
                ts.push(Token::LitNull);
            } else {
                ts.push(params.bind(value));
            }
            assignments.push(ts);
        }
        if assignments.is_empty() {
            return Err(Error::invalid_argument(
                "update assigns no updateable attribute",
            ));
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Update)
            .space()
            .push(self.qualifier().table(root)?)
            .line(0)
            .push(Token::Set);
        self.push_list(&mut ts, assignments, 1);
        if !set.relations().is_empty() {
            ts.line(0)
                .append(&self.joins().from_clause(root, set.relations(), JoinOptions::default())?);
        }
        ts.append(&self.where_clause(set.filters(), None, None, 0, &mut params)?);

        Ok(self.finish(StatementKind::Update, &ts, params))
    }

    // ========================================================================
    // DELETE
    // ========================================================================

    /// `DELETE FROM <table> [WHERE ...]`, or `DELETE <table> FROM <joins>`
    /// when the set joins other tables.
    pub fn create_deletion_statement<E>(&self, set: &EntitySet<E>) -> Result<Statement> {
        let root = set.definition().location();
        self.check_joined_dml(set, "DELETE with joined tables")?;

        let mut params = ParameterList::new();
        let mut ts = TokenStream::new();
        ts.push(Token::Delete).space();
        if set.relations().is_empty() {
            ts.push(Token::From).space().push(self.qualifier().table(root)?);
        } else {
            ts.push(self.qualifier().table(root)?)
                .line(0)
                .append(&self.joins().from_clause(root, set.relations(), JoinOptions::default())?);
        }
        ts.append(&self.where_clause(set.filters(), None, None, 0, &mut params)?);

        Ok(self.finish(StatementKind::Delete, &ts, params))
    }

    fn check_joined_dml<E>(&self, set: &EntitySet<E>, feature: &'static str) -> Result<()> {
        if !set.relations().is_empty() && !self.dialect().supports_joined_dml() {
            return Err(Error::NotSupported {
                dialect: self.dialect().name(),
                feature,
            });
        }
        Ok(())
    }
}
