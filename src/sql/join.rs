//! Join clause rendering.
//!
//! Indentation and alias suffix are explicit arguments, so one renderer can
//! be shared by concurrent compilations.

use super::qualifier::NameQualifier;
use super::token::{Token, TokenStream};
use crate::entity::EntityLocation;
use crate::error::Result;
use crate::model::{EntityRelation, EntityRelationType};

/// Options for one rendering of a relation list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinOptions<'a> {
    /// Indentation level of each JOIN line.
    pub indent: usize,
    /// Suffix forcing an alias on every table occurrence, used inside a
    /// table expression so its names cannot collide with the outer
    /// statement's.
    pub alias_suffix: Option<&'a str>,
}

/// Renders relations as JOIN clauses.
#[derive(Debug, Clone, Copy)]
pub struct JoinClause {
    qualifier: NameQualifier,
}

impl JoinClause {
    pub fn new(qualifier: NameQualifier) -> Self {
        Self { qualifier }
    }

    /// One line per relation, in insertion order.
    pub fn create(&self, relations: &[EntityRelation], options: JoinOptions<'_>) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        for relation in relations {
            ts.line(options.indent)
                .append(&self.relation(relation, options.alias_suffix)?);
        }
        Ok(ts)
    }

    /// `INNER|LEFT JOIN <table> [AS <alias>] ON <source> = <relation>`.
    ///
    /// Without alias or suffix the joined table is referenced by its
    /// physical name in the ON clause.
    pub fn relation(&self, relation: &EntityRelation, alias_suffix: Option<&str>) -> Result<TokenStream> {
        let source = NameQualifier::scoped(&relation.source_location, alias_suffix);
        let target = NameQualifier::scoped(&relation.relation_location, alias_suffix);

        let mut ts = TokenStream::new();
        ts.push(match relation.relation_type {
            EntityRelationType::InnerJoin => Token::Inner,
            EntityRelationType::LeftJoin => Token::Left,
        })
        .space()
        .push(Token::Join)
        .space()
        .append(&self.qualifier.table_source(&target)?)
        .space()
        .push(Token::On)
        .space()
        .push(self.qualifier.column(&source, &relation.source_attribute)?)
        .space()
        .push(Token::Eq)
        .space()
        .push(self.qualifier.column(&target, &relation.relation_attribute)?);
        Ok(ts)
    }

    /// `FROM <table> [AS <alias>]` followed by the joins.
    pub fn from_clause(
        &self,
        root: &EntityLocation,
        relations: &[EntityRelation],
        options: JoinOptions<'_>,
    ) -> Result<TokenStream> {
        let root = NameQualifier::scoped(root, options.alias_suffix);
        let mut ts = TokenStream::new();
        ts.push(Token::From)
            .space()
            .append(&self.qualifier.table_source(&root)?)
            .append(&self.create(
                relations,
                JoinOptions {
                    indent: options.indent + 1,
                    ..options
                },
            )?);
        Ok(ts)
    }
}
