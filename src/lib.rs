//! # entisql
//!
//! A typed entity-relation query model that compiles to positionally
//! parameterized SQL for T-SQL and PostgreSQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           Entity metadata (definitions, selectors)       │
//! │    (tables, columns, keys, identity, related columns)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builders]
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Query model                          │
//! │  (EntitySet, ItemSelection, UpdateSet, filters, joins)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [RepositoryAdapter]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Statement: SQL text + parameter values        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Parameter values are returned in the order their placeholders appear in
//! the text; no value is ever inlined into SQL.

pub mod config;
pub mod entity;
pub mod error;
pub mod model;
pub mod sql;

pub use error::{Error, Result};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{CompilerSettings, Settings};
    pub use crate::entity::{
        AnnotationDefinitionProvider, AttributeDefinition, DefinitionProvider, Entity,
        EntityDefinition, EntityDefinitionProvider, EntityLocation, Field, PropertySelector, Value,
    };
    pub use crate::error::{Error, Result};
    pub use crate::model::{
        Comparison, EntityRelationType, EntitySet, EntitySetBuilder, FilterType, ItemSelection,
        SelectionLinkType, UpdateSet,
    };
    pub use crate::sql::{Dialect, RepositoryAdapter, SqlDialect, Statement};
}

// Also export at crate root for convenience
pub use sql::{Dialect, RepositoryAdapter, Statement};
