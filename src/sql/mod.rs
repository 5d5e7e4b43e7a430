//! SQL generation module.
//!
//! Compiles entity models into positionally-parameterized SQL for T-SQL and
//! PostgreSQL. It includes:
//!
//! - [`adapter`] - SELECT and EXISTS compilation, parameter coercion
//! - [`dml`] - INSERT, UPDATE and DELETE compilation
//! - [`join`] - JOIN clause rendering
//! - [`qualifier`] - escaped table and column references
//! - [`parameter`] - positional parameter binding
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod adapter;
pub mod dialect;
pub mod dml;
pub mod join;
pub mod parameter;
pub mod qualifier;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use adapter::{RepositoryAdapter, Statement};
pub use dialect::{Dialect, SqlDialect};
pub use join::{JoinClause, JoinOptions};
pub use parameter::{
    create_parameter, BoundParameter, ParameterList, ParameterType, StringSizes,
    GUID_STRING_LENGTH,
};
pub use qualifier::NameQualifier;
pub use token::{Token, TokenStream};
