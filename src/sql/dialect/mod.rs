//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (ANSI/PG), `[]` (T-SQL)
//! - Parameters: `@0` vs `$1`
//! - Pagination: OFFSET/LIMIT vs OFFSET FETCH, LIMIT vs TOP
//! - Existence checks: `SELECT EXISTS` vs `IF EXISTS ... ELSE`
//! - Identity capture after INSERT: RETURNING vs SCOPE_IDENTITY()
//!
//! # Usage
//!
//! ```ignore
//! use entisql::sql::{Dialect, SqlDialect};
//!
//! let dialect: Dialect = "postgres".parse()?;
//! let quoted = dialect.quote_identifier("user");  // "user"
//! ```
//!
//! Check dialect feature flags (e.g., `supports_joined_dml()`) before
//! generating SQL that depends on them.

pub mod helpers;
mod postgres;
mod tsql;

pub use postgres::Postgres;
pub use tsql::TSql;

use std::str::FromStr;

use super::token::{Token, TokenStream};
use crate::config::SettingsError;
use crate::error::{Error, Result};

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifiers and Parameters
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - ANSI/PostgreSQL: `"identifier"`
    /// - T-SQL: `[identifier]`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Prefix marking a parameter name.
    fn parameter_prefix(&self) -> &'static str;

    /// Placeholder for the 0-based parameter `index`.
    fn format_parameter(&self, index: usize) -> String;

    /// Parameter name in this dialect's placeholder syntax.
    ///
    /// Names already carrying the prefix pass through. A numeric name, bare
    /// or with another dialect's prefix (`0`, `@0`), is a 0-based index and
    /// renders as [`format_parameter`](Self::format_parameter) does.
    fn add_prefix(&self, name: &str) -> String {
        let prefix = self.parameter_prefix();
        if name.starts_with(prefix) {
            return name.to_string();
        }
        let bare = helpers::strip_parameter_prefix(name);
        match bare.parse::<usize>() {
            Ok(index) => self.format_parameter(index),
            Err(_) => format!("{}{}", prefix, bare),
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit the paging window with bound offset and fetch values.
    ///
    /// - ANSI/PostgreSQL: `OFFSET o LIMIT f` (default)
    /// - T-SQL: `OFFSET o ROWS FETCH NEXT f ROWS ONLY` (override)
    fn emit_paging(&self, offset: Token, fetch: Token) -> TokenStream {
        helpers::emit_offset_limit_standard(offset, fetch)
    }

    /// Whether this dialect requires ORDER BY for OFFSET.
    ///
    /// T-SQL requires ORDER BY when using OFFSET FETCH.
    fn requires_order_by_for_offset(&self) -> bool {
        false
    }

    /// Whether a row cap goes in the select list (`TOP`) rather than at
    /// the end of the statement (`LIMIT`).
    fn uses_top_for_limit(&self) -> bool {
        false
    }

    /// Emit a literal row cap.
    fn emit_limit(&self, rows: u64) -> TokenStream {
        helpers::emit_limit_standard(rows)
    }

    // =========================================================================
    // Statement Wrappers
    // =========================================================================

    /// Wrap a query in a boolean existence check.
    fn emit_exists(&self, query: &TokenStream) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .push(Token::Exists)
            .space()
            .lparen()
            .append(query)
            .rparen();
        ts
    }

    /// Keyword(s) opening a common table expression.
    fn emit_cte_prefix(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::With);
        ts
    }

    /// Fragment appended after INSERT ... VALUES to return the generated
    /// identity value.
    fn emit_identity_capture(&self, identity_column: &str) -> Result<TokenStream> {
        let _ = identity_column;
        Err(Error::NotSupported {
            dialect: self.name(),
            feature: "identity capture",
        })
    }

    /// Whether UPDATE and DELETE can filter through joined tables.
    fn supports_joined_dml(&self) -> bool {
        false
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    TSql,
    Postgres,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::TSql => &TSql,
            Dialect::Postgres => &Postgres,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn parameter_prefix(&self) -> &'static str {
        self.dialect().parameter_prefix()
    }

    fn format_parameter(&self, index: usize) -> String {
        self.dialect().format_parameter(index)
    }

    fn add_prefix(&self, name: &str) -> String {
        self.dialect().add_prefix(name)
    }

    fn emit_paging(&self, offset: Token, fetch: Token) -> TokenStream {
        self.dialect().emit_paging(offset, fetch)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        self.dialect().requires_order_by_for_offset()
    }

    fn uses_top_for_limit(&self) -> bool {
        self.dialect().uses_top_for_limit()
    }

    fn emit_limit(&self, rows: u64) -> TokenStream {
        self.dialect().emit_limit(rows)
    }

    fn emit_exists(&self, query: &TokenStream) -> TokenStream {
        self.dialect().emit_exists(query)
    }

    fn emit_cte_prefix(&self) -> TokenStream {
        self.dialect().emit_cte_prefix()
    }

    fn emit_identity_capture(&self, identity_column: &str) -> Result<TokenStream> {
        self.dialect().emit_identity_capture(identity_column)
    }

    fn supports_joined_dml(&self) -> bool {
        self.dialect().supports_joined_dml()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = SettingsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tsql" | "mssql" | "sqlserver" => Ok(Dialect::TSql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            _ => Err(SettingsError::UnsupportedDialect(s.to_string())),
        }
    }
}
