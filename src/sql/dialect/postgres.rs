//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features:
//! - ANSI identifier quoting (`"`)
//! - Numbered `$n` parameters, 1-based
//! - `OFFSET ... LIMIT ...` pagination with no ORDER BY requirement
//! - `SELECT EXISTS (...)` boolean existence checks
//! - RETURNING clause for generated keys

use super::helpers;
use super::SqlDialect;
use crate::error::Result;
use crate::sql::token::{Token, TokenStream};

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn parameter_prefix(&self) -> &'static str {
        "$"
    }

    fn format_parameter(&self, index: usize) -> String {
        helpers::format_parameter_numbered(self.parameter_prefix(), index)
    }

    // Uses default emit_paging (OFFSET ... LIMIT ...)

    fn emit_identity_capture(&self, identity_column: &str) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.newline()
            .push(Token::Returning)
            .space()
            .push(Token::Ident(identity_column.to_string()));
        Ok(ts)
    }
}
