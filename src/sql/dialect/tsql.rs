//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - `@name` parameters
//! - OFFSET FETCH for pagination (requires ORDER BY)
//! - TOP for simple limiting
//! - `IF EXISTS (...)` control flow instead of a boolean EXISTS select
//! - `;WITH` so a CTE can follow a previous batch statement
//! - SCOPE_IDENTITY() for generated keys
//! - UPDATE/DELETE may join through a FROM clause

use super::helpers;
use super::SqlDialect;
use crate::error::Result;
use crate::sql::token::{Token, TokenStream};

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    fn format_parameter(&self, index: usize) -> String {
        helpers::format_parameter_named(self.parameter_prefix(), index)
    }

    fn emit_paging(&self, offset: Token, fetch: Token) -> TokenStream {
        helpers::emit_offset_fetch_tsql(offset, fetch)
    }

    fn requires_order_by_for_offset(&self) -> bool {
        true
    }

    fn uses_top_for_limit(&self) -> bool {
        true
    }

    fn emit_limit(&self, rows: u64) -> TokenStream {
        helpers::emit_top_tsql(rows)
    }

    fn emit_exists(&self, query: &TokenStream) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::If)
            .space()
            .push(Token::Exists)
            .space()
            .lparen()
            .append(query)
            .rparen()
            .newline()
            .push(Token::Select)
            .space()
            .push(Token::LitInt(1))
            .space()
            .push(Token::Else)
            .space()
            .push(Token::Select)
            .space()
            .push(Token::LitInt(0));
        ts
    }

    fn emit_cte_prefix(&self) -> TokenStream {
        // A CTE must start its batch statement
        let mut ts = TokenStream::new();
        ts.push(Token::Semicolon).push(Token::With);
        ts
    }

    fn emit_identity_capture(&self, _identity_column: &str) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(Token::Semicolon)
            .newline()
            .push(Token::Select)
            .space()
            .push(Token::FunctionName("scope_identity".into()))
            .lparen()
            .rparen();
        Ok(ts)
    }

    fn supports_joined_dml(&self) -> bool {
        true
    }
}
