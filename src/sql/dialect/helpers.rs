//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL (SQL Server, Azure SQL)
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// Parameters
// =============================================================================

/// Named placeholder carrying the 0-based index: `@0`, `@1`, ...
/// Used by: T-SQL
pub fn format_parameter_named(prefix: &str, index: usize) -> String {
    format!("{}{}", prefix, index)
}

/// Numbered placeholder, 1-based: `$1`, `$2`, ...
/// Used by: Postgres
pub fn format_parameter_numbered(prefix: &str, index: usize) -> String {
    format!("{}{}", prefix, index + 1)
}

/// Parameter name without any placeholder prefix: `@0` -> `0`.
pub fn strip_parameter_prefix(name: &str) -> &str {
    name.trim_start_matches(['@', '$', ':'])
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit OFFSET ... LIMIT ... with bound values.
/// Used by: Postgres
pub fn emit_offset_limit_standard(offset: Token, fetch: Token) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Offset)
        .space()
        .push(offset)
        .space()
        .push(Token::Limit)
        .space()
        .push(fetch);
    ts
}

/// Emit OFFSET ... ROWS FETCH NEXT ... ROWS ONLY (T-SQL style).
/// Used by: T-SQL
/// Note: Requires ORDER BY clause in T-SQL
pub fn emit_offset_fetch_tsql(offset: Token, fetch: Token) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Offset)
        .space()
        .push(offset)
        .space()
        .push(Token::Rows)
        .space()
        .push(Token::Fetch)
        .space()
        .push(Token::Next)
        .space()
        .push(fetch)
        .space()
        .push(Token::Rows)
        .space()
        .push(Token::Only);
    ts
}

/// Emit a trailing `LIMIT n`.
/// Used by: Postgres
pub fn emit_limit_standard(rows: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Limit).space().push(Token::LitInt(clamp(rows)));
    ts
}

/// Emit `TOP (n)` for the select list.
/// Used by: T-SQL
pub fn emit_top_tsql(rows: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Top)
        .space()
        .lparen()
        .push(Token::LitInt(clamp(rows)))
        .rparen();
    ts
}

fn clamp(rows: u64) -> i64 {
    i64::try_from(rows).unwrap_or(i64::MAX)
}
