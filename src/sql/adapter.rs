//! Statement compiler.
//!
//! [`RepositoryAdapter`] turns entity sets and selections into a
//! [`Statement`]: SQL text plus the values for its positional parameters.
//! Every compile binds values through one [`ParameterList`], so the value
//! sequence matches placeholder order in the text, across linked selections
//! and table expressions alike.
//!
//! The adapter holds no per-compile state and can be shared across threads.

use super::dialect::{Dialect, SqlDialect};
use super::join::{JoinClause, JoinOptions};
use super::parameter::{self, BoundParameter, ParameterList, StringSizes};
use super::qualifier::NameQualifier;
use super::token::{Token, TokenStream};
use crate::config::CompilerSettings;
use crate::entity::{AttributeDefinition, DefinitionProvider, EntityLocation, Value};
use crate::error::{Error, Result};
use crate::model::{
    AggregateFunction, Comparison, EntitySet, ItemSelection, Page, SelectionLinkType, ValueFilter,
};

/// Compiled SQL text with its parameter values in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub parameters: Vec<Value>,
}

/// Statement shape, recorded on the compile trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StatementKind {
    Select,
    Exists,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Exists => "exists",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

/// Compiles entity models into dialect SQL.
#[derive(Debug, Clone)]
pub struct RepositoryAdapter {
    dialect: Dialect,
    provider: DefinitionProvider,
    qualifier: NameQualifier,
    joins: JoinClause,
    sizes: StringSizes,
    page_alias_suffix: String,
    indent: bool,
}

impl RepositoryAdapter {
    /// Adapter for `dialect` with default settings.
    pub fn new(dialect: Dialect, provider: DefinitionProvider) -> Self {
        let qualifier = NameQualifier::new(dialect);
        let defaults = CompilerSettings::default();
        Self {
            dialect,
            provider,
            qualifier,
            joins: JoinClause::new(qualifier),
            sizes: StringSizes::default(),
            page_alias_suffix: defaults.page_alias_suffix,
            indent: defaults.indent,
        }
    }

    pub fn from_settings(settings: &CompilerSettings, provider: DefinitionProvider) -> Result<Self> {
        let dialect = settings.dialect()?;
        if settings.page_alias_suffix.trim().is_empty() {
            return Err(Error::invalid_argument("page alias suffix must not be blank"));
        }

        let qualifier = NameQualifier::new(dialect);
        Ok(Self {
            dialect,
            provider,
            qualifier,
            joins: JoinClause::new(qualifier),
            sizes: StringSizes {
                max_string_length: settings.max_string_length,
                max_ansi_string_length: settings.max_ansi_string_length,
            },
            page_alias_suffix: settings.page_alias_suffix.clone(),
            indent: settings.indent,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn provider(&self) -> &DefinitionProvider {
        &self.provider
    }

    pub fn qualifier(&self) -> &NameQualifier {
        &self.qualifier
    }

    /// Render on one line instead of indented lines.
    pub fn compact(mut self) -> Self {
        self.indent = false;
        self
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Parameter name in the dialect's placeholder syntax, e.g. `0` -> `@0`
    /// on T-SQL and `@0` -> `$1` on PostgreSQL.
    pub fn add_prefix(&self, name: &str) -> String {
        self.dialect.add_prefix(name)
    }

    /// Placeholder text for the parameter at `index`.
    pub fn parameter_name(&self, index: usize) -> String {
        self.dialect.format_parameter(index)
    }

    /// Coerce one value for binding under `name`.
    pub fn create_parameter(&self, name: &str, value: &Value) -> BoundParameter {
        parameter::create_parameter(self.add_prefix(name), value, self.sizes)
    }

    /// Every value of `statement`, named by its placeholder and coerced for
    /// binding.
    pub fn bind_parameters(&self, statement: &Statement) -> Vec<BoundParameter> {
        statement
            .parameters
            .iter()
            .enumerate()
            .map(|(index, value)| {
                parameter::create_parameter(self.parameter_name(index), value, self.sizes)
            })
            .collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Boolean query: does any row of `set` exist.
    pub fn create_exists_statement<E>(&self, set: &EntitySet<E>) -> Result<Statement> {
        let mut params = ParameterList::new();

        let mut query = TokenStream::new();
        query
            .push(Token::Select)
            .space()
            .push(Token::LitInt(1))
            .line(0)
            .append(&self.joins.from_clause(
                set.definition().location(),
                set.relations(),
                JoinOptions::default(),
            )?)
            .append(&self.where_clause(set.filters(), None, None, 0, &mut params)?);

        let ts = self.dialect.emit_exists(&query);
        Ok(self.finish(StatementKind::Exists, &ts, params))
    }

    /// SELECT for `selection` and every selection linked to it.
    ///
    /// Key tables of paged joins are gathered into one `WITH` prefix ahead
    /// of the whole chain, so each branch stays a plain query body.
    pub fn create_selection_statement<E>(&self, selection: &ItemSelection<E>) -> Result<Statement> {
        let mut params = ParameterList::new();

        let mut pieces = vec![(None, selection)];
        let mut next = selection.linked();
        while let Some(linked) = next {
            pieces.push((Some(linked.link_type), &linked.selection));
            next = linked.selection.linked();
        }
        let chained = pieces.len() > 1;

        // Table expressions precede every branch, so their values bind first.
        let mut expressions = Vec::new();
        let mut key_tables = Vec::with_capacity(pieces.len());
        for (branch, (_, piece)) in pieces.iter().enumerate() {
            let key_table = match piece.active_page() {
                Some(page) if !piece.relations().is_empty() => {
                    let name = self.page_keys_name(piece, chained.then_some(branch));
                    expressions.push(self.page_keys_expression(piece, page, &name, &mut params)?);
                    Some(name)
                }
                _ => None,
            };
            key_tables.push(key_table);
        }

        let mut ts = TokenStream::new();
        if !expressions.is_empty() {
            ts.append(&self.dialect.emit_cte_prefix()).space();
            for (i, expression) in expressions.iter().enumerate() {
                if i > 0 {
                    ts.comma().line(0);
                }
                ts.append(expression);
            }
            ts.line(0);
        }

        for ((link_type, piece), key_table) in pieces.iter().zip(&key_tables) {
            let body = match key_table {
                Some(name) => self.page_keys_selection(piece, name, !chained)?,
                None => self.plain_selection(piece, piece.active_page(), &mut params)?,
            };
            if !chained {
                ts.append(&body);
                continue;
            }
            if let Some(link_type) = link_type {
                ts.newline().push(link_token(*link_type)).newline();
            }
            ts.lparen().append(&body).rparen();
        }

        Ok(self.finish(StatementKind::Select, &ts, params))
    }

    /// `SELECT ... FROM ... [WHERE] [ORDER BY] [paging | limit]`.
    fn plain_selection<E>(
        &self,
        selection: &ItemSelection<E>,
        page: Option<Page>,
        params: &mut ParameterList,
    ) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(Token::Select);

        let limit = match page {
            Some(_) => None,
            None => selection.row_limit(),
        };
        if let Some(rows) = limit.filter(|_| self.dialect.uses_top_for_limit()) {
            ts.space().append(&self.dialect.emit_limit(rows));
        }

        self.push_list(&mut ts, self.select_items(selection, None)?, 1);
        ts.line(0)
            .append(&self.joins.from_clause(
                selection.definition().location(),
                selection.relations(),
                JoinOptions::default(),
            )?)
            .append(&self.where_clause(selection.filters(), None, None, 0, params)?)
            .append(&self.order_clause(selection, None, page.is_some(), 0)?);

        if let Some(page) = page {
            ts.line(0).append(&self.paging(page, params));
        } else if let Some(rows) = limit.filter(|_| !self.dialect.uses_top_for_limit()) {
            ts.line(0).append(&self.dialect.emit_limit(rows));
        }

        Ok(ts)
    }

    // Paging across joins.
    //
    // Joins can multiply root rows, so the page is taken over root keys in
    // a table expression whose tables are all aliased with the page suffix.
    // The outer query then returns the full rows whose keys fall in that
    // page. Filters apply inside the table expression only, which keeps
    // offset and fetch as the last two values bound for the branch.

    /// `Order_page_keys`, or `Order_page_keys_2` for branch 2 of a chain.
    fn page_keys_name<E>(&self, selection: &ItemSelection<E>, branch: Option<usize>) -> String {
        let root = selection.definition().location().reference_name();
        match branch {
            Some(branch) => format!("{}{}_keys_{}", root, self.page_alias_suffix, branch),
            None => format!("{}{}_keys", root, self.page_alias_suffix),
        }
    }

    fn page_keys<'a, E>(&self, selection: &'a ItemSelection<E>) -> Result<Vec<&'a AttributeDefinition>> {
        let definition = selection.definition();
        let keys: Vec<&AttributeDefinition> = definition.primary_key_attributes().collect();
        if keys.is_empty() {
            return Err(Error::InvalidDefinition {
                entity: definition.location().name.clone(),
                reason: "paging across joins requires a primary key".to_string(),
            });
        }
        Ok(keys)
    }

    /// `name AS (SELECT <keys> ... <paging>)`
    fn page_keys_expression<E>(
        &self,
        selection: &ItemSelection<E>,
        page: Page,
        name: &str,
        params: &mut ParameterList,
    ) -> Result<TokenStream> {
        let suffix = self.page_alias_suffix.as_str();
        let keys = self.page_keys(selection)?;

        let mut inner = TokenStream::new();
        inner.push(Token::Select);
        let key_items = keys
            .iter()
            .map(|key| self.qualifier.select_item(key, Some(suffix)))
            .collect::<Result<Vec<_>>>()?;
        self.push_list(&mut inner, key_items, 2);
        inner
            .line(1)
            .append(&self.joins.from_clause(
                selection.definition().location(),
                selection.relations(),
                JoinOptions {
                    indent: 1,
                    alias_suffix: Some(suffix),
                },
            )?)
            .append(&self.where_clause(selection.filters(), Some(suffix), None, 1, params)?)
            .append(&self.order_clause(selection, Some(suffix), true, 1)?)
            .line(1)
            .append(&self.paging(page, params));

        let mut ts = TokenStream::new();
        ts.push(self.qualifier.identifier(name)?)
            .space()
            .push(Token::As)
            .space()
            .lparen()
            .line(1)
            .append(&inner)
            .line(0)
            .rparen();
        Ok(ts)
    }

    /// Full rows whose keys appear in the key table `name`. Binds nothing.
    fn page_keys_selection<E>(
        &self,
        selection: &ItemSelection<E>,
        name: &str,
        ordered: bool,
    ) -> Result<TokenStream> {
        let root = selection.definition().location();
        let keys = self.page_keys(selection)?;

        let mut key_match = TokenStream::new();
        key_match
            .push(Token::Exists)
            .space()
            .lparen()
            .push(Token::Select)
            .space()
            .push(Token::LitInt(1))
            .space()
            .push(Token::From)
            .space()
            .push(self.qualifier.identifier(name)?)
            .space()
            .push(Token::Where)
            .space();
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                key_match.space().push(Token::And).space();
            }
            key_match
                .push(self.qualifier.qualify(key, Some(name))?)
                .space()
                .push(Token::Eq)
                .space()
                .push(self.qualifier.column(root, key)?);
        }
        key_match.rparen();

        let mut ts = TokenStream::new();
        ts.push(Token::Select);
        self.push_list(&mut ts, self.select_items(selection, None)?, 1);
        ts.line(0)
            .append(&self.joins.from_clause(root, selection.relations(), JoinOptions::default())?)
            .append(&self.where_clause(&[], None, Some(key_match), 0, &mut ParameterList::new())?);
        if ordered {
            ts.append(&self.order_clause(selection, None, true, 0)?);
        }
        Ok(ts)
    }

    /// Select list: explicit expressions when present, else the properties
    /// to return.
    fn select_items<E>(
        &self,
        selection: &ItemSelection<E>,
        suffix: Option<&str>,
    ) -> Result<Vec<TokenStream>> {
        if selection.select_expressions().is_empty() {
            return selection
                .properties_to_return()
                .iter()
                .map(|attribute| self.qualifier.select_item(attribute, suffix))
                .collect();
        }

        selection
            .select_expressions()
            .iter()
            .map(|expression| {
                let location = NameQualifier::scoped(&expression.attribute.entity, suffix);
                let column = self.qualifier.column(&location, &expression.attribute)?;

                let mut ts = TokenStream::new();
                match expression.function {
                    AggregateFunction::None => {
                        ts.push(column);
                    }
                    AggregateFunction::Count => {
                        ts.push(Token::FunctionName("count".into()))
                            .lparen()
                            .push(column)
                            .rparen();
                    }
                }

                let alias = expression
                    .alias
                    .as_deref()
                    .or(expression.attribute.alias.as_deref());
                if let Some(alias) = alias {
                    ts.space()
                        .push(Token::As)
                        .space()
                        .push(self.qualifier.identifier(alias)?);
                }
                Ok(ts)
            })
            .collect()
    }

    /// ORDER BY terms. Paging on a dialect that needs an ordering falls back
    /// to the primary key, or the first attribute of a keyless entity.
    fn order_clause<E>(
        &self,
        selection: &ItemSelection<E>,
        suffix: Option<&str>,
        paging: bool,
        level: usize,
    ) -> Result<TokenStream> {
        let mut terms = Vec::new();
        if !selection.order_expressions().is_empty() {
            for order in selection.order_expressions() {
                let mut term = TokenStream::new();
                term.push(self.scoped_column(&order.attribute, suffix)?);
                if order.descending {
                    term.space().push(Token::Desc);
                }
                terms.push(term);
            }
        } else if paging && self.dialect.requires_order_by_for_offset() {
            let definition = selection.definition();
            let mut fallback: Vec<&AttributeDefinition> =
                definition.primary_key_attributes().collect();
            if fallback.is_empty() {
                fallback.extend(definition.attributes().first());
            }
            for attribute in fallback {
                let mut term = TokenStream::new();
                term.push(self.scoped_column(attribute, suffix)?);
                terms.push(term);
            }
        }

        let mut ts = TokenStream::new();
        if terms.is_empty() {
            return Ok(ts);
        }
        ts.line(level).push(Token::OrderBy).space();
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(term);
        }
        Ok(ts)
    }

    fn paging(&self, page: Page, params: &mut ParameterList) -> TokenStream {
        let offset = params.bind(&Value::Int(page.offset()));
        let fetch = params.bind(&Value::Int(page.size()));
        self.dialect.emit_paging(offset, fetch)
    }

    // =========================================================================
    // Shared clauses
    // =========================================================================

    /// `WHERE p1 AND p2 ...`, one predicate per line. Empty when there is
    /// nothing to filter on.
    pub(super) fn where_clause(
        &self,
        filters: &[ValueFilter],
        suffix: Option<&str>,
        extra: Option<TokenStream>,
        level: usize,
        params: &mut ParameterList,
    ) -> Result<TokenStream> {
        let mut predicates = filters
            .iter()
            .map(|filter| self.predicate(filter, suffix, params))
            .collect::<Result<Vec<_>>>()?;
        predicates.extend(extra);

        let mut ts = TokenStream::new();
        for (i, predicate) in predicates.iter().enumerate() {
            if i == 0 {
                ts.line(level).push(Token::Where).space();
            } else {
                ts.line(level + 1).push(Token::And).space();
            }
            ts.append(predicate);
        }
        Ok(ts)
    }

    /// One filter as a predicate, binding its operands in order.
    fn predicate(
        &self,
        filter: &ValueFilter,
        suffix: Option<&str>,
        params: &mut ParameterList,
    ) -> Result<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(self.scoped_column(filter.attribute(), suffix)?).space();

        match filter.comparison() {
            Comparison::Equality(Value::Null) | Comparison::IsNull => {
                ts.push(Token::IsNull);
            }
            Comparison::Inequality(Value::Null) | Comparison::IsNotNull => {
                ts.push(Token::IsNotNull);
            }
            Comparison::Equality(value) => {
                let op = if value.is_text() { Token::Like } else { Token::Eq };
                ts.push(op).space().push(params.bind(value));
            }
            Comparison::Inequality(value) => {
                if value.is_text() {
                    ts.push(Token::Not).space().push(Token::Like);
                } else {
                    ts.push(Token::Ne);
                }
                ts.space().push(params.bind(value));
            }
            Comparison::LessThan(value) => {
                ts.push(Token::Lt).space().push(params.bind(value));
            }
            Comparison::LessThanOrEqualTo(value) => {
                ts.push(Token::Lte).space().push(params.bind(value));
            }
            Comparison::GreaterThan(value) => {
                ts.push(Token::Gt).space().push(params.bind(value));
            }
            Comparison::GreaterThanOrEqualTo(value) => {
                ts.push(Token::Gte).space().push(params.bind(value));
            }
            Comparison::Between { low, high } => {
                ts.push(Token::Between)
                    .space()
                    .push(params.bind(low))
                    .space()
                    .push(Token::And)
                    .space()
                    .push(params.bind(high));
            }
            Comparison::MatchesSet(values) => {
                ts.push(Token::In).space().append(&value_list(values, params));
            }
            Comparison::DoesNotMatchSet(values) => {
                ts.push(Token::Not)
                    .space()
                    .push(Token::In)
                    .space()
                    .append(&value_list(values, params));
            }
        }
        Ok(ts)
    }

    fn scoped_column(&self, attribute: &AttributeDefinition, suffix: Option<&str>) -> Result<Token> {
        let location: EntityLocation = NameQualifier::scoped(&attribute.entity, suffix);
        self.qualifier.column(&location, attribute)
    }

    /// Items separated by commas, each on its own line at `level`.
    pub(super) fn push_list(&self, ts: &mut TokenStream, items: Vec<TokenStream>, level: usize) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.line(level).append(item);
        }
    }

    pub(super) fn joins(&self) -> &JoinClause {
        &self.joins
    }

    /// Render and trace a finished statement.
    pub(super) fn finish(
        &self,
        kind: StatementKind,
        tokens: &TokenStream,
        params: ParameterList,
    ) -> Statement {
        let statement = Statement {
            text: tokens.render(self.dialect, self.indent),
            parameters: params.into_values(),
        };
        tracing::debug!(
            kind = kind.as_str(),
            dialect = %self.dialect,
            params = statement.parameters.len(),
            sql = %statement.text,
            "entisql.statement"
        );
        statement
    }
}

fn link_token(link_type: SelectionLinkType) -> Token {
    match link_type {
        SelectionLinkType::Union => Token::Union,
        SelectionLinkType::Intersection => Token::Intersect,
        SelectionLinkType::Exception => Token::Except,
    }
}

/// `(p1, p2, ...)`
fn value_list(values: &[Value], params: &mut ParameterList) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.lparen();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.push(params.bind(value));
    }
    ts.rparen();
    ts
}
