//! Entity sets and item selections.
//!
//! [`EntitySet`] holds the relations and filters shared by every statement
//! kind. [`ItemSelection`] adds projection, ordering, paging and set
//! composition on top. Filter and join methods live on the
//! [`EntitySetBuilder`] trait so selections and update sets share them.
//!
//! Builders consume `self` and return `Result<Self>`: a bad selector or
//! argument fails at the call that introduced it.
//!
//! ```ignore
//! let selection = ItemSelection::<Order>::new(provider)?
//!     .inner_join_as(&Order::CUSTOMER_ID, &Customer::ID, "cust")?
//!     .where_equal(&Customer::NAME.with_alias("cust"), "Contoso")?
//!     .order_by(&Order::ID)?
//!     .page(2, 10)?;
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::filter::{Comparison, ValueFilter};
use super::relation::{EntityRelation, EntityRelationType};
use crate::entity::{
    distinct_by, same_attribute, AttributeDefinition, DefinitionProvider, Entity,
    EntityDefinition, EntityType, PropertySelector, Value,
};
use crate::error::{Error, Result};

/// Relations and filters over a root entity `E`.
pub struct EntitySet<E> {
    provider: DefinitionProvider,
    definition: Arc<EntityDefinition>,
    relations: Vec<EntityRelation>,
    filters: Vec<ValueFilter>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntitySet<E> {
    pub fn new(provider: DefinitionProvider) -> Result<Self> {
        let definition = provider.resolve(EntityType::of::<E>())?;
        Ok(Self {
            provider,
            definition,
            relations: Vec::new(),
            filters: Vec::new(),
            _entity: PhantomData,
        })
    }

    /// Resolve a selector of any mapped entity to its attribute.
    pub fn resolve_attribute<X: Entity>(
        &self,
        selector: &(impl PropertySelector<X> + ?Sized),
    ) -> Result<AttributeDefinition> {
        resolve_with(&self.provider, selector, selector.entity_alias())
    }
}

impl<E> EntitySet<E> {
    pub fn provider(&self) -> &DefinitionProvider {
        &self.provider
    }

    pub fn definition(&self) -> &EntityDefinition {
        &self.definition
    }

    /// Relations in insertion order.
    pub fn relations(&self) -> &[EntityRelation] {
        &self.relations
    }

    /// Filters in declaration order.
    pub fn filters(&self) -> &[ValueFilter] {
        &self.filters
    }

    /// Append a relation unless an equal one is already present.
    pub fn add_relation(&mut self, relation: EntityRelation) {
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
    }

    pub fn add_filter(&mut self, filter: ValueFilter) {
        self.filters.push(filter);
    }
}

impl<E> Clone for EntitySet<E> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            definition: Arc::clone(&self.definition),
            relations: self.relations.clone(),
            filters: self.filters.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for EntitySet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySet")
            .field("entity", self.definition.location())
            .field("relations", &self.relations)
            .field("filters", &self.filters)
            .finish()
    }
}

fn resolve_with<X: Entity>(
    provider: &DefinitionProvider,
    selector: &(impl PropertySelector<X> + ?Sized),
    alias: Option<&str>,
) -> Result<AttributeDefinition> {
    provider
        .find_attribute(EntityType::of::<X>(), alias, selector.property_name())?
        .ok_or_else(|| Error::UnresolvedAttribute {
            entity: entity_name::<X>(alias),
            property: selector.property_name().to_string(),
        })
}

fn entity_name<X>(alias: Option<&str>) -> String {
    let type_name = std::any::type_name::<X>();
    let short = type_name.rsplit("::").next().unwrap_or(type_name);
    match alias {
        Some(alias) => format!("{} ({})", short, alias),
        None => short.to_string(),
    }
}

fn require_selectors<T: ?Sized>(selectors: &[&T], operation: &str) -> Result<()> {
    if selectors.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{} requires at least one selector",
            operation
        )));
    }
    Ok(())
}

/// Filter and join operations shared by every builder over an entity set.
pub trait EntitySetBuilder<E: Entity>: Sized {
    fn entity_set(&self) -> &EntitySet<E>;

    fn entity_set_mut(&mut self) -> &mut EntitySet<E>;

    /// Add a comparison against the attribute behind `selector`.
    fn filter<X: Entity>(
        mut self,
        selector: &(impl PropertySelector<X> + ?Sized),
        comparison: Comparison,
    ) -> Result<Self> {
        let attribute = self.entity_set().resolve_attribute(selector)?;
        let filter = ValueFilter::with_comparison(attribute, comparison)?;
        self.entity_set_mut().add_filter(filter);
        Ok(self)
    }

    /// Equality filters for each selector against the value read from
    /// `example`.
    ///
    /// A default value (zero, empty) is compared literally; only a null
    /// value renders as a null check.
    fn matching(mut self, example: &E, selectors: &[&dyn PropertySelector<E>]) -> Result<Self> {
        require_selectors(selectors, "matching")?;
        for selector in selectors {
            let attribute = self.entity_set().resolve_attribute(*selector)?;
            let value = selector.extract(example);
            self.entity_set_mut()
                .add_filter(ValueFilter::equal(attribute, value));
        }
        Ok(self)
    }

    /// Range filters for each selector, bounded by the values read from
    /// `baseline` and `boundary` in either order.
    fn between(
        mut self,
        baseline: &E,
        boundary: &E,
        selectors: &[&dyn PropertySelector<E>],
    ) -> Result<Self> {
        require_selectors(selectors, "between")?;
        for selector in selectors {
            let attribute = self.entity_set().resolve_attribute(*selector)?;
            let filter =
                ValueFilter::between(attribute, selector.extract(baseline), selector.extract(boundary))?;
            self.entity_set_mut().add_filter(filter);
        }
        Ok(self)
    }

    fn where_between<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Result<Self> {
        self.filter(
            selector,
            Comparison::Between {
                low: low.into(),
                high: high.into(),
            },
        )
    }

    fn where_equal<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.filter(selector, Comparison::Equality(value.into()))
    }

    fn where_not_equal<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.filter(selector, Comparison::Inequality(value.into()))
    }

    fn where_less_than<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.filter(selector, Comparison::LessThan(value.into()))
    }

    fn where_less_than_or_equal<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.filter(selector, Comparison::LessThanOrEqualTo(value.into()))
    }

    fn where_greater_than<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.filter(selector, Comparison::GreaterThan(value.into()))
    }

    fn where_greater_than_or_equal<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.filter(selector, Comparison::GreaterThanOrEqualTo(value.into()))
    }

    fn where_null<X: Entity>(self, selector: &(impl PropertySelector<X> + ?Sized)) -> Result<Self> {
        self.filter(selector, Comparison::IsNull)
    }

    fn where_not_null<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
    ) -> Result<Self> {
        self.filter(selector, Comparison::IsNotNull)
    }

    /// Set membership filter.
    fn include<X: Entity, V: Into<Value>>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let values = values.into_iter().map(Into::into).collect();
        self.filter(selector, Comparison::MatchesSet(values))
    }

    /// Set membership filter on a related entity read through `alias`.
    fn include_related<X: Entity, V: Into<Value>>(
        mut self,
        selector: &(impl PropertySelector<X> + ?Sized),
        alias: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        if alias.trim().is_empty() {
            return Err(Error::invalid_argument("related alias must not be blank"));
        }
        let attribute = resolve_with(self.entity_set().provider(), selector, Some(alias))?;
        let values = values.into_iter().map(Into::into).collect();
        let filter = ValueFilter::matches_set(attribute, values)?;
        self.entity_set_mut().add_filter(filter);
        Ok(self)
    }

    /// Set exclusion filter.
    fn exclude<X: Entity, V: Into<Value>>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let values = values.into_iter().map(Into::into).collect();
        self.filter(selector, Comparison::DoesNotMatchSet(values))
    }

    /// Join `relation` onto `source`. Adding an equal relation twice is a
    /// no-op.
    fn join<S: Entity, R: Entity>(
        mut self,
        relation_type: EntityRelationType,
        source: &(impl PropertySelector<S> + ?Sized),
        relation: &(impl PropertySelector<R> + ?Sized),
        source_alias: Option<&str>,
        relation_alias: Option<&str>,
    ) -> Result<Self> {
        let relation = EntityRelation::join(
            self.entity_set().provider().as_ref(),
            relation_type,
            source,
            relation,
            source_alias,
            relation_alias,
        )?;
        self.entity_set_mut().add_relation(relation);
        Ok(self)
    }

    fn inner_join<S: Entity, R: Entity>(
        self,
        source: &(impl PropertySelector<S> + ?Sized),
        relation: &(impl PropertySelector<R> + ?Sized),
    ) -> Result<Self> {
        self.join(EntityRelationType::InnerJoin, source, relation, None, None)
    }

    fn inner_join_as<S: Entity, R: Entity>(
        self,
        source: &(impl PropertySelector<S> + ?Sized),
        relation: &(impl PropertySelector<R> + ?Sized),
        relation_alias: &str,
    ) -> Result<Self> {
        self.join(
            EntityRelationType::InnerJoin,
            source,
            relation,
            None,
            Some(relation_alias),
        )
    }

    fn left_join<S: Entity, R: Entity>(
        self,
        source: &(impl PropertySelector<S> + ?Sized),
        relation: &(impl PropertySelector<R> + ?Sized),
    ) -> Result<Self> {
        self.join(EntityRelationType::LeftJoin, source, relation, None, None)
    }

    fn left_join_as<S: Entity, R: Entity>(
        self,
        source: &(impl PropertySelector<S> + ?Sized),
        relation: &(impl PropertySelector<R> + ?Sized),
        relation_alias: &str,
    ) -> Result<Self> {
        self.join(
            EntityRelationType::LeftJoin,
            source,
            relation,
            None,
            Some(relation_alias),
        )
    }
}

impl<E: Entity> EntitySetBuilder<E> for EntitySet<E> {
    fn entity_set(&self) -> &EntitySet<E> {
        self
    }

    fn entity_set_mut(&mut self) -> &mut EntitySet<E> {
        self
    }
}

/// Aggregate applied to a select expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    None,
    Count,
}

/// One explicit column of the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpression {
    pub attribute: AttributeDefinition,
    pub function: AggregateFunction,
    /// Output name; defaults to the attribute's own alias.
    pub alias: Option<String>,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderExpression {
    pub attribute: AttributeDefinition,
    pub descending: bool,
}

/// Set operator joining a selection to its linked sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionLinkType {
    Union,
    Intersection,
    Exception,
}

/// A sibling selection combined by a set operator.
pub struct LinkedSelection<E> {
    pub link_type: SelectionLinkType,
    pub selection: ItemSelection<E>,
}

impl<E> Clone for LinkedSelection<E> {
    fn clone(&self) -> Self {
        Self {
            link_type: self.link_type,
            selection: self.selection.clone(),
        }
    }
}

impl<E> fmt::Debug for LinkedSelection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedSelection")
            .field("link_type", &self.link_type)
            .field("selection", &self.selection)
            .finish()
    }
}

/// Paging window: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u64,
    size: i64,
}

impl Page {
    pub fn new(number: u64, size: i64) -> Result<Self> {
        if number == 0 {
            return Err(Error::invalid_argument("page number is 1-based"));
        }
        Ok(Self { number, size })
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// A page of size zero or less leaves the selection unpaged.
    pub fn is_active(&self) -> bool {
        self.size > 0
    }

    /// Rows skipped before this page.
    pub fn offset(&self) -> i64 {
        let skipped = i64::try_from(self.number - 1).unwrap_or(i64::MAX);
        skipped.saturating_mul(self.size.max(0))
    }
}

/// A renderable query over entity `E`.
pub struct ItemSelection<E> {
    entity_set: EntitySet<E>,
    properties_to_return: Vec<AttributeDefinition>,
    select_expressions: Vec<SelectExpression>,
    order_expressions: Vec<OrderExpression>,
    linked: Option<Box<LinkedSelection<E>>>,
    limit: Option<u64>,
    page: Option<Page>,
}

impl<E: Entity> ItemSelection<E> {
    /// Selection of every returnable attribute of `E`.
    pub fn new(provider: DefinitionProvider) -> Result<Self> {
        Ok(Self::from_entity_set(EntitySet::new(provider)?))
    }

    /// Selection over an existing entity set.
    pub fn from_entity_set(entity_set: EntitySet<E>) -> Self {
        let properties_to_return = entity_set.definition().returnable_attributes();
        Self {
            entity_set,
            properties_to_return,
            select_expressions: Vec::new(),
            order_expressions: Vec::new(),
            linked: None,
            limit: None,
            page: None,
        }
    }

    /// Replace the returned properties. An empty slice restores every
    /// returnable attribute; duplicates are dropped, first occurrence wins.
    pub fn select(mut self, selectors: &[&dyn PropertySelector<E>]) -> Result<Self> {
        if selectors.is_empty() {
            self.properties_to_return = self.entity_set.definition().returnable_attributes();
            return Ok(self);
        }

        let attributes = selectors
            .iter()
            .map(|s| self.entity_set.resolve_attribute(*s))
            .collect::<Result<Vec<_>>>()?;
        self.properties_to_return = distinct_by(&attributes, same_attribute);
        Ok(self)
    }

    /// Append properties read from a joined entity.
    pub fn select_related<X: Entity>(mut self, selectors: &[&dyn PropertySelector<X>]) -> Result<Self> {
        require_selectors(selectors, "select_related")?;
        let mut attributes = std::mem::take(&mut self.properties_to_return);
        for selector in selectors {
            attributes.push(self.entity_set.resolve_attribute(*selector)?);
        }
        self.properties_to_return = distinct_by(&attributes, same_attribute);
        Ok(self)
    }

    /// Add an explicit select expression. Once any is present, the
    /// expressions replace the returned properties in the select list.
    pub fn select_expression<X: Entity>(
        mut self,
        selector: &(impl PropertySelector<X> + ?Sized),
        function: AggregateFunction,
        alias: Option<&str>,
    ) -> Result<Self> {
        if alias.is_some_and(|a| a.trim().is_empty()) {
            return Err(Error::invalid_argument("select alias must not be blank"));
        }
        let attribute = self.entity_set.resolve_attribute(selector)?;
        self.select_expressions.push(SelectExpression {
            attribute,
            function,
            alias: alias.map(str::to_string),
        });
        Ok(self)
    }

    /// `COUNT(<attribute>) AS <alias>`.
    pub fn count<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
        alias: &str,
    ) -> Result<Self> {
        self.select_expression(selector, AggregateFunction::Count, Some(alias))
    }

    pub fn order_by<X: Entity>(self, selector: &(impl PropertySelector<X> + ?Sized)) -> Result<Self> {
        self.push_order(selector, false)
    }

    pub fn order_by_descending<X: Entity>(
        self,
        selector: &(impl PropertySelector<X> + ?Sized),
    ) -> Result<Self> {
        self.push_order(selector, true)
    }

    fn push_order<X: Entity>(
        mut self,
        selector: &(impl PropertySelector<X> + ?Sized),
        descending: bool,
    ) -> Result<Self> {
        let attribute = self.entity_set.resolve_attribute(selector)?;
        self.order_expressions.push(OrderExpression {
            attribute,
            descending,
        });
        Ok(self)
    }
}

impl<E> ItemSelection<E> {
    pub fn union(self, other: ItemSelection<E>) -> Self {
        self.link(SelectionLinkType::Union, other)
    }

    pub fn intersect(self, other: ItemSelection<E>) -> Self {
        self.link(SelectionLinkType::Intersection, other)
    }

    pub fn except(self, other: ItemSelection<E>) -> Self {
        self.link(SelectionLinkType::Exception, other)
    }

    /// Link a sibling selection, replacing any previous link.
    pub fn link(mut self, link_type: SelectionLinkType, selection: ItemSelection<E>) -> Self {
        self.linked = Some(Box::new(LinkedSelection {
            link_type,
            selection,
        }));
        self
    }

    /// Cap the number of rows returned. Ignored while a page is active.
    pub fn limit(mut self, rows: u64) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Return page `number` (1-based) of `size` rows.
    pub fn page(mut self, number: u64, size: i64) -> Result<Self> {
        self.page = Some(Page::new(number, size)?);
        Ok(self)
    }

    pub fn entity_set(&self) -> &EntitySet<E> {
        &self.entity_set
    }

    pub fn definition(&self) -> &EntityDefinition {
        self.entity_set.definition()
    }

    pub fn relations(&self) -> &[EntityRelation] {
        self.entity_set.relations()
    }

    pub fn filters(&self) -> &[ValueFilter] {
        self.entity_set.filters()
    }

    pub fn properties_to_return(&self) -> &[AttributeDefinition] {
        &self.properties_to_return
    }

    pub fn select_expressions(&self) -> &[SelectExpression] {
        &self.select_expressions
    }

    pub fn order_expressions(&self) -> &[OrderExpression] {
        &self.order_expressions
    }

    pub fn linked(&self) -> Option<&LinkedSelection<E>> {
        self.linked.as_deref()
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    /// The page window, when one is active.
    pub fn active_page(&self) -> Option<Page> {
        self.page.filter(Page::is_active)
    }
}

impl<E> Clone for ItemSelection<E> {
    fn clone(&self) -> Self {
        Self {
            entity_set: self.entity_set.clone(),
            properties_to_return: self.properties_to_return.clone(),
            select_expressions: self.select_expressions.clone(),
            order_expressions: self.order_expressions.clone(),
            linked: self.linked.clone(),
            limit: self.limit,
            page: self.page,
        }
    }
}

impl<E> fmt::Debug for ItemSelection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemSelection")
            .field("entity_set", &self.entity_set)
            .field("properties_to_return", &self.properties_to_return.len())
            .field("select_expressions", &self.select_expressions)
            .field("order_expressions", &self.order_expressions)
            .field("linked", &self.linked.as_ref().map(|l| l.link_type))
            .field("limit", &self.limit)
            .field("page", &self.page)
            .finish()
    }
}

impl<E: Entity> EntitySetBuilder<E> for ItemSelection<E> {
    fn entity_set(&self) -> &EntitySet<E> {
        &self.entity_set
    }

    fn entity_set_mut(&mut self) -> &mut EntitySet<E> {
        &mut self.entity_set
    }
}
