#[path = "../common/mod.rs"]
mod common;

use common::{compact, provider, Order};
use entisql::entity::Value;
use entisql::model::{
    Comparison, EntitySet, EntitySetBuilder, FilterType, ItemSelection, ValueFilter,
};
use entisql::{Dialect, Error};

fn orders() -> ItemSelection<Order> {
    ItemSelection::new(provider()).unwrap()
}

fn order_id() -> entisql::entity::AttributeDefinition {
    EntitySet::<Order>::new(provider())
        .unwrap()
        .resolve_attribute(&Order::ID)
        .unwrap()
}

#[test]
fn test_filter_arity_checked() {
    let result = ValueFilter::new(order_id(), FilterType::Between, vec![Value::Int(1)]);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));

    let result = ValueFilter::new(order_id(), FilterType::IsNull, vec![Value::Int(1)]);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));

    let filter = ValueFilter::new(order_id(), FilterType::MatchesSet, vec![Value::Int(1)]).unwrap();
    assert_eq!(filter.filter_type(), FilterType::MatchesSet);
}

#[test]
fn test_between_normalizes_bounds() {
    let filter = ValueFilter::new(
        order_id(),
        FilterType::Between,
        vec![Value::Int(9), Value::Int(3)],
    )
    .unwrap();
    assert_eq!(
        filter.comparison(),
        &Comparison::Between {
            low: Value::Int(3),
            high: Value::Int(9)
        }
    );

    let filter = ValueFilter::between(order_id(), Value::Int(4), Value::Int(4)).unwrap();
    assert_eq!(filter.filter_type(), FilterType::Equality);
}

#[test]
fn test_between_renders_low_then_high() {
    let a = Order::sample(1, 1, 250.0);
    let b = Order::sample(1, 1, 100.0);
    let selection = orders()
        .between(&a, &b, &[&Order::TOTAL])
        .unwrap()
        .select(&[&Order::ID])
        .unwrap();

    let stmt = compact(Dialect::TSql)
        .create_selection_statement(&selection)
        .unwrap();
    assert!(stmt
        .text
        .ends_with("WHERE [dbo].[Order].[OrderTotal] BETWEEN @0 AND @1"));
    assert_eq!(stmt.parameters, vec![Value::Float(100.0), Value::Float(250.0)]);
}

#[test]
fn test_null_operands_bind_nothing() {
    let example = Order::sample(1, 1, 1.0);
    let selection = orders()
        .matching(&example, &[&Order::NOTE])
        .unwrap()
        .where_not_equal(&Order::NOTE, Value::Null)
        .unwrap()
        .where_equal(&Order::STATUS, 2)
        .unwrap()
        .select(&[&Order::ID])
        .unwrap();

    let stmt = compact(Dialect::TSql)
        .create_selection_statement(&selection)
        .unwrap();
    assert!(stmt.text.ends_with(
        "WHERE [dbo].[Order].[Note] IS NULL AND [dbo].[Order].[Note] IS NOT NULL AND [dbo].[Order].[Status] = @0"
    ));
    assert_eq!(stmt.parameters, vec![Value::Int(2)]);
}

#[test]
fn test_set_filters_drop_nulls() {
    let selection = orders()
        .include(&Order::STATUS, vec![Value::Int(1), Value::Null, Value::Int(3)])
        .unwrap()
        .select(&[&Order::ID])
        .unwrap();
    let stmt = compact(Dialect::TSql)
        .create_selection_statement(&selection)
        .unwrap();
    assert!(stmt.text.ends_with("[dbo].[Order].[Status] IN (@0, @1)"));

    let result = orders().exclude(&Order::STATUS, vec![Value::Null]);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_ordering_against_null_rejected() {
    let result = orders().where_less_than(&Order::TOTAL, Value::Null);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_select_round_trip() {
    let full = orders();
    let narrowed = orders().select(&[&Order::TOTAL, &Order::ID]).unwrap();
    assert_eq!(narrowed.properties_to_return().len(), 2);

    let restored = narrowed.select(&[]).unwrap();
    assert_eq!(
        restored.properties_to_return(),
        full.properties_to_return()
    );
}

#[test]
fn test_builders_do_not_share_state() {
    let base = orders().where_equal(&Order::STATUS, 1).unwrap();
    let narrowed = base.clone().where_equal(&Order::CUSTOMER_ID, 7).unwrap();

    assert_eq!(base.filters().len(), 1);
    assert_eq!(narrowed.filters().len(), 2);
}
