#[path = "../common/mod.rs"]
mod common;

use common::{compact, indented, provider, Customer, EventLog, Order};
use entisql::entity::Value;
use entisql::model::{EntitySet, EntitySetBuilder, UpdateSet};
use entisql::sql::ParameterType;
use entisql::{Dialect, Error};
use insta::assert_snapshot;

fn update() -> UpdateSet<Order> {
    UpdateSet::new(provider()).unwrap()
}

// ----------------------------------------------------------------------------
// INSERT
// ----------------------------------------------------------------------------

#[test]
fn insert_captures_identity() {
    let stmt = indented(Dialect::TSql)
        .create_insertion_statement::<Order>()
        .unwrap();
    assert_snapshot!(stmt.text, @r"
    INSERT INTO [dbo].[Order] ([CustomerId], [OrderTotal], [Note], [Status])
    VALUES (@0, @1, @2, @3);
    SELECT SCOPE_IDENTITY()
    ");
    assert!(stmt.parameters.is_empty());
}

#[test]
fn insert_values_bind_in_column_order() {
    let adapter = compact(Dialect::TSql);
    let mut order = Order::sample(0, 12, 99.5);
    order.note = Some("fragile".into());

    let values = adapter
        .insertion_values(
            &order,
            &[
                &Order::STATUS,
                &Order::NOTE,
                &Order::TOTAL,
                &Order::CUSTOMER_ID,
                &Order::ID,
            ],
        )
        .unwrap();
    assert_eq!(
        values,
        vec![
            Value::Int(12),
            Value::Float(99.5),
            Value::Text("fragile".into()),
            Value::Int(1)
        ]
    );
}

#[test]
fn insert_keyless_entity_has_no_capture() {
    let stmt = compact(Dialect::TSql)
        .create_insertion_statement::<EventLog>()
        .unwrap();
    assert_eq!(stmt.text, "INSERT INTO [log].[Event] ([Message]) VALUES (@0)");
}

// ----------------------------------------------------------------------------
// UPDATE
// ----------------------------------------------------------------------------

#[test]
fn update_set_then_where_parameter_order() {
    let set = update()
        .set(&Order::STATUS, 4)
        .unwrap()
        .set(&Order::NOTE, "late")
        .unwrap()
        .where_equal(&Order::CUSTOMER_ID, 12)
        .unwrap()
        .where_less_than(&Order::TOTAL, 10)
        .unwrap();

    let stmt = indented(Dialect::TSql)
        .create_update_statement(&set)
        .unwrap();
    assert_snapshot!(stmt.text, @r"
    UPDATE [dbo].[Order]
    SET
      [Status] = @0,
      [Note] = @1
    WHERE [dbo].[Order].[CustomerId] = @2
      AND [dbo].[Order].[OrderTotal] < @3
    ");
    assert_eq!(
        stmt.parameters,
        vec![
            Value::Int(4),
            Value::Text("late".into()),
            Value::Int(12),
            Value::Int(10)
        ]
    );
}

#[test]
fn update_from_example_skips_generated_columns() {
    let mut order = Order::sample(5, 3, 20.0);
    order.status = 2;

    let set = update()
        .set_from(&order, &[&Order::ID, &Order::STATUS, &Order::CUSTOMER_NAME])
        .unwrap()
        .where_equal(&Order::ID, 5)
        .unwrap();

    let stmt = compact(Dialect::TSql)
        .create_update_statement(&set)
        .unwrap();
    assert_eq!(
        stmt.text,
        "UPDATE [dbo].[Order] SET [Status] = @0 WHERE [dbo].[Order].[Id] = @1"
    );
    assert_eq!(stmt.parameters, vec![Value::Int(2), Value::Int(5)]);
}

#[test]
fn update_reassignment_keeps_last_value() {
    let set = update()
        .set(&Order::STATUS, 1)
        .unwrap()
        .set(&Order::STATUS, 2)
        .unwrap();

    let stmt = compact(Dialect::TSql)
        .create_update_statement(&set)
        .unwrap();
    assert_eq!(stmt.text, "UPDATE [dbo].[Order] SET [Status] = @0");
    assert_eq!(stmt.parameters, vec![Value::Int(2)]);
}

#[test]
fn update_with_only_key_assignment_fails() {
    let result = compact(Dialect::TSql).create_update_statement(&update().set(&Order::ID, 1).unwrap());
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn update_through_join_tsql() {
    let set = update()
        .set(&Order::STATUS, 9)
        .unwrap()
        .inner_join_as(&Order::CUSTOMER_ID, &Customer::ID, "cust")
        .unwrap()
        .where_equal(&Customer::NAME.with_alias("cust"), "Ada")
        .unwrap();

    let stmt = compact(Dialect::TSql)
        .create_update_statement(&set)
        .unwrap();
    assert_eq!(
        stmt.text,
        "UPDATE [dbo].[Order] SET [Status] = @0 FROM [dbo].[Order] \
         INNER JOIN [dbo].[Customer] AS [cust] ON [dbo].[Order].[CustomerId] = [cust].[Id] \
         WHERE [cust].[Name] LIKE @1"
    );
}

// ----------------------------------------------------------------------------
// DELETE
// ----------------------------------------------------------------------------

#[test]
fn delete_with_between() {
    let set = EntitySet::<Order>::new(provider())
        .unwrap()
        .where_between(&Order::TOTAL, 500, 100)
        .unwrap();

    let stmt = compact(Dialect::TSql)
        .create_deletion_statement(&set)
        .unwrap();
    assert_eq!(
        stmt.text,
        "DELETE FROM [dbo].[Order] WHERE [dbo].[Order].[OrderTotal] BETWEEN @0 AND @1"
    );
    assert_eq!(stmt.parameters, vec![Value::Int(100), Value::Int(500)]);
}

#[test]
fn delete_through_join_tsql() {
    let set = EntitySet::<Order>::new(provider())
        .unwrap()
        .inner_join(&Order::CUSTOMER_ID, &Customer::ID)
        .unwrap()
        .where_null(&Customer::NAME)
        .unwrap();

    let stmt = indented(Dialect::TSql)
        .create_deletion_statement(&set)
        .unwrap();
    assert_snapshot!(stmt.text, @r"
    DELETE [dbo].[Order]
    FROM [dbo].[Order]
      INNER JOIN [dbo].[Customer] ON [dbo].[Order].[CustomerId] = [dbo].[Customer].[Id]
    WHERE [dbo].[Customer].[Name] IS NULL
    ");
}

// ----------------------------------------------------------------------------
// Parameter coercion
// ----------------------------------------------------------------------------

#[test]
fn bound_parameters_carry_types() {
    let adapter = compact(Dialect::TSql);
    let id = uuid::Uuid::from_u128(0x6f1c_2b0e_4d7a_4c3b_9a51_0e8f_27d4_b6a3);
    let set = EntitySet::<Order>::new(provider())
        .unwrap()
        .where_equal(&Order::NOTE, id)
        .unwrap()
        .where_equal(&Order::STATUS, Value::enumeration(2))
        .unwrap();

    let stmt = adapter.create_deletion_statement(&set).unwrap();
    let bound = adapter.bind_parameters(&stmt);

    assert_eq!(bound[0].name, "@0");
    assert_eq!(bound[0].parameter_type, ParameterType::AnsiStringFixedLength);
    assert_eq!(bound[0].size, Some(36));
    assert_eq!(bound[0].value, Value::AnsiText(id.hyphenated().to_string()));

    assert_eq!(bound[1].name, "@1");
    assert_eq!(bound[1].parameter_type, ParameterType::Int64);
    assert_eq!(bound[1].value, Value::Int(2));
}
