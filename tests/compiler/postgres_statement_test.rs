#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{compact, indented, provider, Customer, Order};
    use entisql::entity::Value;
    use entisql::model::{EntitySet, EntitySetBuilder, ItemSelection, UpdateSet};
    use entisql::{Dialect, Error};
    use insta::assert_snapshot;

    fn orders() -> ItemSelection<Order> {
        ItemSelection::new(provider()).unwrap()
    }

    #[test]
    fn test_numbered_placeholders() {
        let selection = orders()
            .select(&[&Order::ID])
            .unwrap()
            .where_equal(&Order::CUSTOMER_ID, 42)
            .unwrap()
            .where_greater_than_or_equal(&Order::TOTAL, 10.5)
            .unwrap();

        let stmt = compact(Dialect::Postgres)
            .create_selection_statement(&selection)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT \"dbo\".\"Order\".\"Id\" FROM \"dbo\".\"Order\" \
             WHERE \"dbo\".\"Order\".\"CustomerId\" = $1 AND \"dbo\".\"Order\".\"OrderTotal\" >= $2"
        );
        assert_eq!(stmt.parameters, vec![Value::Int(42), Value::Float(10.5)]);
    }

    #[test]
    fn test_limit_trails_statement() {
        let selection = orders()
            .select(&[&Order::ID])
            .unwrap()
            .order_by_descending(&Order::ID)
            .unwrap()
            .limit(3);

        let stmt = compact(Dialect::Postgres)
            .create_selection_statement(&selection)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT \"dbo\".\"Order\".\"Id\" FROM \"dbo\".\"Order\" ORDER BY \"dbo\".\"Order\".\"Id\" DESC LIMIT 3"
        );
    }

    #[test]
    fn test_paging_without_order() {
        let selection = orders().select(&[&Order::ID]).unwrap().page(2, 15).unwrap();

        let stmt = compact(Dialect::Postgres)
            .create_selection_statement(&selection)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT \"dbo\".\"Order\".\"Id\" FROM \"dbo\".\"Order\" OFFSET $1 LIMIT $2"
        );
        assert_eq!(stmt.parameters, vec![Value::Int(15), Value::Int(15)]);
    }

    #[test]
    fn test_paged_join() {
        let selection = orders()
            .inner_join(&Order::CUSTOMER_ID, &Customer::ID)
            .unwrap()
            .where_equal(&Customer::NAME, "Ada")
            .unwrap()
            .select(&[&Order::ID])
            .unwrap()
            .page(1, 10)
            .unwrap();

        let stmt = indented(Dialect::Postgres)
            .create_selection_statement(&selection)
            .unwrap();
        assert_snapshot!(stmt.text, @r#"
        WITH "Order_page_keys" AS (
          SELECT
            "Order_page"."Id"
          FROM "dbo"."Order" AS "Order_page"
            INNER JOIN "dbo"."Customer" AS "Customer_page" ON "Order_page"."CustomerId" = "Customer_page"."Id"
          WHERE "Customer_page"."Name" LIKE $1
          OFFSET $2 LIMIT $3
        )
        SELECT
          "dbo"."Order"."Id"
        FROM "dbo"."Order"
          INNER JOIN "dbo"."Customer" ON "dbo"."Order"."CustomerId" = "dbo"."Customer"."Id"
        WHERE EXISTS (SELECT 1 FROM "Order_page_keys" WHERE "Order_page_keys"."Id" = "dbo"."Order"."Id")
        "#);
        assert_eq!(
            stmt.parameters,
            vec![Value::Text("Ada".into()), Value::Int(0), Value::Int(10)]
        );
    }

    #[test]
    fn test_exists() {
        let set = EntitySet::<Order>::new(provider())
            .unwrap()
            .where_not_null(&Order::NOTE)
            .unwrap();

        let stmt = compact(Dialect::Postgres)
            .create_exists_statement(&set)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT EXISTS (SELECT 1 FROM \"dbo\".\"Order\" WHERE \"dbo\".\"Order\".\"Note\" IS NOT NULL)"
        );
        assert!(stmt.parameters.is_empty());
    }

    #[test]
    fn test_insert_returning() {
        let stmt = compact(Dialect::Postgres)
            .create_insertion_statement::<Order>()
            .unwrap();
        assert_eq!(
            stmt.text,
            "INSERT INTO \"dbo\".\"Order\" (\"CustomerId\", \"OrderTotal\", \"Note\", \"Status\") \
             VALUES ($1, $2, $3, $4) RETURNING \"Id\""
        );
    }

    #[test]
    fn test_joined_update_not_supported() {
        let set = UpdateSet::<Order>::new(provider())
            .unwrap()
            .set(&Order::STATUS, 1)
            .unwrap()
            .inner_join(&Order::CUSTOMER_ID, &Customer::ID)
            .unwrap();

        let result = compact(Dialect::Postgres).create_update_statement(&set);
        match result {
            Err(Error::NotSupported { dialect, .. }) => assert_eq!(dialect, "postgres"),
            other => panic!("expected NotSupported, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_update_and_delete() {
        let set = UpdateSet::<Order>::new(provider())
            .unwrap()
            .set(&Order::NOTE, Value::Null)
            .unwrap()
            .where_equal(&Order::ID, 3)
            .unwrap();
        let stmt = compact(Dialect::Postgres)
            .create_update_statement(&set)
            .unwrap();
        assert_eq!(
            stmt.text,
            "UPDATE \"dbo\".\"Order\" SET \"Note\" = NULL WHERE \"dbo\".\"Order\".\"Id\" = $1"
        );

        let set = EntitySet::<Order>::new(provider())
            .unwrap()
            .include(&Order::STATUS, vec![1i64, 2])
            .unwrap();
        let stmt = compact(Dialect::Postgres)
            .create_deletion_statement(&set)
            .unwrap();
        assert_eq!(
            stmt.text,
            "DELETE FROM \"dbo\".\"Order\" WHERE \"dbo\".\"Order\".\"Status\" IN ($1, $2)"
        );
    }

    #[test]
    fn test_created_parameter_names_match_statement() {
        let selection = orders()
            .where_equal(&Order::CUSTOMER_ID, 7)
            .unwrap()
            .where_equal(&Order::STATUS, 2)
            .unwrap();
        let adapter = compact(Dialect::Postgres);
        let stmt = adapter.create_selection_statement(&selection).unwrap();

        for (index, value) in stmt.parameters.iter().enumerate() {
            let parameter = adapter.create_parameter(&index.to_string(), value);
            assert!(stmt.text.contains(&parameter.name));
            assert_eq!(parameter.name, adapter.bind_parameters(&stmt)[index].name);
        }
    }

    #[test]
    fn test_parameter_names() {
        let adapter = compact(Dialect::Postgres);
        assert_eq!(adapter.parameter_name(0), "$1");
        assert_eq!(adapter.add_prefix("0"), adapter.parameter_name(0));
        assert_eq!(adapter.add_prefix("@0"), "$1");
        assert_eq!(adapter.add_prefix("$2"), "$2");
        assert_eq!(adapter.create_parameter("$2", &Value::Bool(true)).name, "$2");
    }
}
