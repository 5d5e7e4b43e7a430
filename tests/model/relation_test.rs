#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{compact, provider, Customer, Order};
    use entisql::entity::Field;
    use entisql::model::{EntityRelation, EntityRelationType, EntitySetBuilder, ItemSelection};
    use entisql::{Dialect, Error};

    fn orders() -> ItemSelection<Order> {
        ItemSelection::new(provider()).unwrap()
    }

    #[test]
    fn test_relation_equality_is_structural() {
        let provider = provider();
        let a = EntityRelation::join(
            provider.as_ref(),
            EntityRelationType::InnerJoin,
            &Order::CUSTOMER_ID,
            &Customer::ID,
            None,
            None,
        )
        .unwrap();
        let b = EntityRelation::join(
            provider.as_ref(),
            EntityRelationType::InnerJoin,
            &Order::CUSTOMER_ID,
            &Customer::ID,
            None,
            None,
        )
        .unwrap();
        let left = EntityRelation::join(
            provider.as_ref(),
            EntityRelationType::LeftJoin,
            &Order::CUSTOMER_ID,
            &Customer::ID,
            None,
            None,
        )
        .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, left);
    }

    #[test]
    fn test_repeated_join_renders_once() {
        let selection = orders()
            .inner_join(&Order::CUSTOMER_ID, &Customer::ID)
            .unwrap()
            .inner_join(&Order::CUSTOMER_ID, &Customer::ID)
            .unwrap()
            .select(&[&Order::ID])
            .unwrap();

        let stmt = compact(Dialect::TSql)
            .create_selection_statement(&selection)
            .unwrap();
        assert_eq!(stmt.text.matches("JOIN").count(), 1);
    }

    #[test]
    fn test_same_table_twice_under_aliases() {
        let selection = orders()
            .inner_join_as(&Order::CUSTOMER_ID, &Customer::ID, "buyer")
            .unwrap()
            .left_join_as(&Order::CUSTOMER_ID, &Customer::ID, "payer")
            .unwrap()
            .select(&[&Order::ID])
            .unwrap();

        let stmt = compact(Dialect::TSql)
            .create_selection_statement(&selection)
            .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT [dbo].[Order].[Id] FROM [dbo].[Order] \
             INNER JOIN [dbo].[Customer] AS [buyer] ON [dbo].[Order].[CustomerId] = [buyer].[Id] \
             LEFT JOIN [dbo].[Customer] AS [payer] ON [dbo].[Order].[CustomerId] = [payer].[Id]"
        );
    }

    #[test]
    fn test_filter_through_join_alias() {
        let selection = orders()
            .inner_join_as(&Order::CUSTOMER_ID, &Customer::ID, "cust")
            .unwrap()
            .where_equal(&Customer::NAME.with_alias("cust"), "Ada")
            .unwrap()
            .select(&[&Order::ID])
            .unwrap();

        let stmt = compact(Dialect::Postgres)
            .create_selection_statement(&selection)
            .unwrap();
        assert!(stmt.text.ends_with("WHERE \"cust\".\"Name\" LIKE $1"));
    }

    #[test]
    fn test_unknown_property_fails_join() {
        const MISSING: Field<Customer, i64> = Field::new("Missing", |c: &Customer| c.id);

        let result = orders().inner_join(&Order::CUSTOMER_ID, &MISSING);
        assert!(matches!(result, Err(Error::InvalidRelation { .. })));
    }
}
