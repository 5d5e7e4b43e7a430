//! Entity fixtures shared by the integration tests.

#![allow(dead_code)]

use entisql::entity::{
    AnnotationDefinitionProvider, DefinitionProvider, Entity, EntityDefinition, EntityLocation,
    Field,
};
use entisql::sql::{Dialect, RepositoryAdapter};

pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub total: f64,
    pub note: Option<String>,
    pub status: i64,
    pub customer_name: String,
}

impl Entity for Order {
    fn definition() -> EntityDefinition {
        EntityDefinition::builder("dbo", "Order")
            .identity_key("Id")
            .column("CustomerId")
            .mapped("Total", "OrderTotal")
            .column("Note")
            .column("Status")
            .related(
                "CustomerName",
                EntityLocation::new("dbo", "Customer"),
                "Name",
            )
            .build()
    }
}

impl Order {
    pub const ID: Field<Order, i64> = Field::new("Id", |o: &Order| o.id);
    pub const CUSTOMER_ID: Field<Order, i64> = Field::new("CustomerId", |o: &Order| o.customer_id);
    pub const TOTAL: Field<Order, f64> = Field::new("Total", |o: &Order| o.total);
    pub const NOTE: Field<Order, Option<String>> = Field::new("Note", |o: &Order| o.note.clone());
    pub const STATUS: Field<Order, i64> = Field::new("Status", |o: &Order| o.status);
    pub const CUSTOMER_NAME: Field<Order, String> =
        Field::new("CustomerName", |o: &Order| o.customer_name.clone());

    pub fn sample(id: i64, customer_id: i64, total: f64) -> Self {
        Self {
            id,
            customer_id,
            total,
            note: None,
            status: 1,
            customer_name: String::new(),
        }
    }
}

pub struct Customer {
    pub id: i64,
    pub name: String,
}

impl Entity for Customer {
    fn definition() -> EntityDefinition {
        EntityDefinition::builder("dbo", "Customer")
            .identity_key("Id")
            .column("Name")
            .build()
    }
}

impl Customer {
    pub const ID: Field<Customer, i64> = Field::new("Id", |c: &Customer| c.id);
    pub const NAME: Field<Customer, String> = Field::new("Name", |c: &Customer| c.name.clone());
}

/// Entity without any primary key.
pub struct EventLog {
    pub message: String,
}

impl Entity for EventLog {
    fn definition() -> EntityDefinition {
        EntityDefinition::builder("log", "Event").column("Message").build()
    }
}

impl EventLog {
    pub const MESSAGE: Field<EventLog, String> =
        Field::new("Message", |e: &EventLog| e.message.clone());
}

pub fn provider() -> DefinitionProvider {
    AnnotationDefinitionProvider::shared()
}

/// Adapter rendering on one line, for exact string comparisons.
pub fn compact(dialect: Dialect) -> RepositoryAdapter {
    RepositoryAdapter::new(dialect, provider()).compact()
}

/// Adapter rendering indented lines, for snapshots.
pub fn indented(dialect: Dialect) -> RepositoryAdapter {
    RepositoryAdapter::new(dialect, provider())
}
