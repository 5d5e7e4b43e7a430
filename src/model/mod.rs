//! Query model.
//!
//! Immutable-intent builders describing what a statement should do. The
//! statement compiler in [`crate::sql`] renders them without mutating them.

mod filter;
mod relation;
mod selection;
mod update;

pub use filter::{Comparison, FilterType, ValueFilter};
pub use relation::{EntityRelation, EntityRelationType};
pub use selection::{
    AggregateFunction, EntitySet, EntitySetBuilder, ItemSelection, LinkedSelection,
    OrderExpression, Page, SelectExpression, SelectionLinkType,
};
pub use update::UpdateSet;
