//! Query data model: operators, criteria values, filter expressions, and the
//! compiled predicate tree.

pub mod builders;
pub mod expr;
pub mod operators;
pub mod predicate;
pub mod values;

pub use expr::{FilterClause, FilterExpr};
pub use operators::{AggregateFunc, CompareOp, FilterOp, LogicalOp, SortOrder};
pub use predicate::{ColumnRef, Predicate};
pub use values::Value;
