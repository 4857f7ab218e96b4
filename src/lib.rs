//! Table-scoped SQL query builder with a typed filter language.
//!
//! Bind to a table, chain filters, render SQL. Filters arrive either as
//! fluent calls or as JSON expression trees compiled against the table's
//! schema.
//!
//! ```ignore
//! use quarry::prelude::*;
//!
//! let mut qb = QueryBuilder::new(&catalog, "public", "sites")?;
//! qb.select(["id", "name"])?
//!     .filter("name", "=", "test")?
//!     .order_by("name", "asc")?
//!     .limit(10)?;
//! assert_eq!(
//!     qb.to_sql(),
//!     "SELECT id, name FROM public.sites WHERE sites.name = 'test' ORDER BY name ASC LIMIT 10"
//! );
//! ```

pub mod ast;
pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod registry;
pub mod render;

pub use builder::QueryBuilder;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::{FilterClause, FilterExpr, FilterOp, Value};
    pub use crate::builder::{BaseFilters, LocationFilters, QueryBuilder};
    pub use crate::catalog::{Schema, TableDef, TableSource};
    pub use crate::error::{QuarryError, QuarryResult};
    pub use crate::render::{Dialect, ToSql};
}
