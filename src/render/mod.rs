//! SQL rendering of accumulated query state.
//!
//! The builder side stays dialect-free; this module turns its structured
//! state into SQL text through a [`Dialect`]-selected generator.

pub mod dialect;
pub mod predicate;
pub mod sql;
pub mod traits;

pub use dialect::Dialect;
pub use predicate::predicate_to_sql;
pub use traits::{escape_identifier, SqlGenerator};

use crate::ast::predicate::Predicate;
use crate::builder::{QueryBuilder, SelectExpr};

/// Trait for rendering a node to SQL.
pub trait ToSql {
    /// Render using the default dialect.
    fn to_sql(&self) -> String {
        self.to_sql_with_dialect(Dialect::default())
    }
    /// Render with a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> String;
}

impl ToSql for QueryBuilder {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> String {
        build_select(self, dialect)
    }
}

impl ToSql for Predicate {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> String {
        predicate_to_sql(self, dialect.generator().as_ref())
    }
}

/// Render the accumulated state as one SELECT statement.
pub fn build_select(builder: &QueryBuilder, dialect: Dialect) -> String {
    let generator = dialect.generator();
    let state = builder.state();

    let mut sql = String::from("SELECT ");

    // No explicit selection means all columns.
    if state.selected.is_empty() {
        sql.push('*');
    } else {
        let cols: Vec<String> = state.selected.iter().map(render_select_expr).collect();
        sql.push_str(&cols.join(", "));
    }

    sql.push_str(" FROM ");
    sql.push_str(&escape_identifier(&builder.binding().qualified_name()));

    if let Some(predicate) = &state.where_predicate {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate_to_sql(predicate, generator.as_ref()));
    }

    if !state.group_by.is_empty() {
        let cols: Vec<String> = state
            .group_by
            .iter()
            .map(|c| escape_identifier(&c.to_string()))
            .collect();
        sql.push_str(" GROUP BY ");
        sql.push_str(&cols.join(", "));
    }

    if !state.order_by.is_empty() {
        // Order columns were never resolved, so their text goes out as-is.
        let terms: Vec<String> = state
            .order_by
            .iter()
            .map(|t| format!("{} {}", t.column, t.direction.sql_keyword()))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&terms.join(", "));
    }

    if let Some(limit) = state.limit {
        sql.push_str(&generator.limit(limit));
    }

    sql
}

fn render_select_expr(expr: &SelectExpr) -> String {
    match expr {
        SelectExpr::Column { name, alias } => {
            let col = escape_identifier(name);
            match alias {
                Some(alias) => format!("{} AS {}", col, escape_identifier(alias)),
                None => col,
            }
        }
        SelectExpr::Aggregate {
            func,
            column,
            alias,
        } => {
            let col = if column == "*" {
                "*".to_string()
            } else {
                escape_identifier(column)
            };
            let agg = format!("{}({})", func, col);
            match alias {
                Some(alias) => format!("{} AS {}", agg, escape_identifier(alias)),
                None => agg,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::operators::AggregateFunc;

    #[test]
    fn test_select_expr_rendering() {
        assert_eq!(render_select_expr(&SelectExpr::column("name")), "name");
        assert_eq!(
            render_select_expr(&SelectExpr::Column {
                name: "name".to_string(),
                alias: Some("site_name".to_string()),
            }),
            "name AS site_name"
        );
        assert_eq!(
            render_select_expr(&SelectExpr::Aggregate {
                func: AggregateFunc::Count,
                column: "id".to_string(),
                alias: Some("total".to_string()),
            }),
            "count(id) AS total"
        );
        assert_eq!(
            render_select_expr(&SelectExpr::Aggregate {
                func: AggregateFunc::Count,
                column: "*".to_string(),
                alias: None,
            }),
            "count(*)"
        );
        assert_eq!(
            render_select_expr(&SelectExpr::Aggregate {
                func: AggregateFunc::Avg,
                column: "value".to_string(),
                alias: None,
            }),
            "avg(value)"
        );
    }
}
