//! Shorthand constructors for filter clauses.
//!
//! These build the typed clauses accepted by `or_where`/`and_where` without
//! spelling out operator symbols:
//!
//! ```ignore
//! builder.or_where(vec![eq("status", "open"), gt("age", 30)])?;
//! ```

use crate::ast::expr::FilterClause;
use crate::ast::operators::FilterOp;
use crate::ast::values::Value;

fn clause(field: impl Into<String>, operator: FilterOp, value: Option<Value>) -> FilterClause {
    FilterClause::new(field, operator, value)
}

pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::Eq, Some(value.into()))
}

pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::Ne, Some(value.into()))
}

pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::Lt, Some(value.into()))
}

pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::Lte, Some(value.into()))
}

pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::Gt, Some(value.into()))
}

pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::Gte, Some(value.into()))
}

/// Range check. The bounds are kept in the given order, low first as written.
pub fn between(
    field: impl Into<String>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> FilterClause {
    clause(
        field,
        FilterOp::Between,
        Some(Value::Array(vec![low.into(), high.into()])),
    )
}

pub fn in_list(
    field: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<Value>>,
) -> FilterClause {
    clause(
        field,
        FilterOp::In,
        Some(Value::Array(values.into_iter().map(Into::into).collect())),
    )
}

pub fn not_in(
    field: impl Into<String>,
    values: impl IntoIterator<Item = impl Into<Value>>,
) -> FilterClause {
    clause(
        field,
        FilterOp::NotIn,
        Some(Value::Array(values.into_iter().map(Into::into).collect())),
    )
}

pub fn is_null(field: impl Into<String>) -> FilterClause {
    clause(field, FilterOp::IsNull, None)
}

pub fn is_not_null(field: impl Into<String>) -> FilterClause {
    clause(field, FilterOp::IsNotNull, None)
}

pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::ArrayContains, Some(value.into()))
}

pub fn array_not_contains(field: impl Into<String>, value: impl Into<Value>) -> FilterClause {
    clause(field, FilterOp::ArrayNotContains, Some(value.into()))
}
