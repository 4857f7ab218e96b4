//! Operator dispatch: turns (column, operator, criteria) into a predicate.
//!
//! Most operators produce structured predicates that the render layer quotes
//! and escapes. `<=`, `>=`, `between`, `array_contains` and
//! `array_not_contains` instead produce raw fragments with the criteria text
//! embedded between single quotes, unescaped. Callers must sanitize criteria
//! for those operators before passing them in.

use crate::ast::operators::{CompareOp, FilterOp};
use crate::ast::predicate::{ColumnRef, Predicate};
use crate::ast::values::Value;
use crate::error::{QuarryError, QuarryResult};

/// Look up an operator by its symbol.
pub fn resolve(symbol: &str) -> QuarryResult<FilterOp> {
    FilterOp::from_symbol(symbol)
}

/// Build the predicate for one filter clause.
pub fn build_predicate(
    column: ColumnRef,
    operator: FilterOp,
    value: Option<Value>,
) -> QuarryResult<Predicate> {
    let predicate = match operator {
        FilterOp::In => Predicate::InList {
            column,
            values: list_values("in", value)?,
            negated: false,
        },
        FilterOp::NotIn => Predicate::InList {
            column,
            values: list_values("not_in", value)?,
            negated: true,
        },
        FilterOp::Between => {
            let values = list_values("between", value)?;
            if values.len() < 2 {
                return Err(QuarryError::invalid_value(
                    "between",
                    "expected a two-element array",
                ));
            }
            // Bounds stay in caller order; no low/high normalization.
            Predicate::Raw(format!(
                "{} BETWEEN '{}' AND '{}'",
                column,
                values[0].raw_text(),
                values[1].raw_text()
            ))
        }
        FilterOp::IsNull => Predicate::Null {
            column,
            negated: false,
        },
        FilterOp::IsNotNull => Predicate::Null {
            column,
            negated: true,
        },
        FilterOp::Eq => compare(column, CompareOp::Eq, value),
        FilterOp::Ne => compare(column, CompareOp::Ne, value),
        FilterOp::Lt => compare(column, CompareOp::Lt, value),
        FilterOp::Gt => compare(column, CompareOp::Gt, value),
        FilterOp::Lte => Predicate::Raw(format!("{} <= '{}'", column, raw_criteria(value))),
        FilterOp::Gte => Predicate::Raw(format!("{} >= '{}'", column, raw_criteria(value))),
        FilterOp::ArrayContains => Predicate::Raw(format!(
            "ARRAY_CONTAINS({}, '{}')",
            column,
            raw_criteria(value)
        )),
        FilterOp::ArrayNotContains => Predicate::Raw(format!(
            "NOT ARRAY_CONTAINS({}, '{}')",
            column,
            raw_criteria(value)
        )),
    };
    Ok(predicate)
}

fn compare(column: ColumnRef, op: CompareOp, value: Option<Value>) -> Predicate {
    let value = value.unwrap_or(Value::Null);
    // Equality against NULL is a null test; `= NULL` would match no rows.
    // Ordered comparisons keep the literal NULL.
    match (op, &value) {
        (CompareOp::Eq, Value::Null) => Predicate::Null {
            column,
            negated: false,
        },
        (CompareOp::Ne, Value::Null) => Predicate::Null {
            column,
            negated: true,
        },
        _ => Predicate::Compare { column, op, value },
    }
}

fn raw_criteria(value: Option<Value>) -> String {
    value.unwrap_or(Value::Null).raw_text()
}

fn list_values(operator: &'static str, value: Option<Value>) -> QuarryResult<Vec<Value>> {
    match value {
        Some(Value::Array(values)) => Ok(values),
        Some(other) => Err(QuarryError::invalid_value(
            operator,
            format!("expected an array, got {}", other),
        )),
        None => Err(QuarryError::invalid_value(
            operator,
            "expected an array, got nothing",
        )),
    }
}
