//! Recursive compilation of filter expression trees into predicates.
//!
//! Node shape is enforced by the typed `FilterExpr` tree, so malformed input
//! is rejected at the JSON boundary (`FilterExpr::from_json`) before it
//! reaches this module. Compilation itself can still fail on unknown columns
//! and operator/criteria mismatches.

use crate::ast::expr::{FilterClause, FilterExpr};
use crate::ast::operators::LogicalOp;
use crate::ast::predicate::Predicate;
use crate::catalog::TableBinding;
use crate::error::QuarryResult;
use crate::registry;

/// Compile an expression tree against the bound table.
///
/// Combinations compile to nested AND/OR predicates; nesting is preserved,
/// not flattened. An empty combination compiles to the combinator's identity
/// (AND of nothing is always true, OR of nothing is always false).
pub fn compile(expr: FilterExpr, binding: &TableBinding) -> QuarryResult<Predicate> {
    match expr {
        FilterExpr::Leaf(clause) => compile_clause(clause, binding),
        FilterExpr::Combination {
            operator,
            expressions,
        } => {
            let parts = expressions
                .into_iter()
                .map(|e| compile(e, binding))
                .collect::<QuarryResult<Vec<_>>>()?;
            Ok(match operator {
                LogicalOp::And => Predicate::And(parts),
                LogicalOp::Or => Predicate::Or(parts),
            })
        }
    }
}

/// Compile a single clause: resolve the column, then dispatch the operator.
pub fn compile_clause(clause: FilterClause, binding: &TableBinding) -> QuarryResult<Predicate> {
    let column = binding.column(&clause.field)?;
    registry::build_predicate(column, clause.operator, clause.value)
}
