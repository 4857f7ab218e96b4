use serde::{Deserialize, Serialize};

use crate::ast::operators::CompareOp;
use crate::ast::values::Value;

/// A column reference, optionally qualified by its table.
///
/// Bound columns carry the table name so predicates render qualified
/// (`sites.name`); unbound references render the bare column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn bare(name: impl Into<String>) -> Self {
        ColumnRef {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        ColumnRef {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A compiled filter condition, ready for rendering.
///
/// Structured variants are rendered by the active dialect; `Raw` carries a
/// fragment whose text was fixed when the predicate was built and is emitted
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// `column <op> value`
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    /// `column [NOT] IN (v1, v2, ...)`
    InList {
        column: ColumnRef,
        values: Vec<Value>,
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    Null { column: ColumnRef, negated: bool },
    /// `arrays_overlap(column, array(v1, v2, ...))`
    ArrayOverlaps {
        column: ColumnRef,
        values: Vec<Value>,
    },
    /// A pre-rendered fragment, emitted as-is.
    Raw(String),
    /// Conjunction of the parts. Empty renders as `TRUE`.
    And(Vec<Predicate>),
    /// Disjunction of the parts. Empty renders as `FALSE`.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// True for a combination with no parts.
    ///
    /// Empty combinations contribute nothing when merged into a WHERE
    /// accumulator; rendered standalone they fall back to the combinator
    /// identity (`TRUE` for AND, `FALSE` for OR).
    pub fn is_empty(&self) -> bool {
        match self {
            Predicate::And(parts) | Predicate::Or(parts) => parts.is_empty(),
            _ => false,
        }
    }
}
