use crate::error::{QuarryError, QuarryResult};
use serde::{Deserialize, Serialize};

/// Filter operator. The closed set of symbols accepted by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    In,
    NotIn,
    Between,
    IsNull,
    IsNotNull,
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    ArrayContains,
    ArrayNotContains,
}

impl FilterOp {
    /// Resolve an operator symbol. Fails for anything outside the fixed set.
    pub fn from_symbol(symbol: &str) -> QuarryResult<Self> {
        match symbol {
            "in" => Ok(FilterOp::In),
            "not_in" => Ok(FilterOp::NotIn),
            "between" => Ok(FilterOp::Between),
            "is_null" => Ok(FilterOp::IsNull),
            "is_not_null" => Ok(FilterOp::IsNotNull),
            "=" => Ok(FilterOp::Eq),
            "!=" => Ok(FilterOp::Ne),
            "<" => Ok(FilterOp::Lt),
            "<=" => Ok(FilterOp::Lte),
            ">" => Ok(FilterOp::Gt),
            ">=" => Ok(FilterOp::Gte),
            "array_contains" => Ok(FilterOp::ArrayContains),
            "array_not_contains" => Ok(FilterOp::ArrayNotContains),
            other => Err(QuarryError::UnknownOperator(other.to_string())),
        }
    }

    /// The wire symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::In => "in",
            FilterOp::NotIn => "not_in",
            FilterOp::Between => "between",
            FilterOp::IsNull => "is_null",
            FilterOp::IsNotNull => "is_not_null",
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::ArrayContains => "array_contains",
            FilterOp::ArrayNotContains => "array_not_contains",
        }
    }

    /// IS NULL and IS NOT NULL ignore their criteria.
    pub fn needs_value(&self) -> bool {
        !matches!(self, FilterOp::IsNull | FilterOp::IsNotNull)
    }
}

impl Serialize for FilterOp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for FilterOp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        FilterOp::from_symbol(&symbol).map_err(serde::de::Error::custom)
    }
}

/// Comparison operators carried structurally inside predicates.
///
/// Only the operators the predicate abstraction renders natively; the rest of
/// the registry set degrades to raw fragments at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
}

impl CompareOp {
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }
}

/// Logical operator between predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a direction symbol. Only "asc" and "desc" are accepted.
    pub fn from_symbol(symbol: &str) -> QuarryResult<Self> {
        match symbol {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(QuarryError::InvalidOrderDirection(other.to_string())),
        }
    }

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Aggregate functions over a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    First,
}

impl std::fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateFunc::Count => write!(f, "count"),
            AggregateFunc::Sum => write!(f, "sum"),
            AggregateFunc::Avg => write!(f, "avg"),
            AggregateFunc::First => write!(f, "first"),
        }
    }
}
