//! Error types for Quarry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuarryError {
    /// Table could not be resolved against the catalog at bind time.
    #[error("Table '{schema}.{table}' not found{}", fmt_suggestion(.suggestion))]
    TableNotFound {
        schema: String,
        table: String,
        suggestion: Option<String>,
    },

    /// Column is not part of the bound table's schema.
    #[error("Column '{column}' not found in table '{table}'{}", fmt_suggestion(.suggestion))]
    UnknownColumn {
        table: String,
        column: String,
        suggestion: Option<String>,
    },

    /// Operator symbol outside the fixed registry set.
    #[error("Unknown operator: '{0}'")]
    UnknownOperator(String),

    /// Expression node matches neither the leaf nor the combination shape.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// ORDER BY direction other than "asc" or "desc".
    #[error("Invalid order direction: '{0}'. Expected: asc or desc")]
    InvalidOrderDirection(String),

    /// Negative row limit.
    #[error("Invalid limit: {0}")]
    InvalidLimit(i64),

    /// Criteria value does not fit the operator's expected shape.
    #[error("Invalid value for '{operator}': {message}")]
    InvalidValue {
        operator: &'static str,
        message: String,
    },

    /// Schema document could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema document could not be parsed.
    #[error("Invalid schema document: {0}")]
    InvalidSchema(#[from] serde_json::Error),
}

fn fmt_suggestion(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => ".".to_string(),
    }
}

impl QuarryError {
    /// Create a table-not-found error with an optional suggestion.
    pub fn table_not_found(
        schema: impl Into<String>,
        table: impl Into<String>,
        suggestion: Option<String>,
    ) -> Self {
        Self::TableNotFound {
            schema: schema.into(),
            table: table.into(),
            suggestion,
        }
    }

    /// Create an unknown-column error with an optional suggestion.
    pub fn unknown_column(
        table: impl Into<String>,
        column: impl Into<String>,
        suggestion: Option<String>,
    ) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
            suggestion,
        }
    }

    /// Create an invalid-value error for the given operator symbol.
    pub fn invalid_value(operator: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            operator,
            message: message.into(),
        }
    }
}

/// Result type alias for Quarry operations.
pub type QuarryResult<T> = Result<T, QuarryError>;
