use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ast::operators::{FilterOp, LogicalOp};
use crate::ast::values::Value;
use crate::error::{QuarryError, QuarryResult};

const AND_TAG: &str = "and-expression";
const OR_TAG: &str = "or-expression";

/// A single filter condition: field, operator, optional criteria.
///
/// `value` is `None` for the null-check operators. A missing or null value
/// under `=`/`!=` compiles as a null test; the remaining operators compile
/// it as a literal SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub field: String,
    pub operator: FilterOp,
    pub value: Option<Value>,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, operator: FilterOp, value: Option<Value>) -> Self {
        FilterClause {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// A filter expression tree: either a single clause or a combination of
/// sub-expressions under one combinator.
///
/// The JSON form is discriminated by key presence, `field` first:
///
/// ```json
/// {"field": "age", "operator": "=", "value": 5}
/// {"operator": "or-expression", "expressions": [...]}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Leaf(FilterClause),
    Combination {
        operator: LogicalOp,
        expressions: Vec<FilterExpr>,
    },
}

impl FilterExpr {
    pub fn leaf(clause: FilterClause) -> Self {
        FilterExpr::Leaf(clause)
    }

    pub fn and(expressions: Vec<FilterExpr>) -> Self {
        FilterExpr::Combination {
            operator: LogicalOp::And,
            expressions,
        }
    }

    pub fn or(expressions: Vec<FilterExpr>) -> Self {
        FilterExpr::Combination {
            operator: LogicalOp::Or,
            expressions,
        }
    }

    /// Parse an expression tree from its JSON text.
    pub fn from_json(json: &str) -> QuarryResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| QuarryError::InvalidExpression(format!("invalid JSON: {}", e)))?;
        Self::from_json_value(&value)
    }

    /// Parse an expression tree from an already-decoded JSON value.
    ///
    /// A node with a `field` key is a clause even if it also carries
    /// `expressions`; only field-less nodes are read as combinations.
    pub fn from_json_value(value: &serde_json::Value) -> QuarryResult<Self> {
        let map = value.as_object().ok_or_else(|| {
            QuarryError::InvalidExpression(format!("expected a JSON object, got {}", value))
        })?;

        if map.contains_key("field") {
            let field = map
                .get("field")
                .and_then(|f| f.as_str())
                .ok_or_else(|| QuarryError::InvalidExpression("'field' must be a string".into()))?;
            let symbol = map
                .get("operator")
                .and_then(|o| o.as_str())
                .ok_or_else(|| {
                    QuarryError::InvalidExpression(format!(
                        "clause for field '{}' is missing 'operator'",
                        field
                    ))
                })?;
            let operator = FilterOp::from_symbol(symbol)?;
            let value = match map.get("value") {
                None | Some(serde_json::Value::Null) => None,
                Some(v) => Some(json_to_value(v)?),
            };
            return Ok(FilterExpr::Leaf(FilterClause::new(field, operator, value)));
        }

        if map.contains_key("expressions") {
            let operator = match map.get("operator").and_then(|o| o.as_str()) {
                Some(AND_TAG) => LogicalOp::And,
                Some(OR_TAG) => LogicalOp::Or,
                Some(other) => {
                    return Err(QuarryError::InvalidExpression(format!(
                        "unknown combinator '{}'",
                        other
                    )));
                }
                None => {
                    return Err(QuarryError::InvalidExpression(
                        "combination is missing 'operator'".into(),
                    ));
                }
            };
            let items = map
                .get("expressions")
                .and_then(|e| e.as_array())
                .ok_or_else(|| {
                    QuarryError::InvalidExpression("'expressions' must be an array".into())
                })?;
            let expressions = items
                .iter()
                .map(Self::from_json_value)
                .collect::<QuarryResult<Vec<_>>>()?;
            return Ok(FilterExpr::Combination {
                operator,
                expressions,
            });
        }

        Err(QuarryError::InvalidExpression(
            "expression has neither 'field' nor 'expressions'".into(),
        ))
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FilterExpr::Leaf(clause) => {
                let mut map = serde_json::Map::new();
                map.insert("field".into(), clause.field.clone().into());
                map.insert("operator".into(), clause.operator.symbol().into());
                if clause.operator.needs_value() {
                    if let Some(value) = &clause.value {
                        if let Ok(v) = serde_json::to_value(value) {
                            map.insert("value".into(), v);
                        }
                    }
                }
                serde_json::Value::Object(map)
            }
            FilterExpr::Combination {
                operator,
                expressions,
            } => {
                let tag = match operator {
                    LogicalOp::And => AND_TAG,
                    LogicalOp::Or => OR_TAG,
                };
                let mut map = serde_json::Map::new();
                map.insert("operator".into(), tag.into());
                map.insert(
                    "expressions".into(),
                    serde_json::Value::Array(
                        expressions.iter().map(|e| e.to_json_value()).collect(),
                    ),
                );
                serde_json::Value::Object(map)
            }
        }
    }

    pub fn to_json(&self) -> String {
        self.to_json_value().to_string()
    }
}

fn json_to_value(value: &serde_json::Value) -> QuarryResult<Value> {
    serde_json::from_value(value.clone()).map_err(|_| {
        QuarryError::InvalidExpression(format!("unsupported criteria value: {}", value))
    })
}

impl Serialize for FilterExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        FilterExpr::from_json_value(&value).map_err(D::Error::custom)
    }
}
