//! Predicate rendering.

use crate::ast::predicate::{ColumnRef, Predicate};
use crate::ast::values::Value;
use crate::render::traits::{escape_identifier, SqlGenerator};

/// Render a predicate as the content of a WHERE clause.
///
/// Nested combinations with two or more parts are parenthesized; the top
/// level is not. Empty combinations render as their identity, `TRUE` for AND
/// and `FALSE` for OR.
pub fn predicate_to_sql(predicate: &Predicate, generator: &dyn SqlGenerator) -> String {
    render(predicate, generator, false)
}

fn render(predicate: &Predicate, generator: &dyn SqlGenerator, nested: bool) -> String {
    match predicate {
        Predicate::Compare { column, op, value } => format!(
            "{} {} {}",
            column_sql(column),
            op.sql_symbol(),
            value_sql(value, generator)
        ),
        Predicate::InList {
            column,
            values,
            negated,
        } => {
            // `IN ()` is a syntax error. Membership in an empty list is
            // always false, its negation always true.
            if values.is_empty() {
                let identity = if *negated { "TRUE" } else { "FALSE" };
                identity.to_string()
            } else {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!(
                    "{} {} ({})",
                    column_sql(column),
                    keyword,
                    value_list(values, generator)
                )
            }
        }
        Predicate::Null { column, negated } => {
            let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
            format!("{} {}", column_sql(column), keyword)
        }
        Predicate::ArrayOverlaps { column, values } => format!(
            "arrays_overlap({}, array({}))",
            column_sql(column),
            value_list(values, generator)
        ),
        Predicate::Raw(sql) => sql.clone(),
        Predicate::And(parts) => render_combination(parts, " AND ", "TRUE", generator, nested),
        Predicate::Or(parts) => render_combination(parts, " OR ", "FALSE", generator, nested),
    }
}

fn render_combination(
    parts: &[Predicate],
    joiner: &str,
    identity: &str,
    generator: &dyn SqlGenerator,
    nested: bool,
) -> String {
    match parts {
        [] => identity.to_string(),
        [single] => render(single, generator, nested),
        parts => {
            let body = parts
                .iter()
                .map(|p| render(p, generator, true))
                .collect::<Vec<_>>()
                .join(joiner);
            if nested { format!("({})", body) } else { body }
        }
    }
}

fn column_sql(column: &ColumnRef) -> String {
    escape_identifier(&column.to_string())
}

fn value_list(values: &[Value], generator: &dyn SqlGenerator) -> String {
    values
        .iter()
        .map(|v| value_sql(v, generator))
        .collect::<Vec<_>>()
        .join(", ")
}

fn value_sql(value: &Value, generator: &dyn SqlGenerator) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => generator.bool_literal(*b),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Uuid(u) => format!("'{}'", u),
        Value::Array(values) => format!("({})", value_list(values, generator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::operators::CompareOp;
    use crate::render::sql::snowflake::SnowflakeGenerator;
    use crate::render::sql::sqlite::SqliteGenerator;

    fn compare(name: &str, op: CompareOp, value: Value) -> Predicate {
        Predicate::Compare {
            column: ColumnRef::bare(name),
            op,
            value,
        }
    }

    fn sql(predicate: &Predicate) -> String {
        predicate_to_sql(predicate, &SnowflakeGenerator)
    }

    #[test]
    fn test_leaf() {
        assert_eq!(sql(&compare("age", CompareOp::Eq, Value::Int(5))), "age = 5");
    }

    #[test]
    fn test_flat_conjunction() {
        let p = Predicate::And(vec![
            compare("a", CompareOp::Eq, Value::Int(1)),
            compare("b", CompareOp::Gt, Value::Int(10)),
        ]);
        assert_eq!(sql(&p), "a = 1 AND b > 10");
    }

    #[test]
    fn test_nested_grouping() {
        let p = Predicate::Or(vec![
            Predicate::And(vec![
                compare("a", CompareOp::Eq, Value::Int(1)),
                compare("b", CompareOp::Eq, Value::Int(2)),
            ]),
            Predicate::And(vec![
                compare("c", CompareOp::Eq, Value::Int(3)),
                compare("d", CompareOp::Eq, Value::Int(4)),
            ]),
        ]);
        assert_eq!(sql(&p), "(a = 1 AND b = 2) OR (c = 3 AND d = 4)");
    }

    #[test]
    fn test_combinator_identities() {
        assert_eq!(sql(&Predicate::And(vec![])), "TRUE");
        assert_eq!(sql(&Predicate::Or(vec![])), "FALSE");
        // An empty combination nested inside another keeps its identity text.
        let p = Predicate::And(vec![
            compare("a", CompareOp::Eq, Value::Int(1)),
            Predicate::Or(vec![]),
        ]);
        assert_eq!(sql(&p), "a = 1 AND FALSE");
    }

    #[test]
    fn test_single_part_combination_is_unwrapped() {
        let p = Predicate::Or(vec![compare("a", CompareOp::Eq, Value::Int(1))]);
        assert_eq!(sql(&p), "a = 1");
    }

    #[test]
    fn test_in_list() {
        let p = Predicate::InList {
            column: ColumnRef::qualified("sites", "name"),
            values: vec![Value::from("a"), Value::from("b")],
            negated: false,
        };
        assert_eq!(sql(&p), "sites.name IN ('a', 'b')");

        let p = Predicate::InList {
            column: ColumnRef::bare("name"),
            values: vec![Value::from("a")],
            negated: true,
        };
        assert_eq!(sql(&p), "name NOT IN ('a')");
    }

    #[test]
    fn test_empty_in_list_renders_identity() {
        let p = Predicate::InList {
            column: ColumnRef::bare("name"),
            values: vec![],
            negated: false,
        };
        assert_eq!(sql(&p), "FALSE");

        let p = Predicate::InList {
            column: ColumnRef::bare("name"),
            values: vec![],
            negated: true,
        };
        assert_eq!(sql(&p), "TRUE");
    }

    #[test]
    fn test_null_checks() {
        let p = Predicate::Null {
            column: ColumnRef::bare("deleted_at"),
            negated: false,
        };
        assert_eq!(sql(&p), "deleted_at IS NULL");

        let p = Predicate::Null {
            column: ColumnRef::bare("deleted_at"),
            negated: true,
        };
        assert_eq!(sql(&p), "deleted_at IS NOT NULL");
    }

    #[test]
    fn test_arrays_overlap() {
        let p = Predicate::ArrayOverlaps {
            column: ColumnRef::qualified("test_table", "tags"),
            values: vec![Value::from("tag1"), Value::from("tag2")],
        };
        assert_eq!(
            sql(&p),
            "arrays_overlap(test_table.tags, array('tag1', 'tag2'))"
        );
    }

    #[test]
    fn test_raw_passthrough() {
        let p = Predicate::Raw("age BETWEEN '1' AND '2'".to_string());
        assert_eq!(sql(&p), "age BETWEEN '1' AND '2'");
    }

    #[test]
    fn test_string_values_are_escaped() {
        let p = compare("name", CompareOp::Eq, Value::from("O'Brien"));
        assert_eq!(sql(&p), "name = 'O''Brien'");
    }

    #[test]
    fn test_reserved_column_is_quoted() {
        let p = compare("order", CompareOp::Eq, Value::Int(1));
        assert_eq!(sql(&p), "\"order\" = 1");
    }

    #[test]
    fn test_uuid_values_render_quoted() {
        let id = uuid::Uuid::parse_str("0aa9fa05-0997-4aaa-aaaa-7aa0aaaaaaaa").unwrap();
        let p = compare("organization_id", CompareOp::Eq, Value::Uuid(id));
        assert_eq!(
            sql(&p),
            "organization_id = '0aa9fa05-0997-4aaa-aaaa-7aa0aaaaaaaa'"
        );
    }

    #[test]
    fn test_bool_literal_by_dialect() {
        let p = compare("active", CompareOp::Eq, Value::Bool(true));
        assert_eq!(predicate_to_sql(&p, &SnowflakeGenerator), "active = true");
        assert_eq!(predicate_to_sql(&p, &SqliteGenerator), "active = 1");
    }
}
