//! Render traits and identifier utilities.

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "default",
    "primary",
    "key",
    "check",
];

/// Escape an identifier if it's a reserved word or contains special chars.
/// Dotted identifiers (`table.column`) are quoted part by part.
pub fn escape_identifier(name: &str) -> String {
    if name.contains('.') {
        return name
            .split('.')
            .map(escape_single_identifier)
            .collect::<Vec<_>>()
            .join(".");
    }
    escape_single_identifier(name)
}

fn escape_single_identifier(name: &str) -> String {
    let lower = name.to_lowercase();
    let needs_escaping = RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(false);

    if needs_escaping {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Dialect-specific SQL generation.
pub trait SqlGenerator {
    /// The boolean literal (true/false vs 1/0).
    fn bool_literal(&self, val: bool) -> String;
    /// The LIMIT clause, including its leading space.
    fn limit(&self, n: i64) -> String {
        format!(" LIMIT {}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("name"), "name");
        assert_eq!(escape_identifier("order"), "\"order\"");
        assert_eq!(escape_identifier("Order"), "\"Order\"");
        assert_eq!(escape_identifier("2fa"), "\"2fa\"");
        assert_eq!(escape_identifier("with space"), "\"with space\"");
        assert_eq!(escape_identifier("sites.name"), "sites.name");
        assert_eq!(escape_identifier("sites.order"), "sites.\"order\"");
        assert_eq!(escape_identifier("a\"b"), "\"a\"\"b\"");
    }
}
