//! Table catalog: the external schema the builder resolves tables and
//! columns against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::ast::predicate::ColumnRef;
use crate::error::{QuarryError, QuarryResult};

/// A column in a table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type", alias = "typ")]
    pub typ: String,
    #[serde(default)]
    pub nullable: bool,
}

/// A table definition inside a schema namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        TableDef {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column (builder style).
    pub fn column(mut self, name: impl Into<String>, typ: impl Into<String>) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            typ: typ.into(),
            nullable: false,
        });
        self
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Catalog of table definitions, keyed by qualified name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub tables: HashMap<String, TableDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table definition (builder style).
    pub fn table(mut self, def: TableDef) -> Self {
        self.tables.insert(def.qualified_name(), def);
        self
    }

    /// Load a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> QuarryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// Anything that can resolve a table name to a definition.
///
/// `Schema` is the in-crate implementation; callers with live introspection
/// can provide their own.
pub trait TableSource {
    fn resolve_table(&self, schema: &str, table: &str) -> Option<&TableDef>;

    /// A close-match candidate for an unresolved table name, if any.
    fn suggest_table(&self, _schema: &str, _table: &str) -> Option<String> {
        None
    }
}

impl TableSource for Schema {
    fn resolve_table(&self, schema: &str, table: &str) -> Option<&TableDef> {
        self.tables.get(&format!("{}.{}", schema, table))
    }

    fn suggest_table(&self, schema: &str, table: &str) -> Option<String> {
        did_you_mean(
            table,
            self.tables
                .values()
                .filter(|t| t.schema == schema)
                .map(|t| t.name.as_str()),
        )
    }
}

/// A table resolved from a catalog, held by the builder for column lookups.
#[derive(Debug, Clone)]
pub struct TableBinding {
    def: TableDef,
}

impl TableBinding {
    /// Resolve `schema.table` against the catalog.
    pub fn bind(catalog: &impl TableSource, schema: &str, table: &str) -> QuarryResult<Self> {
        match catalog.resolve_table(schema, table) {
            Some(def) => Ok(TableBinding { def: def.clone() }),
            None => Err(QuarryError::table_not_found(
                schema,
                table,
                catalog.suggest_table(schema, table),
            )),
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn qualified_name(&self) -> String {
        self.def.qualified_name()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.def.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Resolve a column to a table-qualified reference.
    pub fn column(&self, name: &str) -> QuarryResult<ColumnRef> {
        if self.def.has_column(name) {
            Ok(ColumnRef::qualified(self.def.name.clone(), name))
        } else {
            Err(QuarryError::unknown_column(
                &self.def.name,
                name,
                did_you_mean(name, self.def.column_names()),
            ))
        }
    }
}

/// Closest candidate within an edit-distance budget scaled to input length.
pub(crate) fn did_you_mean<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let max_distance = match input.len() {
        0..=2 => 0,
        3..=5 => 2,
        _ => 3,
    };
    candidates
        .into_iter()
        .map(|cand| (levenshtein(input, cand), cand))
        .filter(|(dist, _)| *dist > 0 && *dist <= max_distance)
        .min_by_key(|(dist, _)| *dist)
        .map(|(_, cand)| cand.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Schema {
        Schema::new()
            .table(
                TableDef::new("public", "sites")
                    .column("id", "uuid")
                    .column("name", "text")
                    .column("organization_id", "uuid"),
            )
            .table(TableDef::new("public", "tags").column("id", "uuid"))
    }

    #[test]
    fn test_resolve_table() {
        let schema = fixture();
        let binding = TableBinding::bind(&schema, "public", "sites").expect("should resolve");
        assert_eq!(binding.name(), "sites");
        assert_eq!(binding.qualified_name(), "public.sites");
        assert_eq!(binding.column_names().len(), 3);
    }

    #[test]
    fn test_table_not_found_with_suggestion() {
        let schema = fixture();
        let err = TableBinding::bind(&schema, "public", "sties").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Table 'public.sties' not found. Did you mean 'sites'?"
        );
        // Wrong namespace yields no candidates.
        let err = TableBinding::bind(&schema, "internal", "sites").unwrap_err();
        assert_eq!(err.to_string(), "Table 'internal.sites' not found.");
    }

    #[test]
    fn test_column_resolution() {
        let schema = fixture();
        let binding = TableBinding::bind(&schema, "public", "sites").expect("should resolve");
        let col = binding.column("name").expect("known column");
        assert_eq!(col.to_string(), "sites.name");

        let err = binding.column("nmae").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'nmae' not found in table 'sites'. Did you mean 'name'?"
        );
    }

    #[test]
    fn test_did_you_mean_thresholds() {
        let candidates = ["id", "name", "organization_id"];
        assert_eq!(did_you_mean("nmae", candidates), Some("name".to_string()));
        // Short inputs only match exactly, and exact matches are excluded.
        assert_eq!(did_you_mean("xd", candidates), None);
        assert_eq!(did_you_mean("completely_off", candidates), None);
    }

    #[test]
    fn test_schema_from_json() {
        let schema = Schema::from_json(
            r#"{"tables": {"public.sites": {
                "schema": "public",
                "name": "sites",
                "columns": [{"name": "id", "type": "uuid"}]
            }}}"#,
        )
        .expect("should parse");
        assert!(schema.resolve_table("public", "sites").is_some());
    }

    #[test]
    fn test_schema_from_file() {
        let path = std::env::temp_dir().join("quarry_catalog_fixture.json");
        std::fs::write(
            &path,
            r#"{"tables": {"public.sites": {
                "schema": "public",
                "name": "sites",
                "columns": [{"name": "id", "type": "uuid"}]
            }}}"#,
        )
        .expect("write fixture");
        let schema = Schema::from_file(&path).expect("should load");
        assert!(schema.resolve_table("public", "sites").is_some());
        std::fs::remove_file(&path).ok();

        let err = Schema::from_file(std::env::temp_dir().join("quarry_no_such.json")).unwrap_err();
        assert!(matches!(err, QuarryError::Io(_)));
    }
}
