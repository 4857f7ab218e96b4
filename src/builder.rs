//! Fluent single-table query builder.
//!
//! A `QueryBuilder` binds to one table at construction and accumulates query
//! state through chained calls. Every method mutates in place and hands the
//! builder back, so chains read left to right:
//!
//! ```ignore
//! let mut qb = QueryBuilder::new(&catalog, "public", "sites")?;
//! qb.select(["id", "name"])?
//!     .filter("name", "=", "test")?
//!     .order_by("name", "asc")?
//!     .limit(10)?;
//! let sql = qb.to_sql();
//! ```
//!
//! A failed call leaves the accumulated state exactly as it was; methods that
//! touch several columns resolve all of them before mutating anything.

use serde::{Deserialize, Serialize};

use crate::ast::expr::{FilterClause, FilterExpr};
use crate::ast::operators::{AggregateFunc, FilterOp, SortOrder};
use crate::ast::predicate::{ColumnRef, Predicate};
use crate::ast::values::Value;
use crate::catalog::{TableBinding, TableSource};
use crate::compiler;
use crate::error::{QuarryError, QuarryResult};
use crate::registry;

/// Filter keys honored by `add_location_filters` unless a caller passes its
/// own set. Only the singular `site_id` key is here; the plural `site_ids`
/// arrays-overlap path needs an explicit opt-in.
pub const COMMON_SUPPORTED_FILTERS: &[&str] = &[
    "site_id",
    "country_codes",
    "tag_ids",
    "site_group_ids",
    "tag_group_ids",
];

/// Filters shared by every tenant-scoped query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFilters {
    pub organization_id: String,
}

/// Location scoping filters. An empty list means the dimension is unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilters {
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub country_codes: Vec<String>,
    #[serde(default)]
    pub site_groups: Vec<String>,
    #[serde(default)]
    pub tag_groups: Vec<String>,
}

/// One selected output column: a plain column or an aggregate over one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectExpr {
    Column {
        name: String,
        alias: Option<String>,
    },
    Aggregate {
        func: AggregateFunc,
        column: String,
        alias: Option<String>,
    },
}

impl SelectExpr {
    pub fn column(name: impl Into<String>) -> Self {
        SelectExpr::Column {
            name: name.into(),
            alias: None,
        }
    }
}

/// One ORDER BY term. The column text is kept verbatim, so aliases and
/// expressions are allowed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTerm {
    pub column: String,
    pub direction: SortOrder,
}

/// The accumulated query, exposed to the executor side.
///
/// An empty `selected` list stands for all of the table's columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub selected: Vec<SelectExpr>,
    pub where_predicate: Option<Predicate>,
    pub group_by: Vec<ColumnRef>,
    pub order_by: Vec<OrderTerm>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    binding: TableBinding,
    state: QueryState,
}

impl QueryBuilder {
    /// Bind to `schema.table`, resolving it against the catalog.
    pub fn new(catalog: &impl TableSource, schema: &str, table: &str) -> QuarryResult<Self> {
        let binding = TableBinding::bind(catalog, schema, table)?;
        Ok(QueryBuilder {
            binding,
            state: QueryState::default(),
        })
    }

    pub fn binding(&self) -> &TableBinding {
        &self.binding
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Add output columns by name. `"*"` adds every table column not already
    /// selected; repeated names are added once.
    pub fn select(
        &mut self,
        columns: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> QuarryResult<&mut Self> {
        let mut to_add: Vec<SelectExpr> = Vec::new();
        for col in columns {
            let name = col.as_ref();
            if name == "*" {
                for table_col in self.binding.column_names() {
                    if !column_selected(&self.state.selected, &table_col)
                        && !column_selected(&to_add, &table_col)
                    {
                        to_add.push(SelectExpr::column(table_col));
                    }
                }
            } else {
                self.binding.column(name)?;
                if !column_selected(&self.state.selected, name)
                    && !column_selected(&to_add, name)
                {
                    to_add.push(SelectExpr::column(name));
                }
            }
        }
        self.state.selected.extend(to_add);
        Ok(self)
    }

    /// Add every table column not already selected.
    pub fn select_all(&mut self) -> &mut Self {
        for table_col in self.binding.column_names() {
            if !column_selected(&self.state.selected, &table_col) {
                self.state.selected.push(SelectExpr::column(table_col));
            }
        }
        self
    }

    /// Add one output column, optionally renamed. A column already selected
    /// under the same name is not added again, aliased or not.
    pub fn select_column(&mut self, column: &str, alias: Option<&str>) -> QuarryResult<&mut Self> {
        self.binding.column(column)?;
        if !column_selected(&self.state.selected, column) {
            self.state.selected.push(SelectExpr::Column {
                name: column.to_string(),
                alias: alias.map(str::to_string),
            });
        }
        Ok(self)
    }

    /// AND-combine one filter into the WHERE clause. The operator is given by
    /// its symbol; pass `Value::Null` for the null-check operators.
    pub fn filter(
        &mut self,
        field: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> QuarryResult<&mut Self> {
        let operator = registry::resolve(operator)?;
        self.filter_op(field, operator, Some(value.into()))
    }

    pub fn filter_eq(&mut self, field: &str, value: impl Into<Value>) -> QuarryResult<&mut Self> {
        self.filter_op(field, FilterOp::Eq, Some(value.into()))
    }

    pub fn filter_in(
        &mut self,
        field: &str,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> QuarryResult<&mut Self> {
        let values = values.into_iter().map(Into::into).collect();
        self.filter_op(field, FilterOp::In, Some(Value::Array(values)))
    }

    pub fn filter_null(&mut self, field: &str) -> QuarryResult<&mut Self> {
        self.filter_op(field, FilterOp::IsNull, None)
    }

    pub fn filter_not_null(&mut self, field: &str) -> QuarryResult<&mut Self> {
        self.filter_op(field, FilterOp::IsNotNull, None)
    }

    fn filter_op(
        &mut self,
        field: &str,
        operator: FilterOp,
        value: Option<Value>,
    ) -> QuarryResult<&mut Self> {
        let column = self.binding.column(field)?;
        let predicate = registry::build_predicate(column, operator, value)?;
        self.push_where(predicate);
        Ok(self)
    }

    /// OR together a flat list of clauses, then AND-combine the result into
    /// the WHERE clause. An empty list changes nothing.
    pub fn or_where(
        &mut self,
        clauses: impl IntoIterator<Item = FilterClause>,
    ) -> QuarryResult<&mut Self> {
        let parts = self.compile_clauses(clauses)?;
        self.push_where(Predicate::Or(parts));
        Ok(self)
    }

    /// AND together a flat list of clauses, then AND-combine the result into
    /// the WHERE clause. An empty list changes nothing.
    pub fn and_where(
        &mut self,
        clauses: impl IntoIterator<Item = FilterClause>,
    ) -> QuarryResult<&mut Self> {
        let parts = self.compile_clauses(clauses)?;
        self.push_where(Predicate::And(parts));
        Ok(self)
    }

    fn compile_clauses(
        &self,
        clauses: impl IntoIterator<Item = FilterClause>,
    ) -> QuarryResult<Vec<Predicate>> {
        clauses
            .into_iter()
            .map(|clause| compiler::compile_clause(clause, &self.binding))
            .collect()
    }

    /// Compile an arbitrarily nested expression tree and AND-combine it into
    /// the WHERE clause.
    pub fn filter_expr(&mut self, expr: FilterExpr) -> QuarryResult<&mut Self> {
        let predicate = compiler::compile(expr, &self.binding)?;
        self.push_where(predicate);
        Ok(self)
    }

    /// `filter_expr` for a JSON-encoded expression tree.
    pub fn filter_expr_json(&mut self, json: &str) -> QuarryResult<&mut Self> {
        let expr = FilterExpr::from_json(json)?;
        self.filter_expr(expr)
    }

    /// Append an ORDER BY term. The column is not resolved against the
    /// schema, so aliases and computed expressions pass through untouched.
    pub fn order_by(&mut self, column: &str, direction: &str) -> QuarryResult<&mut Self> {
        let direction = SortOrder::from_symbol(direction)?;
        self.push_order(column, direction);
        Ok(self)
    }

    /// `order_by` with the direction fixed ascending.
    pub fn order_asc(&mut self, column: &str) -> &mut Self {
        self.push_order(column, SortOrder::Asc);
        self
    }

    /// `order_by` with the direction fixed descending.
    pub fn order_desc(&mut self, column: &str) -> &mut Self {
        self.push_order(column, SortOrder::Desc);
        self
    }

    fn push_order(&mut self, column: &str, direction: SortOrder) {
        self.state.order_by.push(OrderTerm {
            column: column.to_string(),
            direction,
        });
    }

    /// Append a GROUP BY column, resolved against the schema.
    pub fn group_by(&mut self, column: &str) -> QuarryResult<&mut Self> {
        let column = self.binding.column(column)?;
        self.state.group_by.push(column);
        Ok(self)
    }

    /// Add `count(column)` to the output, optionally renamed.
    pub fn count(&mut self, column: &str, alias: Option<&str>) -> QuarryResult<&mut Self> {
        self.aggregate(AggregateFunc::Count, column, alias)
    }

    /// Add `sum(column)` to the output, optionally renamed.
    pub fn sum(&mut self, column: &str, alias: Option<&str>) -> QuarryResult<&mut Self> {
        self.aggregate(AggregateFunc::Sum, column, alias)
    }

    /// Add `avg(column)` to the output, optionally renamed.
    pub fn average(&mut self, column: &str, alias: Option<&str>) -> QuarryResult<&mut Self> {
        self.aggregate(AggregateFunc::Avg, column, alias)
    }

    /// Add `first(column)` to the output, optionally renamed.
    pub fn first(&mut self, column: &str, alias: Option<&str>) -> QuarryResult<&mut Self> {
        self.aggregate(AggregateFunc::First, column, alias)
    }

    fn aggregate(
        &mut self,
        func: AggregateFunc,
        column: &str,
        alias: Option<&str>,
    ) -> QuarryResult<&mut Self> {
        if column != "*" {
            self.binding.column(column)?;
        }
        let expr = SelectExpr::Aggregate {
            func,
            column: column.to_string(),
            alias: alias.map(str::to_string),
        };
        // Same function, column and alias: already in the output.
        if !self.state.selected.contains(&expr) {
            self.state.selected.push(expr);
        }
        Ok(self)
    }

    /// Cap the row count. Zero is a valid cap; negative values are rejected.
    pub fn limit(&mut self, limit: i64) -> QuarryResult<&mut Self> {
        if limit < 0 {
            return Err(QuarryError::InvalidLimit(limit));
        }
        self.state.limit = Some(limit);
        Ok(self)
    }

    /// AND-combine an equality filter on `organization_id`.
    pub fn add_organization_filter(
        &mut self,
        organization_id: impl Into<Value>,
    ) -> QuarryResult<&mut Self> {
        self.filter_op(
            "organization_id",
            FilterOp::Eq,
            Some(organization_id.into()),
        )
    }

    /// Equivalent to `add_organization_filter(filters.organization_id)`.
    pub fn apply_base_filters(&mut self, filters: &BaseFilters) -> QuarryResult<&mut Self> {
        self.add_organization_filter(filters.organization_id.clone())
    }

    /// AND-combine an arrays-overlap test between an array-typed column and
    /// the given values.
    pub fn add_arrays_filter(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> QuarryResult<&mut Self> {
        let column = self.binding.column(column)?;
        let values = values.into_iter().map(Into::into).collect();
        self.push_where(Predicate::ArrayOverlaps { column, values });
        Ok(self)
    }

    /// Apply the location scoping filters honored by
    /// [`COMMON_SUPPORTED_FILTERS`].
    pub fn add_location_filters(&mut self, filters: &LocationFilters) -> QuarryResult<&mut Self> {
        self.add_location_filters_with(filters, COMMON_SUPPORTED_FILTERS)
    }

    /// Apply location scoping filters against a caller-chosen supported set.
    ///
    /// Each dimension is applied only when its list is non-empty and its key
    /// is in `supported_filters`. Sites filter through `site_id IN (...)`
    /// under the singular key, or through an arrays-overlap test on a
    /// `site_ids` column when a caller's set carries the plural key.
    pub fn add_location_filters_with(
        &mut self,
        filters: &LocationFilters,
        supported_filters: &[&str],
    ) -> QuarryResult<&mut Self> {
        let mut predicates: Vec<Predicate> = Vec::new();

        if !filters.sites.is_empty() && supported_filters.contains(&"site_id") {
            let column = self.binding.column("site_id")?;
            predicates.push(registry::build_predicate(
                column,
                FilterOp::In,
                Some(string_list(&filters.sites)),
            )?);
        }
        if !filters.sites.is_empty() && supported_filters.contains(&"site_ids") {
            predicates.push(self.arrays_overlap("site_ids", &filters.sites)?);
        }
        if !filters.tags.is_empty() && supported_filters.contains(&"tag_ids") {
            predicates.push(self.arrays_overlap("tag_ids", &filters.tags)?);
        }
        if !filters.country_codes.is_empty() && supported_filters.contains(&"country_codes") {
            predicates.push(self.arrays_overlap("country_codes", &filters.country_codes)?);
        }
        if !filters.site_groups.is_empty() && supported_filters.contains(&"site_group_ids") {
            predicates.push(self.arrays_overlap("site_group_ids", &filters.site_groups)?);
        }
        if !filters.tag_groups.is_empty() && supported_filters.contains(&"tag_group_ids") {
            predicates.push(self.arrays_overlap("tag_group_ids", &filters.tag_groups)?);
        }

        for predicate in predicates {
            self.push_where(predicate);
        }
        Ok(self)
    }

    fn arrays_overlap(&self, column: &str, values: &[String]) -> QuarryResult<Predicate> {
        let column = self.binding.column(column)?;
        Ok(Predicate::ArrayOverlaps {
            column,
            values: values.iter().map(|v| Value::from(v.clone())).collect(),
        })
    }

    /// AND-combine a predicate into the accumulated WHERE clause. Empty
    /// combinations contribute nothing and are dropped here.
    fn push_where(&mut self, predicate: Predicate) {
        if predicate.is_empty() {
            return;
        }
        self.state.where_predicate = Some(match self.state.where_predicate.take() {
            None => predicate,
            Some(Predicate::And(mut parts)) => {
                parts.push(predicate);
                Predicate::And(parts)
            }
            Some(prior) => Predicate::And(vec![prior, predicate]),
        });
    }
}

fn column_selected(selected: &[SelectExpr], name: &str) -> bool {
    selected
        .iter()
        .any(|expr| matches!(expr, SelectExpr::Column { name: n, .. } if n == name))
}

fn string_list(values: &[String]) -> Value {
    Value::Array(values.iter().map(|v| Value::from(v.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Schema, TableDef};

    fn catalog() -> Schema {
        Schema::new().table(
            TableDef::new("public", "test_table")
                .column("id", "uuid")
                .column("name", "text")
                .column("value", "int")
                .column("organization_id", "uuid")
                .column("tags", "array")
                .column("site_id", "uuid"),
        )
    }

    fn builder() -> QueryBuilder {
        QueryBuilder::new(&catalog(), "public", "test_table").expect("fixture table")
    }

    #[test]
    fn test_unknown_table() {
        let err = QueryBuilder::new(&catalog(), "public", "missing").unwrap_err();
        assert!(matches!(err, QuarryError::TableNotFound { .. }));
    }

    #[test]
    fn test_select_dedup() {
        let mut qb = builder();
        qb.select(["id", "id"]).unwrap();
        assert_eq!(qb.state().selected, vec![SelectExpr::column("id")]);

        qb.select(["id"]).unwrap();
        assert_eq!(qb.state().selected.len(), 1);
    }

    #[test]
    fn test_select_star_then_aliased_column() {
        let mut qb = builder();
        qb.select(["*"]).unwrap();
        assert_eq!(qb.state().selected.len(), 6);

        qb.select_column("id", Some("identifier")).unwrap();
        let id_entries = qb
            .state()
            .selected
            .iter()
            .filter(|e| matches!(e, SelectExpr::Column { name, .. } if name == "id"))
            .count();
        assert_eq!(id_entries, 1);
    }

    #[test]
    fn test_select_atomicity() {
        let mut qb = builder();
        let err = qb.select(["id", "missing"]).unwrap_err();
        assert!(matches!(err, QuarryError::UnknownColumn { .. }));
        assert!(qb.state().selected.is_empty());
    }

    #[test]
    fn test_limit() {
        let mut qb = builder();
        qb.limit(0).unwrap();
        assert_eq!(qb.state().limit, Some(0));

        qb.limit(10).unwrap().limit(5).unwrap();
        assert_eq!(qb.state().limit, Some(5));

        let err = qb.limit(-1).unwrap_err();
        assert_eq!(err.to_string(), "Invalid limit: -1");
        assert_eq!(qb.state().limit, Some(5));
    }

    #[test]
    fn test_or_where_empty_is_noop() {
        let mut qb = builder();
        qb.or_where([]).unwrap();
        assert_eq!(qb.state().where_predicate, None);

        qb.filter("name", "=", "a").unwrap();
        let before = qb.state().where_predicate.clone();
        qb.or_where([]).unwrap();
        assert_eq!(qb.state().where_predicate, before);
    }

    #[test]
    fn test_order_by_is_lax() {
        let mut qb = builder();
        qb.order_by("not_a_column", "asc").unwrap();
        assert_eq!(qb.state().order_by.len(), 1);

        let err = qb.order_by("name", "ascending").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid order direction: 'ascending'. Expected: asc or desc"
        );
        assert_eq!(qb.state().order_by.len(), 1);
    }

    #[test]
    fn test_order_shorthands() {
        let mut qb = builder();
        qb.order_asc("name").order_desc("value");
        assert_eq!(qb.state().order_by[0].direction, SortOrder::Asc);
        assert_eq!(qb.state().order_by[1].direction, SortOrder::Desc);
    }

    #[test]
    fn test_group_by_is_checked() {
        let mut qb = builder();
        qb.group_by("name").unwrap();
        assert_eq!(qb.state().group_by[0].to_string(), "test_table.name");

        let err = qb.group_by("missing").unwrap_err();
        assert!(matches!(err, QuarryError::UnknownColumn { .. }));
        assert_eq!(qb.state().group_by.len(), 1);
    }

    #[test]
    fn test_aggregate_dedup() {
        let mut qb = builder();
        qb.count("id", Some("total")).unwrap();
        qb.count("id", Some("total")).unwrap();
        assert_eq!(qb.state().selected.len(), 1);

        // A different alias is a different output expression.
        qb.count("id", None).unwrap();
        assert_eq!(qb.state().selected.len(), 2);

        qb.count("*", None).unwrap();
        assert_eq!(qb.state().selected.len(), 3);
    }

    #[test]
    fn test_location_filters_skip_empty_lists() {
        let mut qb = builder();
        qb.add_location_filters(&LocationFilters::default()).unwrap();
        assert_eq!(qb.state().where_predicate, None);

        // tags present but its key held back: nothing applied either.
        let filters = LocationFilters {
            tags: vec!["t1".to_string()],
            ..Default::default()
        };
        qb.add_location_filters_with(&filters, &["site_id"]).unwrap();
        assert_eq!(qb.state().where_predicate, None);
    }

    #[test]
    fn test_location_filters_atomicity() {
        // tag_ids is not a column of the fixture table, so the whole call
        // fails and the site filter that resolved first is not kept.
        let mut qb = builder();
        let filters = LocationFilters {
            sites: vec!["s1".to_string()],
            tags: vec!["t1".to_string()],
            ..Default::default()
        };
        let err = qb.add_location_filters(&filters).unwrap_err();
        assert!(matches!(err, QuarryError::UnknownColumn { .. }));
        assert_eq!(qb.state().where_predicate, None);
    }

    #[test]
    fn test_location_filters_from_json() {
        // Dimensions absent from the document default to unfiltered.
        let filters: LocationFilters =
            serde_json::from_str(r#"{"sites": ["s1"], "country_codes": ["US"]}"#).unwrap();
        assert_eq!(filters.sites, vec!["s1".to_string()]);
        assert_eq!(filters.country_codes, vec!["US".to_string()]);
        assert!(filters.tags.is_empty());
    }

    #[test]
    fn test_base_filters_equivalence() {
        let mut a = builder();
        a.add_organization_filter("org-1").unwrap();

        let mut b = builder();
        b.apply_base_filters(&BaseFilters {
            organization_id: "org-1".to_string(),
        })
        .unwrap();

        assert_eq!(a.state().where_predicate, b.state().where_predicate);
    }
}
