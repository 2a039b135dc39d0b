//! FILENAME: core/model/src/dataset.rs
//! PURPOSE: Declarative dataset specifications.
//! CONTEXT: A dataset names a source table and describes, in execution order,
//! lookup joins, filters, an optional master restriction, calculated fields,
//! sort keys, and grouping with aggregates. The execution engine lives in the
//! dataset-engine crate; this module is the persisted shape only.

use serde::{Deserialize, Serialize};

use crate::value::Value;

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSpec {
    pub id: String,
    /// Logical source table name resolved against the tables the host hands
    /// the engine.
    pub source: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub sort: Vec<SortKey>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregates: Vec<AggregateSpec>,
    #[serde(default)]
    pub calculated_fields: Vec<CalculatedField>,
    /// Restricts rows to those related to an earlier dataset's rows.
    #[serde(default)]
    pub master_dataset_id: Option<String>,
    #[serde(default)]
    pub relation_field: Option<String>,
}

/// Lookup join: attaches the first matching foreign row as a nested map
/// under the alias. Never changes the row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSpec {
    pub source: String,
    pub local_field: String,
    pub foreign_field: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl JoinSpec {
    /// Key the joined row is attached under: the alias, else the source name.
    pub fn attach_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.source)
    }
}

// ============================================================================
// FILTERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub field: String,
    pub operator: FilterOperator,
    /// Literal comparand, or the parameter/record field name depending on
    /// `source`.
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub source: FilterSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
}

/// Where the right-hand side of a filter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterSource {
    #[default]
    Literal,
    Parameter,
    Record,
}

// ============================================================================
// SORT / GROUP / AGGREGATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSpec {
    pub field: String,
    #[serde(rename = "fn")]
    pub function: AggregateFn,
    /// Output field name the aggregate lands under.
    #[serde(rename = "as")]
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFn {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

// ============================================================================
// CALCULATED FIELDS
// ============================================================================

/// Expression-derived field appended to every row. Expressions see the row
/// snapshot plus `params` and `record` sub-maps, never each other's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedField {
    pub key: String,
    pub expression: String,
}
