//! FILENAME: core/dataset-engine/src/engine.rs
//! PURPOSE: Executes a template's dataset specifications over in-memory tables.
//! CONTEXT: This is the calculation core of the report pipeline. It takes the
//! declarative DatasetSpec list of a template plus the source tables, current
//! record and runtime parameters handed in by the host, and produces the rows
//! each visual element binds to.
//!
//! Pipeline per dataset, in declaration order:
//! 1. Copy the named source table (missing table -> empty rows)
//! 2. Lookup joins, left to right (row count preserved exactly)
//! 3. Filters, logical AND
//! 4. Master restriction (semi-join against an earlier dataset)
//! 5. Calculated fields (single pass over the pre-calculation snapshot)
//! 6. Stable multi-key sort
//! 7. Grouping with aggregates (only when both groupBy and aggregates are set)
//!
//! Every stage degrades to empty/no-op on bad input instead of raising: a
//! broken spec produces an empty dataset, never a failed render.

use model::{
    lookup_path, AggregateFn, CalculatedField, DatasetSpec, FilterOperator, FilterSource,
    FilterSpec, JoinSpec, Record, SortDirection, SortKey, Template, Value,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Executed rows keyed by dataset id.
pub type DatasetResults = FxHashMap<String, Vec<Record>>;

/// Source tables keyed by logical name, as the host hands them in.
pub type SourceTables = FxHashMap<String, Vec<Record>>;

/// Field grouped output rows carry their member count under.
pub const GROUP_COUNT_FIELD: &str = "_count";

/// Everything the pipeline consumes besides the template itself.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Runtime parameter values, keyed by parameter key.
    pub parameters: Record,
    /// The ambient record the report is being rendered for.
    pub record: Record,
    pub tables: SourceTables,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Executes every dataset of the template in declaration order. Later
/// datasets can restrict themselves against earlier results via
/// masterDatasetId.
pub fn execute_datasets(template: &Template, options: &ExecutionOptions) -> DatasetResults {
    let mut results = DatasetResults::default();
    for dataset in &template.datasets {
        let rows = execute_dataset(dataset, options, &results);
        results.insert(dataset.id.clone(), rows);
    }
    results
}

fn execute_dataset(
    spec: &DatasetSpec,
    options: &ExecutionOptions,
    completed: &DatasetResults,
) -> Vec<Record> {
    // 1. Source copy.
    let mut rows = match options.tables.get(&spec.source) {
        Some(table) => table.clone(),
        None => {
            log::debug!(
                "dataset {}: source table {:?} not provided, resolving empty",
                spec.id,
                spec.source
            );
            Vec::new()
        }
    };

    // 2. Lookup joins.
    for join in &spec.joins {
        apply_join(&mut rows, join, &options.tables);
    }

    // 3. Filters (AND).
    if !spec.filters.is_empty() {
        rows.retain(|row| spec.filters.iter().all(|f| passes_filter(row, f, options)));
    }

    // 4. Master restriction.
    if let (Some(master_id), Some(relation_field)) =
        (&spec.master_dataset_id, &spec.relation_field)
    {
        rows = apply_master_restriction(rows, spec, master_id, relation_field, completed);
    }

    // 5. Calculated fields.
    apply_calculated_fields(&mut rows, &spec.calculated_fields, options);

    // 6. Sort.
    sort_rows(&mut rows, &spec.sort);

    // 7. Group + aggregate.
    if !spec.group_by.is_empty() && !spec.aggregates.is_empty() {
        rows = group_and_aggregate(rows, spec);
    }

    rows
}

// ============================================================================
// JOINS
// ============================================================================

/// Attaches the first matching foreign row as a nested map under the join
/// alias; no match attaches null. One output row per input row, always.
fn apply_join(rows: &mut [Record], join: &JoinSpec, tables: &FxHashMap<String, Vec<Record>>) {
    let foreign = tables.get(&join.source);
    if foreign.is_none() {
        log::debug!(
            "join {:?}: foreign table not provided, attaching null",
            join.source
        );
    }

    for row in rows.iter_mut() {
        // Dotted local fields let a join chain off an earlier join's alias.
        let local = lookup_path(row, &join.local_field)
            .map(Value::display_text)
            .unwrap_or_default();

        let matched = foreign.and_then(|table| {
            table.iter().find(|candidate| {
                candidate
                    .get(&join.foreign_field)
                    .map(Value::display_text)
                    .unwrap_or_default()
                    == local
            })
        });

        let attached = match matched {
            Some(candidate) => Value::Map(candidate.clone()),
            None => Value::Null,
        };
        row.insert(join.attach_key().to_string(), attached);
    }
}

// ============================================================================
// FILTERS
// ============================================================================

fn passes_filter(row: &Record, filter: &FilterSpec, options: &ExecutionOptions) -> bool {
    let left = lookup_path(row, &filter.field)
        .cloned()
        .unwrap_or(Value::Null);
    let right = filter_rhs(filter, options);

    match filter.operator {
        // eq/neq compare display text, so 1000 matches "1000" and null
        // matches the empty string.
        FilterOperator::Eq => left.display_text() == right.display_text(),
        FilterOperator::Neq => left.display_text() != right.display_text(),

        // Ordered operators require both sides to coerce numerically;
        // otherwise the row is excluded.
        FilterOperator::Gt => numeric_pair(&left, &right).is_some_and(|(a, b)| a > b),
        FilterOperator::Gte => numeric_pair(&left, &right).is_some_and(|(a, b)| a >= b),
        FilterOperator::Lt => numeric_pair(&left, &right).is_some_and(|(a, b)| a < b),
        FilterOperator::Lte => numeric_pair(&left, &right).is_some_and(|(a, b)| a <= b),

        FilterOperator::Contains => left
            .display_text()
            .to_lowercase()
            .contains(&right.display_text().to_lowercase()),
    }
}

/// Resolves the right-hand side of a filter. For parameter/record sources the
/// filter value names the key to read; a missing key resolves to null rather
/// than skipping the filter.
fn filter_rhs(filter: &FilterSpec, options: &ExecutionOptions) -> Value {
    match filter.source {
        FilterSource::Literal => filter.value.clone(),
        FilterSource::Parameter => options
            .parameters
            .get(filter.value.display_text().as_str())
            .cloned()
            .unwrap_or(Value::Null),
        FilterSource::Record => lookup_path(&options.record, &filter.value.display_text())
            .cloned()
            .unwrap_or(Value::Null),
    }
}

fn numeric_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    Some((left.as_number()?, right.as_number()?))
}

// ============================================================================
// MASTER RESTRICTION
// ============================================================================

/// Semi-join: keeps rows whose relation field value appears among the master
/// dataset's relation field values. The master must already be executed; a
/// forward or unknown reference is a malformed spec and resolves empty.
fn apply_master_restriction(
    rows: Vec<Record>,
    spec: &DatasetSpec,
    master_id: &str,
    relation_field: &str,
    completed: &DatasetResults,
) -> Vec<Record> {
    let master_rows = match completed.get(master_id) {
        Some(master_rows) => master_rows,
        None => {
            log::warn!(
                "dataset {}: master dataset {:?} not executed yet, resolving empty",
                spec.id,
                master_id
            );
            return Vec::new();
        }
    };

    let master_keys: FxHashSet<String> = master_rows
        .iter()
        .map(|row| {
            lookup_path(row, relation_field)
                .map(Value::display_text)
                .unwrap_or_default()
        })
        .collect();

    rows.into_iter()
        .filter(|row| {
            let key = lookup_path(row, relation_field)
                .map(Value::display_text)
                .unwrap_or_default();
            master_keys.contains(&key)
        })
        .collect()
}

// ============================================================================
// CALCULATED FIELDS
// ============================================================================

/// Evaluates every calculated field against the row's pre-calculation
/// snapshot plus `params` and `record` sub-maps. Expressions never see each
/// other's outputs; a field referencing another calculated field reads null.
fn apply_calculated_fields(
    rows: &mut [Record],
    fields: &[CalculatedField],
    options: &ExecutionOptions,
) {
    if fields.is_empty() {
        return;
    }

    let params = Value::Map(options.parameters.clone());
    let record = Value::Map(options.record.clone());

    for row in rows.iter_mut() {
        let mut context = row.clone();
        context.insert("params".to_string(), params.clone());
        context.insert("record".to_string(), record.clone());

        let outputs: Vec<(String, Value)> = fields
            .iter()
            .map(|field| (field.key.clone(), expr::evaluate(&field.expression, &context)))
            .collect();
        for (key, value) in outputs {
            row.insert(key, value);
        }
    }
}

// ============================================================================
// SORTING
// ============================================================================

/// Stable multi-key sort. Also used by the binding layer for element-level
/// sort overrides.
pub fn sort_rows(rows: &mut [Record], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| compare_rows(a, b, keys));
}

fn compare_rows(a: &Record, b: &Record, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let left = lookup_path(a, &key.field).cloned().unwrap_or(Value::Null);
        let right = lookup_path(b, &key.field).cloned().unwrap_or(Value::Null);

        let mut ordering = compare_sort_values(&left, &right);
        if key.direction == SortDirection::Desc {
            ordering = ordering.reverse();
        }
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Numeric compare when either side parses as a number (the non-parsing side
/// counts as 0), else case-folded text compare with an exact tie-break so
/// "Apple"/"apple" order deterministically.
fn compare_sort_values(left: &Value, right: &Value) -> Ordering {
    let left_num = left.as_number();
    let right_num = right.as_number();

    if left_num.is_some() || right_num.is_some() {
        let a = left_num.unwrap_or(0.0);
        let b = right_num.unwrap_or(0.0);
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }

    let left_text = left.display_text();
    let right_text = right.display_text();
    let folded = left_text.to_lowercase().cmp(&right_text.to_lowercase());
    if folded != Ordering::Equal {
        folded
    } else {
        left_text.cmp(&right_text)
    }
}

// ============================================================================
// GROUPING & AGGREGATION
// ============================================================================

struct GroupBucket {
    /// groupBy values from the bucket's first member, stored under the
    /// (possibly dotted) groupBy field name as a flat key.
    group_values: Vec<(String, Value)>,
    /// One accumulator per aggregate spec.
    accumulators: Vec<AggregateAccumulator>,
    size: u64,
}

/// Buckets rows by their joined groupBy display key, first-encounter order.
fn group_and_aggregate(rows: Vec<Record>, spec: &DatasetSpec) -> Vec<Record> {
    let mut bucket_of: FxHashMap<String, usize> = FxHashMap::default();
    let mut buckets: Vec<GroupBucket> = Vec::new();

    for row in rows {
        let key = group_key(&row, &spec.group_by);
        let index = match bucket_of.get(&key) {
            Some(&index) => index,
            None => {
                let group_values = spec
                    .group_by
                    .iter()
                    .map(|field| {
                        let value = lookup_path(&row, field).cloned().unwrap_or(Value::Null);
                        (field.clone(), value)
                    })
                    .collect();
                buckets.push(GroupBucket {
                    group_values,
                    accumulators: vec![AggregateAccumulator::new(); spec.aggregates.len()],
                    size: 0,
                });
                bucket_of.insert(key, buckets.len() - 1);
                buckets.len() - 1
            }
        };

        let bucket = &mut buckets[index];
        bucket.size += 1;
        for (accumulator, aggregate) in bucket.accumulators.iter_mut().zip(&spec.aggregates) {
            match lookup_path(&row, &aggregate.field).and_then(Value::as_number) {
                Some(number) => accumulator.add_number(number),
                None => accumulator.add_non_number(),
            }
        }
    }

    buckets
        .into_iter()
        .map(|bucket| {
            let mut row = Record::new();
            for (field, value) in bucket.group_values {
                row.insert(field, value);
            }
            for (aggregate, accumulator) in spec.aggregates.iter().zip(&bucket.accumulators) {
                row.insert(
                    aggregate.output.clone(),
                    Value::Number(accumulator.compute(aggregate.function)),
                );
            }
            row.insert(
                GROUP_COUNT_FIELD.to_string(),
                Value::Number(bucket.size as f64),
            );
            row
        })
        .collect()
}

/// Joined display-string bucket key. The unit separator keeps adjacent
/// values from colliding ("a","bc" vs "ab","c").
fn group_key(row: &Record, group_by: &[String]) -> String {
    let parts: SmallVec<[String; 4]> = group_by
        .iter()
        .map(|field| {
            lookup_path(row, field)
                .map(Value::display_text)
                .unwrap_or_default()
        })
        .collect();
    parts.join("\u{1f}")
}

/// Accumulator for computing aggregates incrementally.
#[derive(Debug, Clone, Default)]
pub struct AggregateAccumulator {
    sum: f64,
    count: u64,
    count_numbers: u64,
    min: Option<f64>,
    max: Option<f64>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator::default()
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.count_numbers += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Adds a non-numeric value (only increments count).
    pub fn add_non_number(&mut self) {
        self.count += 1;
    }

    /// Computes the final aggregate value. COUNT counts all rows; the
    /// numeric aggregates ignore non-numeric members, and AVG divides by the
    /// numeric count.
    pub fn compute(&self, function: AggregateFn) -> f64 {
        match function {
            AggregateFn::Sum => self.sum,
            AggregateFn::Count => self.count as f64,
            AggregateFn::Avg => {
                if self.count_numbers > 0 {
                    self.sum / (self.count_numbers as f64)
                } else {
                    0.0
                }
            }
            AggregateFn::Min => self.min.unwrap_or(0.0),
            AggregateFn::Max => self.max.unwrap_or(0.0),
        }
    }
}
