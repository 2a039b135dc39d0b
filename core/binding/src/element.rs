//! FILENAME: core/binding/src/element.rs
//! PURPOSE: Resolves each element's declared binding to renderable data.
//! CONTEXT: Elements declare WHAT they show (a dataset id, a field, a
//! summary function); this module turns those declarations plus the executed
//! dataset rows into concrete values. Resolution is total per element: a
//! broken binding renders as Null/empty, never as a failed document.

use crate::context::RenderContext;
use crate::format::display_value;
use dataset_engine::{sort_rows, AggregateAccumulator};
use model::{
    lookup_path, AggregateFn, ChartProps, Element, ElementProps, Record, StatCardProps, SummaryFn,
    TableProps, Value,
};

/// One rendered chart sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Resolves the value behind an element's binding, exhaustively per variant.
///
/// Header and text produce their placeholder-resolved text, stat cards a
/// scalar, tables an array of row maps, charts an array of
/// `{label, value}` maps, and images their source reference (Null when
/// blank).
pub fn resolve_binding_value(element: &Element, context: &RenderContext) -> Value {
    match &element.props {
        ElementProps::Header(props) => Value::Text(context.resolve_text(&props.title)),
        ElementProps::Text(props) => Value::Text(context.resolve_text(&props.content)),
        ElementProps::StatCard(props) => resolve_stat_card(props, context),
        ElementProps::Table(props) => Value::Array(
            resolve_table_rows(props, context)
                .into_iter()
                .map(Value::Map)
                .collect(),
        ),
        ElementProps::Chart(props) => Value::Array(
            resolve_chart_series(props, context)
                .into_iter()
                .map(|point| {
                    let mut map = Record::new();
                    map.insert("label".to_string(), Value::Text(point.label));
                    map.insert("value".to_string(), Value::Number(point.value));
                    Value::Map(map)
                })
                .collect(),
        ),
        ElementProps::Image(props) => {
            if props.source.trim().is_empty() {
                Value::Null
            } else {
                Value::Text(props.source.clone())
            }
        }
    }
}

/// A declared binding (dataSource + aggregation, plus valueField for
/// SUM/AVG) wins over `staticValue`; the literal only shows when no binding
/// is declared. An incomplete SUM/AVG binding resolves to Null.
fn resolve_stat_card(props: &StatCardProps, context: &RenderContext) -> Value {
    if let (Some(source), Some(function)) = (&props.data_source, props.aggregation) {
        let rows = context.dataset_rows(source);
        return compute_summary(rows, props.value_field.as_deref(), function);
    }
    props.static_value.clone().unwrap_or(Value::Null)
}

fn compute_summary(rows: &[Record], value_field: Option<&str>, function: SummaryFn) -> Value {
    if function == SummaryFn::Count {
        return Value::Number(rows.len() as f64);
    }
    let field = match value_field {
        Some(field) => field,
        None => return Value::Null,
    };
    let mut accumulator = AggregateAccumulator::new();
    for row in rows {
        match lookup_path(row, field).and_then(Value::as_number) {
            Some(number) => accumulator.add_number(number),
            None => accumulator.add_non_number(),
        }
    }
    Value::Number(accumulator.compute(summary_to_aggregate(function)))
}

fn summary_to_aggregate(function: SummaryFn) -> AggregateFn {
    match function {
        SummaryFn::Count => AggregateFn::Count,
        SummaryFn::Sum => AggregateFn::Sum,
        SummaryFn::Avg => AggregateFn::Avg,
    }
}

/// Produces the rows a table element renders, in order: the optional
/// equality `rowFilter` against the current record, the table's own sort
/// override, then `rowLimit`. The dataset's rows themselves are untouched.
pub fn resolve_table_rows(props: &TableProps, context: &RenderContext) -> Vec<Record> {
    let mut rows = context.dataset_rows(&props.data_source).to_vec();

    if let Some(filter) = &props.row_filter {
        let expected = lookup_path(context.record, &filter.record_field)
            .map(Value::display_text)
            .unwrap_or_default();
        rows.retain(|row| {
            lookup_path(row, &filter.field)
                .map(Value::display_text)
                .unwrap_or_default()
                == expected
        });
    }

    if let Some(sort) = &props.sort {
        sort_rows(&mut rows, std::slice::from_ref(sort));
    }

    if let Some(limit) = props.row_limit {
        rows.truncate(limit);
    }

    rows
}

/// Produces chart samples, one per row, or one per label group when an
/// aggregation is declared. Grouped points keep first-encounter label order;
/// rows whose rendered labels coincide collapse into one group.
pub fn resolve_chart_series(props: &ChartProps, context: &RenderContext) -> Vec<ChartPoint> {
    let rows = context.dataset_rows(&props.data_source);

    let function = match props.aggregation {
        Some(function) => function,
        None => {
            return rows
                .iter()
                .map(|row| ChartPoint {
                    label: row_label(row, &props.label_field, context),
                    value: lookup_path(row, &props.value_field)
                        .and_then(Value::as_number)
                        .unwrap_or(0.0),
                })
                .collect();
        }
    };

    // Charts carry few labels, so a linear scan beats hashing here.
    let mut groups: Vec<(String, AggregateAccumulator)> = Vec::new();
    for row in rows {
        let label = row_label(row, &props.label_field, context);
        let index = match groups.iter().position(|(existing, _)| *existing == label) {
            Some(index) => index,
            None => {
                groups.push((label, AggregateAccumulator::new()));
                groups.len() - 1
            }
        };
        match lookup_path(row, &props.value_field).and_then(Value::as_number) {
            Some(number) => groups[index].1.add_number(number),
            None => groups[index].1.add_non_number(),
        }
    }

    let aggregate = summary_to_aggregate(function);
    groups
        .into_iter()
        .map(|(label, accumulator)| ChartPoint {
            label,
            value: accumulator.compute(aggregate),
        })
        .collect()
}

fn row_label(row: &Record, label_field: &str, context: &RenderContext) -> String {
    lookup_path(row, label_field)
        .map(|value| display_value(value, context.locale))
        .unwrap_or_default()
}
