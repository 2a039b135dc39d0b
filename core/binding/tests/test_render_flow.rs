//! FILENAME: tests/test_render_flow.rs
//! Integration tests for the execute-then-bind render flow: a wire-shaped
//! template is deserialized, its datasets run against source tables, and
//! every element binding resolves from the executed rows.

mod common;

use binding::{resolve_binding_value, resolve_chart_series, resolve_table_rows, ChartPoint};
use common::{assert_number, assert_text, RenderHarness};
use dataset_engine::GROUP_COUNT_FIELD;
use model::{lookup_path, ChartProps, Element, ElementProps, TableProps, Value};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn table_props(element: &Element) -> &TableProps {
    match &element.props {
        ElementProps::Table(props) => props,
        other => panic!("expected table props, got {other:?}"),
    }
}

fn chart_props(element: &Element) -> &ChartProps {
    match &element.props {
        ElementProps::Chart(props) => props,
        other => panic!("expected chart props, got {other:?}"),
    }
}

// ============================================================================
// PIPELINE OUTPUT
// ============================================================================

#[test]
fn every_declared_dataset_executes() {
    let harness = RenderHarness::with_work_orders();
    assert_eq!(harness.results.len(), 3);
    assert_eq!(harness.rows("ds_orders").len(), 3);
    assert_eq!(harness.rows("ds_lines").len(), 3);
    assert_eq!(harness.rows("ds_by_status").len(), 2);
}

#[test]
fn orders_pass_through_join_filter_and_sort() {
    let harness = RenderHarness::with_work_orders();
    let rows = harness.rows("ds_orders");

    // min_amount 40 drops WO-0004; descending amount orders the rest.
    let codes: Vec<String> = rows
        .iter()
        .map(|row| row["tracking_code"].display_text())
        .collect();
    assert_eq!(codes, vec!["WO-0001", "WO-0002", "WO-0003"]);

    // Joined customer lands as a nested map; the unmatched one is Null.
    assert_eq!(
        lookup_path(&rows[0], "customer.name"),
        Some(&Value::from("Ali Rezaei"))
    );
    assert_eq!(rows[1]["customer"], Value::Null);
}

#[test]
fn calculated_field_reaches_every_rendered_row() {
    let harness = RenderHarness::with_work_orders();
    for (row, expected) in harness.rows("ds_orders").iter().zip([130.8, 87.2, 49.05]) {
        assert_number(&row["with_tax"], expected);
    }
}

#[test]
fn grouped_rows_carry_the_member_count() {
    let harness = RenderHarness::with_work_orders();
    let rows = harness.rows("ds_by_status");

    assert_eq!(rows[0]["status"], Value::from("open"));
    assert_number(&rows[0]["total_amount"], 230.0);
    assert_number(&rows[0][GROUP_COUNT_FIELD], 3.0);

    assert_eq!(rows[1]["status"], Value::from("closed"));
    assert_number(&rows[1]["total_amount"], 45.0);
    assert_number(&rows[1][GROUP_COUNT_FIELD], 1.0);
}

// ============================================================================
// TEXT AND SCALAR BINDINGS
// ============================================================================

#[test]
fn header_resolves_parameter_placeholders() {
    let harness = RenderHarness::with_work_orders();
    let value = resolve_binding_value(harness.element("hdr"), &harness.context());
    assert_text(&value, "Work orders 2024-Q1");
}

#[test]
fn text_resolves_record_placeholders() {
    let harness = RenderHarness::with_work_orders();
    let value = resolve_binding_value(harness.element("txt-summary"), &harness.context());
    assert_text(&value, "Order WO-0001 for customer c1");
}

#[test]
fn stat_cards_summarize_the_filtered_dataset() {
    let harness = RenderHarness::with_work_orders();
    let context = harness.context();

    let total = resolve_binding_value(harness.element("stat-total"), &context);
    assert_number(&total, 245.0);

    let count = resolve_binding_value(harness.element("stat-count"), &context);
    assert_number(&count, 3.0);
}

// ============================================================================
// TABLES AND CHARTS
// ============================================================================

#[test]
fn orders_table_resolves_joined_cells() {
    let harness = RenderHarness::with_work_orders();
    let rows = resolve_table_rows(table_props(harness.element("tbl-orders")), &harness.context());

    assert_eq!(rows.len(), 3);
    // Column fields are looked up per cell, dotted paths included.
    assert_eq!(
        lookup_path(&rows[0], "customer.name"),
        Some(&Value::from("Ali Rezaei"))
    );
    assert!(lookup_path(&rows[1], "customer.name").is_none());
}

#[test]
fn lines_table_restricts_to_the_active_record() {
    let harness = RenderHarness::with_work_orders();
    let rows = resolve_table_rows(table_props(harness.element("tbl-lines")), &harness.context());

    let parts: Vec<String> = rows.iter().map(|row| row["part"].display_text()).collect();
    assert_eq!(parts, vec!["Brake pads", "Oil filter"]);
}

#[test]
fn chart_plots_the_grouped_dataset() {
    let harness = RenderHarness::with_work_orders();
    let points = resolve_chart_series(chart_props(harness.element("chart-status")), &harness.context());

    assert_eq!(
        points,
        vec![
            ChartPoint {
                label: "open".to_string(),
                value: 230.0,
            },
            ChartPoint {
                label: "closed".to_string(),
                value: 45.0,
            },
        ]
    );
}

#[test]
fn stale_data_source_renders_an_empty_table() {
    let harness = RenderHarness::with_work_orders();
    let props = TableProps {
        data_source: "ds_gone".to_string(),
        columns: Vec::new(),
        row_limit: None,
        sort: None,
        row_filter: None,
        show_header: true,
    };
    assert!(resolve_table_rows(&props, &harness.context()).is_empty());
}
