//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for binding integration tests.

use binding::{BindingLocale, RenderContext};
use dataset_engine::{execute_datasets, DatasetResults, ExecutionOptions, SourceTables};
use model::{Element, Record, Template, Value};

/// Test harness owning everything one render pass borrows: the template,
/// the execution inputs, the executed dataset rows and the locale.
pub struct RenderHarness {
    pub template: Template,
    pub options: ExecutionOptions,
    pub results: DatasetResults,
    pub locale: BindingLocale,
}

impl RenderHarness {
    /// Executes the template's datasets against `options` and captures the
    /// results for binding resolution.
    pub fn new(template: Template, options: ExecutionOptions) -> Self {
        let results = execute_datasets(&template, &options);
        RenderHarness {
            template,
            options,
            results,
            locale: BindingLocale::default(),
        }
    }

    /// Create a harness around the work order fixture.
    pub fn with_work_orders() -> Self {
        Self::new(WorkOrderFixture::template(), WorkOrderFixture::options())
    }

    /// The render context every resolver takes.
    pub fn context(&self) -> RenderContext<'_> {
        RenderContext::new(
            &self.options.record,
            &self.results,
            &self.options.parameters,
            &self.locale,
        )
    }

    /// Fixture element by id; panics on unknown ids so tests fail loudly.
    pub fn element(&self, id: &str) -> &Element {
        self.template
            .element(id)
            .unwrap_or_else(|| panic!("fixture has no element '{}'", id))
    }

    /// Executed rows of a dataset (empty for unknown ids).
    pub fn rows(&self, dataset_id: &str) -> &[Record] {
        self.results
            .get(dataset_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ============================================================================
// WORK ORDER FIXTURE
// ============================================================================

/// A small but complete work order report: a filtered/joined/sorted dataset
/// with a calculated field, a record-linked lines table, a grouped dataset
/// feeding a chart, and every element variant on the canvas.
pub struct WorkOrderFixture;

impl WorkOrderFixture {
    /// The template as it would arrive over the wire.
    pub fn template() -> Template {
        serde_json::from_value(serde_json::json!({
            "id": "tpl-wo",
            "title": "Work order report",
            "targetModule": "work_orders",
            "elements": [
                {
                    "id": "hdr",
                    "band": "reportHeader",
                    "layout": { "x": 0.0, "y": 0.0, "width": 520.0, "height": 48.0 },
                    "type": "header",
                    "props": { "title": "Work orders {{params.period}}" }
                },
                {
                    "id": "txt-summary",
                    "band": "detail",
                    "layout": { "x": 0.0, "y": 56.0, "width": 520.0, "height": 32.0 },
                    "type": "text",
                    "props": { "content": "Order {{tracking_code}} for customer {{customer_id}}" }
                },
                {
                    "id": "stat-total",
                    "band": "reportHeader",
                    "layout": { "x": 0.0, "y": 104.0, "width": 160.0, "height": 64.0 },
                    "type": "statCard",
                    "props": {
                        "label": "Total amount",
                        "dataSource": "ds_orders",
                        "valueField": "amount",
                        "aggregation": "SUM",
                        "unit": "USD"
                    }
                },
                {
                    "id": "stat-count",
                    "band": "reportHeader",
                    "layout": { "x": 168.0, "y": 104.0, "width": 160.0, "height": 64.0 },
                    "type": "statCard",
                    "props": { "label": "Orders", "dataSource": "ds_orders", "aggregation": "COUNT" }
                },
                {
                    "id": "tbl-orders",
                    "band": "detail",
                    "layout": { "x": 0.0, "y": 176.0, "width": 520.0, "height": 200.0 },
                    "type": "table",
                    "props": {
                        "dataSource": "ds_orders",
                        "columns": [
                            { "field": "tracking_code", "label": "Code" },
                            { "field": "customer.name", "label": "Customer" },
                            { "field": "with_tax", "label": "Amount incl. tax", "align": "right" }
                        ]
                    }
                },
                {
                    "id": "tbl-lines",
                    "band": "detail",
                    "layout": { "x": 0.0, "y": 384.0, "width": 520.0, "height": 140.0 },
                    "type": "table",
                    "props": {
                        "dataSource": "ds_lines",
                        "rowFilter": { "field": "order_id", "recordField": "id" },
                        "columns": [
                            { "field": "part", "label": "Part" },
                            { "field": "qty", "label": "Qty" }
                        ]
                    }
                },
                {
                    "id": "chart-status",
                    "band": "reportFooter",
                    "layout": { "x": 0.0, "y": 532.0, "width": 320.0, "height": 180.0 },
                    "type": "chart",
                    "props": {
                        "variant": "bar",
                        "dataSource": "ds_by_status",
                        "labelField": "status",
                        "valueField": "total_amount"
                    }
                },
                {
                    "id": "logo",
                    "band": "pageHeader",
                    "locked": true,
                    "layout": { "x": 432.0, "y": 0.0, "width": 88.0, "height": 40.0 },
                    "type": "image",
                    "props": { "source": "assets/logo.png", "fit": "contain" }
                }
            ],
            "datasets": [
                {
                    "id": "ds_orders",
                    "source": "work_orders",
                    "joins": [
                        {
                            "source": "customers",
                            "localField": "customer_id",
                            "foreignField": "id",
                            "alias": "customer"
                        }
                    ],
                    "filters": [
                        {
                            "field": "amount",
                            "operator": "gte",
                            "value": "min_amount",
                            "source": "parameter"
                        }
                    ],
                    "calculatedFields": [
                        { "key": "with_tax", "expression": "ROUND(amount * 1.09, 2)" }
                    ],
                    "sort": [ { "field": "amount", "direction": "desc" } ]
                },
                { "id": "ds_lines", "source": "lines" },
                {
                    "id": "ds_by_status",
                    "source": "work_orders",
                    "groupBy": ["status"],
                    "aggregates": [ { "field": "amount", "fn": "SUM", "as": "total_amount" } ]
                }
            ],
            "parameters": [
                {
                    "id": "p1",
                    "key": "min_amount",
                    "label": "Minimum amount",
                    "type": "number",
                    "default": 0
                },
                { "id": "p2", "key": "period", "label": "Period", "type": "text" }
            ],
            "pageSettings": { "paperSize": "a4", "orientation": "portrait" }
        }))
        .expect("work order fixture template deserializes")
    }

    /// Source tables, runtime parameters and the active record.
    pub fn options() -> ExecutionOptions {
        let mut tables = SourceTables::default();
        tables.insert(
            "work_orders".to_string(),
            vec![
                work_order("o1", "WO-0001", "c1", "open", 120.0),
                work_order("o2", "WO-0002", "c9", "open", 80.0),
                work_order("o3", "WO-0003", "c1", "closed", 45.0),
                work_order("o4", "WO-0004", "c2", "open", 30.0),
            ],
        );
        tables.insert(
            "customers".to_string(),
            vec![
                customer("c1", "Ali Rezaei", "Tehran"),
                customer("c2", "Hasan Karimi", "Shiraz"),
            ],
        );
        tables.insert(
            "lines".to_string(),
            vec![
                line("l1", "o1", "Brake pads", 2.0),
                line("l2", "o1", "Oil filter", 1.0),
                line("l3", "o2", "Battery", 1.0),
            ],
        );

        let mut parameters = Record::new();
        parameters.insert("min_amount".to_string(), Value::from(40.0));
        parameters.insert("period".to_string(), Value::from("2024-Q1"));

        // The report is rendered for the first work order.
        let record = work_order("o1", "WO-0001", "c1", "open", 120.0);

        ExecutionOptions {
            parameters,
            record,
            tables,
        }
    }
}

fn work_order(id: &str, tracking_code: &str, customer_id: &str, status: &str, amount: f64) -> Record {
    let mut row = Record::new();
    row.insert("id".to_string(), Value::from(id));
    row.insert("tracking_code".to_string(), Value::from(tracking_code));
    row.insert("customer_id".to_string(), Value::from(customer_id));
    row.insert("status".to_string(), Value::from(status));
    row.insert("amount".to_string(), Value::from(amount));
    row
}

fn customer(id: &str, name: &str, city: &str) -> Record {
    let mut row = Record::new();
    row.insert("id".to_string(), Value::from(id));
    row.insert("name".to_string(), Value::from(name));
    row.insert("city".to_string(), Value::from(city));
    row
}

fn line(id: &str, order_id: &str, part: &str, qty: f64) -> Record {
    let mut row = Record::new();
    row.insert("id".to_string(), Value::from(id));
    row.insert("order_id".to_string(), Value::from(order_id));
    row.insert("part".to_string(), Value::from(part));
    row.insert("qty".to_string(), Value::from(qty));
    row
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Assert a resolved value is a number close to `expected`.
pub fn assert_number(value: &Value, expected: f64) {
    match value {
        Value::Number(n) => assert!(
            (n - expected).abs() < 0.001,
            "expected {} but got {}",
            expected,
            n
        ),
        other => panic!("expected Number({}) but got {:?}", expected, other),
    }
}

/// Assert a resolved value is exactly the expected text.
pub fn assert_text(value: &Value, expected: &str) {
    match value {
        Value::Text(text) => assert_eq!(text, expected),
        other => panic!("expected Text({:?}) but got {:?}", expected, other),
    }
}
