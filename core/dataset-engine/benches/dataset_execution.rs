//! Dataset pipeline benchmarks
//!
//! Measures the full execute_datasets path (join + filter + calculated
//! fields + sort + grouping) over synthetic order tables of growing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataset_engine::{execute_datasets, ExecutionOptions, SourceTables};
use model::{
    AggregateFn, AggregateSpec, CalculatedField, DatasetSpec, FilterOperator, FilterSource,
    FilterSpec, JoinSpec, Record, SortDirection, SortKey, Template, Value,
};

fn generate_orders(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut row = Record::new();
            row.insert("id".to_string(), Value::from(format!("o{i}")));
            row.insert(
                "customer_id".to_string(),
                Value::from(format!("c{}", i % 50)),
            );
            row.insert("dept".to_string(), Value::from(format!("dept-{}", i % 8)));
            row.insert("amount".to_string(), Value::from((i % 997) as f64 * 1.5));
            row
        })
        .collect()
}

fn generate_customers(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut row = Record::new();
            row.insert("id".to_string(), Value::from(format!("c{i}")));
            row.insert("name".to_string(), Value::from(format!("Customer {i}")));
            row
        })
        .collect()
}

fn full_pipeline_template() -> Template {
    let mut template = Template::draft("Bench", "bench");
    template.datasets.push(DatasetSpec {
        id: "ds".to_string(),
        source: "orders".to_string(),
        alias: None,
        joins: vec![JoinSpec {
            source: "customers".to_string(),
            local_field: "customer_id".to_string(),
            foreign_field: "id".to_string(),
            alias: Some("customer".to_string()),
        }],
        filters: vec![FilterSpec {
            field: "amount".to_string(),
            operator: FilterOperator::Gt,
            value: Value::from(10.0),
            source: FilterSource::Literal,
        }],
        sort: vec![SortKey {
            field: "amount".to_string(),
            direction: SortDirection::Desc,
        }],
        group_by: vec![],
        aggregates: vec![],
        calculated_fields: vec![CalculatedField {
            key: "with_tax".to_string(),
            expression: "ROUND(amount * 1.09, 2)".to_string(),
        }],
        master_dataset_id: None,
        relation_field: None,
    });
    template
}

fn grouping_template() -> Template {
    let mut template = Template::draft("Bench", "bench");
    template.datasets.push(DatasetSpec {
        id: "ds".to_string(),
        source: "orders".to_string(),
        alias: None,
        joins: vec![],
        filters: vec![],
        sort: vec![],
        group_by: vec!["dept".to_string()],
        aggregates: vec![
            AggregateSpec {
                field: "amount".to_string(),
                function: AggregateFn::Sum,
                output: "total".to_string(),
            },
            AggregateSpec {
                field: "amount".to_string(),
                function: AggregateFn::Avg,
                output: "mean".to_string(),
            },
        ],
        calculated_fields: vec![],
        master_dataset_id: None,
        relation_field: None,
    });
    template
}

fn options_with_rows(orders: usize) -> ExecutionOptions {
    let mut tables = SourceTables::default();
    tables.insert("orders".to_string(), generate_orders(orders));
    tables.insert("customers".to_string(), generate_customers(50));
    ExecutionOptions {
        parameters: Record::new(),
        record: Record::new(),
        tables,
    }
}

fn bench_full_pipeline_1k(c: &mut Criterion) {
    let template = full_pipeline_template();
    let options = options_with_rows(1_000);

    c.bench_function("execute_full_pipeline_1k_rows", |b| {
        b.iter(|| execute_datasets(black_box(&template), black_box(&options)))
    });
}

fn bench_full_pipeline_10k(c: &mut Criterion) {
    let template = full_pipeline_template();
    let options = options_with_rows(10_000);

    c.bench_function("execute_full_pipeline_10k_rows", |b| {
        b.iter(|| execute_datasets(black_box(&template), black_box(&options)))
    });
}

fn bench_grouping_10k(c: &mut Criterion) {
    let template = grouping_template();
    let options = options_with_rows(10_000);

    c.bench_function("group_and_aggregate_10k_rows", |b| {
        b.iter(|| execute_datasets(black_box(&template), black_box(&options)))
    });
}

criterion_group!(
    benches,
    bench_full_pipeline_1k,
    bench_full_pipeline_10k,
    bench_grouping_10k
);
criterion_main!(benches);
