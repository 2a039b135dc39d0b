//! FILENAME: core/dataset-engine/src/lib.rs
//! PURPOSE: Library root for the Relato dataset execution engine.
//! CONTEXT: Transforms a template's declarative dataset specifications plus
//! host-provided tables into the rows the binding layer renders. Pure and
//! synchronous; the only shared state is the optional runtime cache.

pub mod cache;
pub mod engine;

pub use cache::{execute_datasets_cached, CacheConfig, RuntimeCache, RUNTIME_CACHE};
pub use engine::{
    execute_datasets, sort_rows, AggregateAccumulator, DatasetResults, ExecutionOptions,
    SourceTables, GROUP_COUNT_FIELD,
};
