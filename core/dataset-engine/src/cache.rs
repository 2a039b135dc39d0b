//! FILENAME: core/dataset-engine/src/cache.rs
//! PURPOSE: Process-wide TTL cache for executed dataset results.
//! CONTEXT: Dataset execution is pure, so identical (template version,
//! parameters, record) inputs always produce identical rows. Preview surfaces
//! re-render constantly; this cache short-circuits the pipeline for them.
//!
//! RULES:
//! - entries expire lazily on the next read, there is no background sweep
//! - writes replace by key; the store is capped and evicts oldest-inserted
//! - a poisoned lock degrades to cache misses, never a panic
//! - a render against a record with no id skips the cache entirely

use crate::engine::{execute_datasets, DatasetResults, ExecutionOptions};
use model::{Template, Value};
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Cache tuning. Defaults: 30 second TTL, 32 entries.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl: Duration::from_secs(30),
            capacity: 32,
        }
    }
}

struct CacheEntry {
    key: String,
    results: DatasetResults,
    inserted_at: Instant,
}

/// TTL-keyed store of executed dataset results. Interior Mutex; safe to
/// share between threads behind a static.
pub struct RuntimeCache {
    config: CacheConfig,
    /// Insertion-ordered so capacity eviction drops the oldest entry first.
    entries: Mutex<VecDeque<CacheEntry>>,
}

/// The process-wide instance used by `execute_datasets_cached`.
pub static RUNTIME_CACHE: Lazy<RuntimeCache> = Lazy::new(RuntimeCache::with_defaults);

impl RuntimeCache {
    pub fn new(config: CacheConfig) -> Self {
        RuntimeCache {
            config,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_defaults() -> Self {
        RuntimeCache::new(CacheConfig::default())
    }

    /// Looks up a fresh entry. An expired entry is removed on the way out.
    pub fn get(&self, key: &str) -> Option<DatasetResults> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(_) => return None,
        };
        let index = entries.iter().position(|entry| entry.key == key)?;
        if entries[index].inserted_at.elapsed() > self.config.ttl {
            entries.remove(index);
            return None;
        }
        Some(entries[index].results.clone())
    }

    /// Inserts or replaces an entry, evicting the oldest insertion when the
    /// capacity cap is reached.
    pub fn insert(&self, key: String, results: DatasetResults) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(_) => return,
        };
        if let Some(index) = entries.iter().position(|entry| entry.key == key) {
            entries.remove(index);
        }
        while entries.len() >= self.config.capacity.max(1) {
            entries.pop_front();
        }
        entries.push_back(CacheEntry {
            key,
            results,
            inserted_at: Instant::now(),
        });
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Executes the template's datasets through the cache: a fresh cached result
/// for the same template version, parameters and record is returned as-is.
/// A record whose `id` is missing or renders empty cannot be keyed apart
/// from the next such record, so those renders go straight to the pipeline
/// without touching the cache.
pub fn execute_datasets_cached(
    template: &Template,
    options: &ExecutionOptions,
    cache: &RuntimeCache,
) -> DatasetResults {
    let record_id = options
        .record
        .get("id")
        .map(Value::display_text)
        .unwrap_or_default();
    if record_id.is_empty() {
        return execute_datasets(template, options);
    }
    let key = cache_key(template, options, &record_id);
    if let Some(results) = cache.get(&key) {
        log::debug!("dataset cache hit for template {}", template.id);
        return results;
    }
    let results = execute_datasets(template, options);
    cache.insert(key, results.clone());
    results
}

/// Cache key: template id + version + sorted parameters + the record id.
/// Every component after the version is delimited with the unit separator
/// (the grouping stage's convention), so no parameter name or value can
/// spell out another input's key. Record fields beyond `id` are
/// deliberately not keyed.
fn cache_key(template: &Template, options: &ExecutionOptions, record_id: &str) -> String {
    let mut key = format!("{}:{}", template.id, template.version);
    // BTreeMap iteration is already key-sorted.
    for (name, value) in &options.parameters {
        key.push('\u{1f}');
        key.push_str(name);
        key.push('\u{1f}');
        key.push_str(&value.display_text());
    }
    key.push('\u{1f}');
    key.push_str(record_id);
    key
}
