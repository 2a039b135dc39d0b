//! FILENAME: core/template-store/src/backend.rs
//! PURPOSE: Pluggable persistence backends for the template store.
//! CONTEXT: The store keeps its working state in memory; a backend only has
//! to load one snapshot at startup and take the full snapshot back after
//! each mutation. Three implementations cover the deployment shapes:
//! in-memory, a JSON document on disk, and a two-tier primary+shadow
//! arrangement.

use model::{AuditLogEntry, Template};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

// ============================================================================
// SNAPSHOT AND TRAIT
// ============================================================================

/// Everything the store persists, as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub audit_log: Vec<AuditLogEntry>,
}

/// Storage seam the template store reads and writes through.
pub trait StoreBackend: Send + Sync {
    /// Loads the persisted snapshot. A backend with nothing stored yet
    /// returns an empty snapshot, not an error.
    fn load(&self) -> Result<StoreSnapshot, StoreError>;

    /// Persists the full snapshot.
    fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError>;
}

// ============================================================================
// MEMORY BACKEND
// ============================================================================

/// Keeps the snapshot in process memory. For tests and embedded hosts that
/// do not need durability.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Mutex<Option<StoreSnapshot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> Result<StoreSnapshot, StoreError> {
        if let Ok(stored) = self.stored.lock() {
            if let Some(snapshot) = stored.as_ref() {
                return Ok(snapshot.clone());
            }
        }
        Ok(StoreSnapshot::default())
    }

    fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        match self.stored.lock() {
            Ok(mut stored) => {
                *stored = Some(snapshot.clone());
                Ok(())
            }
            Err(_) => Err(StoreError::Backend(
                "memory backend lock poisoned".to_string(),
            )),
        }
    }
}

// ============================================================================
// FILE BACKEND
// ============================================================================

/// One pretty-printed JSON document on disk. Writes go through a sibling
/// temp file and a rename, so a crash mid-write never truncates the stored
/// document. A missing file loads as an empty snapshot.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreBackend for FileBackend {
    fn load(&self) -> Result<StoreSnapshot, StoreError> {
        if !self.path.exists() {
            return Ok(StoreSnapshot::default());
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// ============================================================================
// TIERED BACKEND
// ============================================================================

/// Primary plus local shadow. Reads prefer the primary and fall back to the
/// shadow when the primary fails. Writes go to both tiers; a failed tier is
/// logged instead of failing the write, as long as the other tier took it.
pub struct TieredBackend {
    primary: Box<dyn StoreBackend>,
    shadow: Box<dyn StoreBackend>,
}

impl TieredBackend {
    pub fn new(primary: Box<dyn StoreBackend>, shadow: Box<dyn StoreBackend>) -> Self {
        TieredBackend { primary, shadow }
    }
}

impl StoreBackend for TieredBackend {
    fn load(&self) -> Result<StoreSnapshot, StoreError> {
        match self.primary.load() {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                log::warn!("primary template store failed to load, using shadow: {}", err);
                self.shadow.load()
            }
        }
    }

    fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        let primary = self.primary.persist(snapshot);
        if let Err(err) = &primary {
            log::warn!("primary template store write failed: {}", err);
        }
        let shadow = self.shadow.persist(snapshot);
        if let Err(err) = &shadow {
            log::warn!("shadow template store write failed: {}", err);
        }
        match (primary, shadow) {
            (Err(err), Err(_)) => Err(err),
            _ => Ok(()),
        }
    }
}
