//! FILENAME: core/template-store/src/store.rs
//! PURPOSE: Versioned template storage with activation, approval and audit.
//! CONTEXT: Versions compete per target module. Saving never overwrites, it
//! appends the next version, and whenever a module has versions exactly one
//! of them is active. Every mutation is one read-modify-write section under
//! the store lock, then pushed to the backend; a failed backend write is
//! logged and the in-memory state, audit trail included, stands.

use chrono::Utc;
use model::{Approval, AuditEvent, AuditLogEntry, Template};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::backend::{MemoryBackend, StoreBackend, StoreSnapshot};
use crate::error::StoreError;

/// Options for [`TemplateStore::save_template`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Activate the saved version immediately.
    pub activate: bool,
}

pub struct TemplateStore {
    backend: Box<dyn StoreBackend>,
    state: Mutex<StoreSnapshot>,
}

impl TemplateStore {
    /// Opens a store over `backend`, loading whatever it holds.
    pub fn open(backend: Box<dyn StoreBackend>) -> Result<Self, StoreError> {
        let state = backend.load()?;
        Ok(TemplateStore {
            backend,
            state: Mutex::new(state),
        })
    }

    /// Volatile store for tests and embedded hosts.
    pub fn in_memory() -> Self {
        TemplateStore {
            backend: Box::new(MemoryBackend::new()),
            state: Mutex::new(StoreSnapshot::default()),
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Appends the next version of the draft's module and returns the stored
    /// copy. The draft's id, version and flags are ignored; the store
    /// assigns a fresh id, `max existing version + 1`, and fresh timestamps.
    /// With `activate` the new version takes the module's active flag; the
    /// very first version of a module becomes active either way.
    pub fn save_template(
        &self,
        draft: &Template,
        options: SaveOptions,
    ) -> Result<Template, StoreError> {
        let mut state = self.locked()?;

        let next_version = state
            .templates
            .iter()
            .filter(|t| t.target_module == draft.target_module)
            .map(|t| t.version)
            .max()
            .unwrap_or(0)
            + 1;

        let now = Utc::now();
        let mut template = draft.clone();
        template.id = Uuid::new_v4().to_string();
        template.version = next_version;
        template.is_active = options.activate;
        template.created_at = now;
        template.updated_at = now;

        if options.activate {
            for sibling in state
                .templates
                .iter_mut()
                .filter(|t| t.target_module == draft.target_module)
            {
                sibling.is_active = false;
            }
        }

        let index = state.templates.len();
        state.templates.push(template);
        ensure_single_active(&mut state.templates, &draft.target_module);
        // Re-read the pushed copy so invariant promotion (first version of a
        // module) is reflected in what the caller gets back.
        let stored = state.templates[index].clone();

        state.audit_log.push(AuditLogEntry::new(
            AuditEvent::Save,
            &stored.id,
            &stored.target_module,
            stored.version,
        ));
        self.persist_locked(&state);
        Ok(stored)
    }

    /// Moves the module's active flag to this version without creating a new
    /// one. Unknown ids are a no-op returning `false`.
    pub fn set_active_template(&self, id: &str) -> Result<bool, StoreError> {
        let mut state = self.locked()?;

        let module = match state.templates.iter().find(|t| t.id == id) {
            Some(template) => template.target_module.clone(),
            None => return Ok(false),
        };
        let mut version = 0;
        for template in state
            .templates
            .iter_mut()
            .filter(|t| t.target_module == module)
        {
            template.is_active = template.id == id;
            if template.id == id {
                version = template.version;
            }
        }
        ensure_single_active(&mut state.templates, &module);

        state
            .audit_log
            .push(AuditLogEntry::new(AuditEvent::Activate, id, &module, version));
        self.persist_locked(&state);
        Ok(true)
    }

    /// Removes one version. If it was the active one and siblings remain,
    /// the highest remaining version takes over. Unknown ids are a no-op
    /// returning `false`.
    pub fn delete_template_version(&self, id: &str) -> Result<bool, StoreError> {
        let mut state = self.locked()?;

        let index = match state.templates.iter().position(|t| t.id == id) {
            Some(index) => index,
            None => return Ok(false),
        };
        let removed = state.templates.remove(index);
        ensure_single_active(&mut state.templates, &removed.target_module);

        state.audit_log.push(AuditLogEntry::new(
            AuditEvent::Delete,
            &removed.id,
            &removed.target_module,
            removed.version,
        ));
        self.persist_locked(&state);
        Ok(true)
    }

    /// Stamps approval metadata on one version. Unknown ids are a no-op
    /// returning `false`.
    pub fn approve_template(&self, id: &str, approved_by: &str) -> Result<bool, StoreError> {
        let mut state = self.locked()?;

        let (module, version) = match state.templates.iter_mut().find(|t| t.id == id) {
            Some(template) => {
                let now = Utc::now();
                template.governance.approval = Some(Approval {
                    approved_by: approved_by.to_string(),
                    approved_at: now,
                });
                template.updated_at = now;
                (template.target_module.clone(), template.version)
            }
            None => return Ok(false),
        };

        state
            .audit_log
            .push(AuditLogEntry::new(AuditEvent::Approve, id, &module, version));
        self.persist_locked(&state);
        Ok(true)
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// The version rendering should use for a module: the flagged-active
    /// one, else the highest version, else `None`.
    pub fn get_active_template_by_module(&self, module: &str) -> Option<Template> {
        let state = self.state.lock().ok()?;
        state
            .templates
            .iter()
            .filter(|t| t.target_module == module)
            .find(|t| t.is_active)
            .or_else(|| {
                state
                    .templates
                    .iter()
                    .filter(|t| t.target_module == module)
                    .max_by_key(|t| t.version)
            })
            .cloned()
    }

    pub fn get_template(&self, id: &str) -> Option<Template> {
        let state = self.state.lock().ok()?;
        state.templates.iter().find(|t| t.id == id).cloned()
    }

    /// Every stored version, in insertion order.
    pub fn get_all_templates(&self) -> Vec<Template> {
        match self.state.lock() {
            Ok(state) => state.templates.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// A module's versions, newest first.
    pub fn get_templates_by_module(&self, module: &str) -> Vec<Template> {
        let mut versions: Vec<Template> = match self.state.lock() {
            Ok(state) => state
                .templates
                .iter()
                .filter(|t| t.target_module == module)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        };
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        versions
    }

    pub fn get_audit_log(&self) -> Vec<AuditLogEntry> {
        match self.state.lock() {
            Ok(state) => state.audit_log.clone(),
            Err(_) => Vec::new(),
        }
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn locked(&self) -> Result<MutexGuard<'_, StoreSnapshot>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("template store lock poisoned".to_string()))
    }

    /// Pushes the current snapshot to the backend. A write failure is logged
    /// and swallowed: this process keeps serving from memory, audit trail
    /// included, and the next successful write catches the backend up.
    fn persist_locked(&self, state: &StoreSnapshot) {
        if let Err(err) = self.backend.persist(state) {
            log::error!("template store persistence failed: {}", err);
        }
    }
}

/// Re-establishes the per-module invariant: whenever a module has versions,
/// exactly one of them is active. With no active flag left the highest
/// version is promoted; with several, the highest-versioned active one wins.
fn ensure_single_active(templates: &mut [Template], module: &str) {
    let active = templates
        .iter()
        .filter(|t| t.target_module == module && t.is_active)
        .count();
    if active == 1 {
        return;
    }

    let promote = templates
        .iter()
        .filter(|t| t.target_module == module && (active == 0 || t.is_active))
        .max_by_key(|t| t.version)
        .map(|t| t.id.clone());

    if let Some(promote) = promote {
        for template in templates.iter_mut().filter(|t| t.target_module == module) {
            template.is_active = template.id == promote;
        }
    }
}
