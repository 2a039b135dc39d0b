//! FILENAME: core/template-store/src/lib.rs
//! PURPOSE: Versioned per-module template persistence for Relato.
//! CONTEXT: Templates are immutable once saved; edits append the next
//! version, exactly one version per module is active, and every effective
//! mutation lands in an append-only audit trail. Storage is pluggable
//! through the StoreBackend seam.

mod backend;
mod error;
mod store;

pub use backend::{FileBackend, MemoryBackend, StoreBackend, StoreSnapshot, TieredBackend};
pub use error::StoreError;
pub use store::{SaveOptions, TemplateStore};
