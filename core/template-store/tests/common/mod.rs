//! FILENAME: tests/common/mod.rs
//! Shared fixtures for template store integration tests.

use model::Template;
use template_store::StoreSnapshot;

/// An empty draft for `module`.
pub fn draft(module: &str) -> Template {
    Template::draft("Quarterly report", module)
}

/// A fully formed stored template, for seeding backends directly.
pub fn stored_template(id: &str, module: &str, version: u32, is_active: bool) -> Template {
    let mut template = Template::draft("Seeded", module);
    template.id = id.to_string();
    template.version = version;
    template.is_active = is_active;
    template
}

/// A snapshot holding `templates` and no audit entries.
pub fn snapshot_of(templates: Vec<Template>) -> StoreSnapshot {
    StoreSnapshot {
        templates,
        audit_log: Vec::new(),
    }
}
