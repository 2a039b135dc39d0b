//! FILENAME: core/model/src/governance.rs
//! PURPOSE: Access control and approval metadata attached to a template.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Governance {
    /// Roles allowed to use the template. Empty means unrestricted.
    #[serde(default)]
    pub required_roles: Vec<String>,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub approval: Option<Approval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub approved_by: String,
    pub approved_at: DateTime<Utc>,
}

impl Governance {
    /// True when the caller's roles grant access: no required roles, or any
    /// overlap between the two sets.
    pub fn can_access(&self, roles: &[String]) -> bool {
        if self.required_roles.is_empty() {
            return true;
        }
        self.required_roles
            .iter()
            .any(|required| roles.iter().any(|role| role == required))
    }

    /// True when approval is either not required or already granted.
    pub fn is_cleared(&self) -> bool {
        !self.requires_approval || self.approval.is_some()
    }
}
