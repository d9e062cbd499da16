use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DocumentKind, PlanTier};
use crate::db::StoreError;

/// Maximum dependents per policy; fixed by the paper form layout.
pub const MAX_DEPENDENTS: usize = 5;

/// Reference to a file held by the blob store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    /// Public address where the file can be retrieved.
    pub url: String,
    /// Original filename as uploaded.
    pub name: String,
    /// Storage path inside the blob store.
    pub path: String,
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependent {
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: String,
}

impl Dependent {
    /// An all-blank entry; rendered as blank content, never an error.
    pub fn is_blank(&self) -> bool {
        self.id_number.is_empty()
            && self.surname.is_empty()
            && self.name.is_empty()
            && self.relationship.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    pub id_number: String,
}

/// One captured funeral-policy application.
///
/// All textual fields are free-form strings; the model enforces structural
/// shape only (dependent count, fixed enum sets). Semantic checks like ID
/// checksums or date parsing belong to the capturing UI, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    /// May be empty at draft time; uniqueness is not enforced here.
    #[serde(default)]
    pub policy_no: String,
    #[serde(default)]
    pub plan: Option<PlanTier>,
    #[serde(default)]
    pub premium: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub cell_no: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub residential_address: String,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    #[serde(default)]
    pub beneficiary: Option<Beneficiary>,
    #[serde(default)]
    pub capturer: String,
    #[serde(default)]
    pub checked_by: String,
    /// Free-form string; not validated as a calendar date.
    #[serde(default)]
    pub qualifying_date: String,
    /// Supporting documents, keyed by the fixed document-kind set.
    #[serde(default)]
    pub documents: BTreeMap<DocumentKind, FileRef>,
    /// Address of the generated PDF, patched on after composition.
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl ApplicationRecord {
    /// Structural validation at the model boundary.
    ///
    /// A record with more than [`MAX_DEPENDENTS`] dependents is rejected
    /// outright rather than truncated; the paper form has exactly five rows.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.dependents.len() > MAX_DEPENDENTS {
            return Err(StoreError::ConstraintViolation(format!(
                "At most {MAX_DEPENDENTS} dependents allowed, got {}",
                self.dependents.len()
            )));
        }
        Ok(())
    }

    /// Policy number sanitized for use as a storage path segment.
    pub fn policy_key(&self) -> String {
        policy_key(&self.policy_no)
    }
}

/// Collapse whitespace to underscores; empty policy numbers file under
/// `UNASSIGNED` until one is issued.
pub fn policy_key(policy_no: &str) -> String {
    let trimmed = policy_no.trim();
    if trimmed.is_empty() {
        return "UNASSIGNED".into();
    }
    trimmed.split_whitespace().collect::<Vec<_>>().join("_")
}
