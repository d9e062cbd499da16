use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::application::{policy_key, FileRef, MAX_DEPENDENTS};
use super::enums::{ConsentDocType, UploadStatus};
use crate::db::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentDependent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default = "default_doc_type")]
    pub document_type: ConsentDocType,
    #[serde(default = "default_upload_status")]
    pub upload_status: UploadStatus,
    #[serde(default)]
    pub file: Option<FileRef>,
}

fn default_doc_type() -> ConsentDocType {
    ConsentDocType::IdCopy
}

fn default_upload_status() -> UploadStatus {
    UploadStatus::Empty
}

impl Default for ConsentDependent {
    fn default() -> Self {
        Self {
            name: String::new(),
            relationship: String::new(),
            id_number: String::new(),
            document_type: default_doc_type(),
            upload_status: default_upload_status(),
            file: None,
        }
    }
}

impl ConsentDependent {
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.relationship.is_empty() && self.id_number.is_empty()
    }
}

/// One captured policyholder consent form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsentRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub address: String,
    /// The consent checkbox; submissions without it are rejected.
    #[serde(default)]
    pub consent_confirmed: bool,
    #[serde(default)]
    pub dependents: Vec<ConsentDependent>,
    #[serde(default)]
    pub holder_signature_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl ConsentRecord {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.dependents.len() > MAX_DEPENDENTS {
            return Err(StoreError::ConstraintViolation(format!(
                "At most {MAX_DEPENDENTS} dependents allowed, got {}",
                self.dependents.len()
            )));
        }
        Ok(())
    }

    pub fn policy_key(&self) -> String {
        policy_key(&self.policy_number)
    }
}
