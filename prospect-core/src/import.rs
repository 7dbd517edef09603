//! Bulk import of pasted JSON.
//!
//! Records without a name are skipped and counted; the batch only fails when
//! the text is not a JSON array or nothing usable remains. Valid records go to
//! the store in a single `insert_many`.

use serde_json::Value;
use shared_types::{Contact, NewContact};
use thiserror::Error;
use tracing::{info, warn};

use crate::normalizer::normalize_contact;
use crate::store::{ContactStore, StoreError};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Please paste JSON data to import.")]
    Empty,

    #[error("Invalid JSON format. Please check your syntax.")]
    InvalidFormat(#[source] serde_json::Error),

    #[error("Expected an array of contacts. Got: {0}")]
    ExpectedArray(&'static str),

    #[error("No valid contacts to import. All contacts were missing required fields.")]
    NoValidContacts { skipped: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Normalized records ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub contacts: Vec<NewContact>,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub contacts: Vec<Contact>,
}

impl ImportSummary {
    /// Operator-facing summary, e.g. "Successfully imported 2 contacts. 1 contact was skipped (missing name)."
    pub fn message(&self) -> String {
        let mut message = format!(
            "Successfully imported {} contact{}.",
            self.imported,
            if self.imported == 1 { "" } else { "s" }
        );
        if self.skipped > 0 {
            message.push_str(&format!(
                " {} contact{} skipped (missing name).",
                self.skipped,
                if self.skipped == 1 { " was" } else { "s were" }
            ));
        }
        message
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse pasted text into a batch without touching the store.
pub fn parse_import(text: &str) -> Result<ImportBatch, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let parsed: Value = serde_json::from_str(text).map_err(ImportError::InvalidFormat)?;
    normalize_batch(&parsed)
}

/// Normalize an already-parsed JSON document.
pub fn normalize_batch(parsed: &Value) -> Result<ImportBatch, ImportError> {
    let records = parsed
        .as_array()
        .ok_or_else(|| ImportError::ExpectedArray(json_type_name(parsed)))?;

    let mut contacts = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for record in records {
        match normalize_contact(record) {
            Some(contact) => contacts.push(contact),
            None => skipped += 1,
        }
    }

    if contacts.is_empty() {
        return Err(ImportError::NoValidContacts { skipped });
    }

    Ok(ImportBatch { contacts, skipped })
}

/// Insert every valid record of an already-normalized batch in one call.
pub async fn insert_batch<S>(store: &S, batch: ImportBatch) -> Result<ImportSummary, ImportError>
where
    S: ContactStore + ?Sized,
{
    let skipped = batch.skipped;
    let contacts = store.insert_many(batch.contacts).await.map_err(|e| {
        warn!("Bulk insert failed: {}", e);
        ImportError::Store(e)
    })?;

    info!(
        "Imported {} contacts ({} skipped)",
        contacts.len(),
        skipped
    );

    Ok(ImportSummary {
        imported: contacts.len(),
        skipped,
        contacts,
    })
}

/// Parse, normalize and insert pasted JSON text.
pub async fn import_contacts<S>(store: &S, text: &str) -> Result<ImportSummary, ImportError>
where
    S: ContactStore + ?Sized,
{
    let batch = parse_import(text)?;
    insert_batch(store, batch).await
}

/// Example payload the operator can copy as a starting point.
pub fn import_schema_template() -> String {
    let template = serde_json::json!([{
        "name": "Contact Name (required)",
        "status": "Prospect | Signed On | Archived",
        "email": "email@example.com",
        "phone": "555-1234",
        "temperature": "Hot | Warm | Lukewarm | Cold",
        "initial_touchpoint": "2024-01-15",
        "last_touchpoint": "2024-01-20",
        "next_follow_up": "2024-02-01",
        "proposal_sent": false,
        "brief": "Markdown text...",
        "notes": "Markdown text...",
        "referral_source": "Referrer name",
        "referral_type": "Organic | BNI | Client | Family | Other",
        "good_fit": "Yes | No | Maybe"
    }]);

    serde_json::to_string_pretty(&template).unwrap_or_default()
}
