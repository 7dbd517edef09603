//! Mediates every read and write between the operator and the contact store,
//! keeping a [`ContactCache`] in sync.
//!
//! Reconciliation rules:
//! - inline field edits patch the cache first and fall back to a full reload
//!   if the store rejects them;
//! - creates, saves, status changes, deletes and imports always end with a
//!   full reload, since they can move rows between tabs.

use chrono::{NaiveDate, Utc};
use shared_types::{Contact, ContactChange, ContactQuery, ContactStatus, NewContact};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::cache::ContactCache;
use crate::import::{import_contacts, ImportError, ImportSummary};
use crate::notice::Notice;
use crate::phone::format_phone_number;
use crate::store::{ContactStore, StoreError};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to {action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Failed to serialize contacts: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DashboardError {
    fn store(action: &'static str) -> impl FnOnce(StoreError) -> DashboardError {
        move |source| DashboardError::Store { action, source }
    }

    /// Destructive notice to show the operator
    pub fn notice(&self) -> Notice {
        Notice::error(self.to_string())
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// A downloadable export of the whole table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub body: String,
    pub count: usize,
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("contacts-export-{}.json", date.format("%Y-%m-%d"))
}

/// Trim the name and bring the phone into display format.
pub fn prepare_contact(mut contact: NewContact) -> DashboardResult<NewContact> {
    let name = contact.name.trim();
    if name.is_empty() {
        return Err(DashboardError::Validation("Name is required.".to_string()));
    }
    contact.name = name.to_string();
    contact.phone = prepare_phone(contact.phone);
    Ok(contact)
}

/// Applies the same rules as [`prepare_contact`] to a single field.
pub fn prepare_change(change: ContactChange) -> DashboardResult<ContactChange> {
    match change {
        ContactChange::Name(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(DashboardError::Validation("Name is required.".to_string()));
            }
            Ok(ContactChange::Name(name.to_string()))
        }
        ContactChange::Phone(phone) => Ok(ContactChange::Phone(prepare_phone(phone))),
        other => Ok(other),
    }
}

fn prepare_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| format_phone_number(&p))
        .filter(|p| !p.is_empty())
}

pub struct DashboardController<S> {
    store: S,
    cache: ContactCache,
}

impl<S: ContactStore> DashboardController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: ContactCache::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &ContactCache {
        &self.cache
    }

    /// Reload the whole table into the cache, newest first.
    pub async fn fetch_all(&mut self) -> DashboardResult<usize> {
        let contacts = self
            .store
            .list(&ContactQuery::default())
            .await
            .map_err(|e| {
                error!("Error fetching contacts: {}", e);
                DashboardError::store("load contacts")(e)
            })?;

        let count = contacts.len();
        self.cache.replace_all(contacts);
        Ok(count)
    }

    pub async fn create(&mut self, contact: NewContact) -> DashboardResult<Notice> {
        let contact = prepare_contact(contact)?;
        let created = self
            .store
            .insert(contact)
            .await
            .map_err(DashboardError::store("create contact"))?;

        info!("Created contact {}", created.id);
        self.fetch_all().await?;
        Ok(Notice::info(
            "Contact Created",
            format!("{} has been added.", created.name),
        ))
    }

    /// Full-form save of an existing contact.
    pub async fn save(&mut self, id: &str, contact: NewContact) -> DashboardResult<Notice> {
        let contact = prepare_contact(contact)?;
        let saved = self
            .store
            .update(id, contact)
            .await
            .map_err(DashboardError::store("save contact"))?;

        self.fetch_all().await?;
        Ok(Notice::info(
            "Contact Updated",
            format!("{} has been updated.", saved.name),
        ))
    }

    /// Inline single-field edit.
    ///
    /// The cache is patched before the store answers. If the store fails, the
    /// cache is rebuilt from a full reload, so the table shows what the store
    /// actually holds.
    pub async fn update_field(&mut self, id: &str, change: ContactChange) -> DashboardResult<Notice> {
        let change = prepare_change(change)?;
        self.cache.patch_field(id, &change);

        match self.store.update_field(id, change).await {
            Ok(_) => Ok(Notice::info("Updated", "Field updated successfully.")),
            Err(e) => {
                error!("Error updating field on {}: {}", id, e);
                if let Err(reload) = self.fetch_all().await {
                    warn!("Reload after failed update also failed: {}", reload);
                }
                Err(DashboardError::store("update field")(e))
            }
        }
    }

    pub async fn change_status(
        &mut self,
        id: &str,
        status: ContactStatus,
    ) -> DashboardResult<Notice> {
        let updated = self
            .store
            .update_field(id, ContactChange::Status(status))
            .await
            .map_err(|e| {
                error!("Error updating status on {}: {}", id, e);
                DashboardError::store("update contact status")(e)
            })?;

        self.fetch_all().await?;
        Ok(Notice::info(
            "Status Updated",
            format!("{} has been moved to {}.", updated.name, status),
        ))
    }

    /// Permanently delete a contact. Confirmation is the caller's job.
    pub async fn delete(&mut self, id: &str) -> DashboardResult<Notice> {
        let name = self.cache.get(id).map(|c| c.name.clone());

        self.store.delete(id).await.map_err(|e| {
            error!("Error deleting contact {}: {}", id, e);
            DashboardError::store("delete contact")(e)
        })?;

        self.fetch_all().await?;
        Ok(Notice::info(
            "Contact Deleted",
            format!(
                "{} has been permanently deleted.",
                name.as_deref().unwrap_or("Contact")
            ),
        ))
    }

    pub async fn import(&mut self, text: &str) -> DashboardResult<(ImportSummary, Notice)> {
        let summary = import_contacts(&self.store, text).await?;
        let notice = Notice::info("Import Complete", summary.message());

        self.fetch_all().await?;
        Ok((summary, notice))
    }

    /// Reload, then serialize the whole table as pretty-printed JSON.
    pub async fn export(&mut self) -> DashboardResult<ExportFile> {
        self.fetch_all().await?;
        let contacts: &[Contact] = self.cache.contacts();

        Ok(ExportFile {
            file_name: export_file_name(Utc::now().date_naive()),
            body: serde_json::to_string_pretty(contacts)?,
            count: contacts.len(),
        })
    }
}
