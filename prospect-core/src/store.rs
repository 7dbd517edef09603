use async_trait::async_trait;
use shared_types::{Contact, ContactChange, ContactQuery, NewContact};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Contact {0} not found")]
    NotFound(String),

    /// Backend failure, message passed through unchanged
    #[error("{0}")]
    Backend(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The table holding contacts.
///
/// Implementations must return rows from [`ContactStore::list`] newest first
/// (by `created_at`, descending) and must make [`ContactStore::insert_many`]
/// all-or-nothing.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list(&self, query: &ContactQuery) -> StoreResult<Vec<Contact>>;
    async fn get(&self, id: &str) -> StoreResult<Contact>;

    async fn insert(&self, contact: NewContact) -> StoreResult<Contact>;
    async fn insert_many(&self, contacts: Vec<NewContact>) -> StoreResult<Vec<Contact>>;

    /// Replace every mutable field (full-form save)
    async fn update(&self, id: &str, contact: NewContact) -> StoreResult<Contact>;
    async fn update_field(&self, id: &str, change: ContactChange) -> StoreResult<Contact>;

    async fn delete(&self, id: &str) -> StoreResult<()>;
}
