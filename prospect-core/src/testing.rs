//! Test doubles shared by the unit tests of this crate.

use async_trait::async_trait;
use shared_types::{Contact, ContactChange, ContactQuery, NewContact};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::store::{ContactStore, StoreError, StoreResult};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

fn materialize(new: NewContact, seq: u64) -> Contact {
    Contact {
        id: format!("c{}", seq),
        created_at: format!("2025-01-01T00:00:00.{:06}Z", seq),
        status: new.status,
        name: new.name,
        initial_touchpoint: new.initial_touchpoint,
        last_touchpoint: new.last_touchpoint,
        next_follow_up: new.next_follow_up,
        temperature: new.temperature,
        proposal_sent: new.proposal_sent,
        brief: new.brief,
        phone: new.phone,
        email: new.email,
        referral_source: new.referral_source,
        referral_type: new.referral_type,
        good_fit: new.good_fit,
        notes: new.notes,
    }
}

/// A stand-alone contact with a unique id
pub fn contact(name: &str) -> Contact {
    materialize(NewContact::named(name), next_id())
}

#[derive(Default)]
struct Inner {
    /// Insertion order, oldest first
    rows: Vec<Contact>,
    fail_next: Option<String>,
    list_calls: usize,
    insert_many_calls: usize,
    update_calls: usize,
}

impl Inner {
    fn check_failure(&mut self) -> StoreResult<()> {
        match self.fail_next.take() {
            Some(message) => Err(StoreError::Backend(message)),
            None => Ok(()),
        }
    }

    fn find_mut(&mut self, id: &str) -> StoreResult<&mut Contact> {
        self.rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// In-memory [`ContactStore`] with one-shot failure injection
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, contact: NewContact) -> Contact {
        let row = materialize(contact, next_id());
        self.inner.lock().unwrap().rows.push(row.clone());
        row
    }

    /// Make the next store call of any kind fail with `message`.
    pub fn fail_next(&self, message: &str) {
        self.inner.lock().unwrap().fail_next = Some(message.to_string());
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    pub fn stored(&self, id: &str) -> Option<Contact> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn list_calls(&self) -> usize {
        self.inner.lock().unwrap().list_calls
    }

    pub fn insert_many_calls(&self) -> usize {
        self.inner.lock().unwrap().insert_many_calls
    }

    pub fn update_calls(&self) -> usize {
        self.inner.lock().unwrap().update_calls
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list(&self, query: &ContactQuery) -> StoreResult<Vec<Contact>> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        inner.list_calls += 1;

        let search = query.search.as_ref().map(|s| s.to_lowercase());
        Ok(inner
            .rows
            .iter()
            .rev()
            .filter(|c| query.status.map_or(true, |s| c.status == s))
            .filter(|c| query.temperature.map_or(true, |t| c.temperature == Some(t)))
            .filter(|c| query.proposal_sent.map_or(true, |p| c.proposal_sent == p))
            .filter(|c| query.referral_type.map_or(true, |r| c.referral_type == Some(r)))
            .filter(|c| {
                search
                    .as_ref()
                    .map_or(true, |s| c.name.to_lowercase().contains(s))
            })
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Contact> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        inner.find_mut(id).map(|c| c.clone())
    }

    async fn insert(&self, contact: NewContact) -> StoreResult<Contact> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        let row = materialize(contact, next_id());
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn insert_many(&self, contacts: Vec<NewContact>) -> StoreResult<Vec<Contact>> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        inner.insert_many_calls += 1;

        let rows: Vec<Contact> = contacts
            .into_iter()
            .map(|c| materialize(c, next_id()))
            .collect();
        inner.rows.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn update(&self, id: &str, contact: NewContact) -> StoreResult<Contact> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        inner.update_calls += 1;

        let row = inner.find_mut(id)?;
        let updated = Contact {
            id: row.id.clone(),
            created_at: row.created_at.clone(),
            ..materialize(contact, 0)
        };
        *row = updated.clone();
        Ok(updated)
    }

    async fn update_field(&self, id: &str, change: ContactChange) -> StoreResult<Contact> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        inner.update_calls += 1;

        let row = inner.find_mut(id)?;
        change.apply_to(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;

        let before = inner.rows.len();
        inner.rows.retain(|c| c.id != id);
        if inner.rows.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
