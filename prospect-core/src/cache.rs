use shared_types::{Contact, ContactChange};

use crate::filter::{filter_contacts, tab_counts, ContactFilter, TabCounts};

/// Local mirror of the contacts table.
///
/// Two ways to reconcile with the store: [`ContactCache::replace_all`] after a
/// full reload, and [`ContactCache::patch_field`] for an optimistic single
/// field edit.
#[derive(Debug, Clone, Default)]
pub struct ContactCache {
    contacts: Vec<Contact>,
    loaded: bool,
}

impl ContactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly fetched list (newest first).
    pub fn replace_all(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
        self.loaded = true;
    }

    /// Apply a change to the cached row in place. Returns false if the row is
    /// not cached.
    pub fn patch_field(&mut self, id: &str, change: &ContactChange) -> bool {
        match self.contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                change.apply_to(contact);
                true
            }
            None => false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn filtered(&self, filter: &ContactFilter) -> Vec<&Contact> {
        filter_contacts(&self.contacts, filter)
    }

    pub fn counts(&self) -> TabCounts {
        tab_counts(&self.contacts)
    }
}
