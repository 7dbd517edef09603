//! Debounced autosave for the Markdown fields (`brief`, `notes`).
//!
//! ```text
//! Viewing --begin_edit/input--> Editing --input--> Pending{deadline}
//! Pending --tick past deadline--> Saving --> Editing
//! any --blur/close (flush)--> Saving --> Viewing
//! ```
//!
//! Time is passed in explicitly, so the owner decides how to drive `tick`.
//! `blur` and `close` both go through `flush`, which drops any pending deadline
//! before saving; the value persisted is always the latest draft.

use shared_types::{Contact, ContactChange};
use std::time::{Duration, Instant};
use strum::{Display, EnumString};
use tracing::debug;

use crate::controller::{DashboardController, DashboardResult};
use crate::store::ContactStore;

pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MarkdownField {
    Brief,
    Notes,
}

impl MarkdownField {
    pub fn title(&self) -> &'static str {
        match self {
            MarkdownField::Brief => "Brief",
            MarkdownField::Notes => "Notes",
        }
    }

    pub fn read<'a>(&self, contact: &'a Contact) -> Option<&'a str> {
        match self {
            MarkdownField::Brief => contact.brief.as_deref(),
            MarkdownField::Notes => contact.notes.as_deref(),
        }
    }

    fn change(&self, value: Option<String>) -> ContactChange {
        match self {
            MarkdownField::Brief => ContactChange::Brief(value),
            MarkdownField::Notes => ContactChange::Notes(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Viewing,
    Editing,
    Pending { deadline: Instant },
    Saving,
}

pub struct MarkdownEditor {
    contact_id: String,
    field: MarkdownField,
    saved: String,
    draft: String,
    state: EditorState,
    delay: Duration,
}

impl MarkdownEditor {
    pub fn open(contact: &Contact, field: MarkdownField) -> Self {
        let value = field.read(contact).unwrap_or_default().to_string();
        Self {
            contact_id: contact.id.clone(),
            field,
            saved: value.clone(),
            draft: value,
            state: EditorState::Viewing,
            delay: AUTOSAVE_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn field(&self) -> MarkdownField {
        self.field
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn saved(&self) -> &str {
        &self.saved
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            EditorState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn begin_edit(&mut self) {
        if self.state == EditorState::Viewing {
            self.state = EditorState::Editing;
        }
    }

    /// Record a keystroke and re-arm the autosave deadline.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.draft = text.into();
        self.state = EditorState::Pending {
            deadline: now + self.delay,
        };
    }

    /// Save if the debounce deadline has passed. Returns whether a save was issued.
    pub async fn tick<S: ContactStore>(
        &mut self,
        now: Instant,
        controller: &mut DashboardController<S>,
    ) -> DashboardResult<bool> {
        match self.state {
            EditorState::Pending { deadline } if now >= deadline => {
                self.state = EditorState::Editing;
                self.save(controller).await
            }
            _ => Ok(false),
        }
    }

    /// Focus left the editor: flush and go back to the rendered view.
    pub async fn blur<S: ContactStore>(
        &mut self,
        controller: &mut DashboardController<S>,
    ) -> DashboardResult<bool> {
        let result = self.flush(controller).await;
        self.state = EditorState::Viewing;
        result
    }

    /// The viewer is closing: flush, then reset the draft to what was saved.
    pub async fn close<S: ContactStore>(
        &mut self,
        controller: &mut DashboardController<S>,
    ) -> DashboardResult<bool> {
        let result = self.flush(controller).await;
        self.draft = self.saved.clone();
        self.state = EditorState::Viewing;
        result
    }

    async fn flush<S: ContactStore>(
        &mut self,
        controller: &mut DashboardController<S>,
    ) -> DashboardResult<bool> {
        if let EditorState::Pending { .. } = self.state {
            self.state = EditorState::Editing;
        }
        self.save(controller).await
    }

    async fn save<S: ContactStore>(
        &mut self,
        controller: &mut DashboardController<S>,
    ) -> DashboardResult<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }

        let value = self.draft.clone();
        let stored = if value.is_empty() {
            None
        } else {
            Some(value.clone())
        };

        debug!(
            "Saving {} for contact {}",
            self.field.title(),
            self.contact_id
        );
        self.state = EditorState::Saving;
        let result = controller
            .update_field(&self.contact_id, self.field.change(stored))
            .await;
        self.state = EditorState::Editing;

        result?;
        self.saved = value;
        Ok(true)
    }
}
