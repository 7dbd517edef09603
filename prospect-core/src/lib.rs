//! Prospect Core
//!
//! Contact handling that does not depend on how contacts are stored or served:
//! normalizing untrusted input, filtering the dashboard list, and keeping a
//! local mirror of the table in step with a [`ContactStore`].
//!
//! # Modules
//!
//! - `phone`: `(XXX) XXX-XXXX` formatting, stripping and validation
//! - `normalizer`: loosely-typed JSON record -> [`shared_types::NewContact`]
//! - `import`: bulk import of pasted JSON arrays
//! - `filter`: tab/search/enum/proposal predicates over the cached list
//! - `store`: the [`ContactStore`] trait implemented by backends
//! - `cache` / `controller`: the dashboard's local mirror and its reconciliation rules
//! - `autosave`: debounced Markdown editing for `brief` and `notes`
//!
//! # Example
//!
//! ```rust,ignore
//! use prospect_core::{ContactFilter, DashboardController, StatusTab};
//!
//! let mut dashboard = DashboardController::new(store);
//! dashboard.fetch_all().await?;
//! let prospects = dashboard.cache().filtered(&ContactFilter::for_tab(StatusTab::Prospect));
//! ```

pub mod autosave;
pub mod cache;
pub mod controller;
pub mod filter;
pub mod import;
pub mod normalizer;
pub mod notice;
pub mod phone;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use autosave::{EditorState, MarkdownEditor, MarkdownField};
pub use cache::ContactCache;
pub use controller::{DashboardController, DashboardError, ExportFile};
pub use filter::{filter_contacts, ContactFilter, FieldFilter, ProposalFilter, StatusTab, TabCounts};
pub use import::{import_contacts, ImportError, ImportSummary};
pub use notice::{Notice, NoticeLevel};
pub use phone::{format_phone_number, is_valid_phone_number, strip_phone_number};
pub use store::{ContactStore, StoreError, StoreResult};
