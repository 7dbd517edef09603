use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::database::Database;

/// Returns the default path of the contacts database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/prospect-tracker/contacts.db`
/// - **Linux**: `~/.local/share/prospect-tracker/contacts.db`
/// - **Windows**: `%LOCALAPPDATA%\prospect-tracker\contacts.db`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("prospect-tracker").join("contacts.db"))
}

/// Open (creating if needed) the database at `db_path` and run migrations
pub fn initialize_database(db_path: &Path) -> anyhow::Result<Arc<Database>> {
    let db = Database::new(db_path)?;
    Ok(Arc::new(db))
}
