pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;

pub use database::{Database, SqliteContactStore};
pub use handlers::configure;
pub use helpers::auth_gate::AuthGate;
