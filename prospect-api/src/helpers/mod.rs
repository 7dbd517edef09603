pub mod auth_gate;
pub mod database;
