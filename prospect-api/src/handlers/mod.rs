pub mod auth;
pub mod contacts;
pub mod error;
pub mod export;
pub mod import;
pub mod preferences;

#[cfg(test)]
pub(crate) mod testing;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::database::Database;

/// Upper bound for request bodies (pasted imports can be large)
const MAX_PAYLOAD_BYTES: usize = 4 * 1024 * 1024;

pub async fn health(db: web::Data<Arc<Database>>) -> HttpResponse {
    match db.async_connection.lock().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

/// Register every route; app data (`Arc<Database>`, `AuthConfig`) is added by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
        .app_data(web::JsonConfig::default().limit(MAX_PAYLOAD_BYTES))
        .route("/health", web::get().to(health))
        .route("/login", web::get().to(auth::login_page))
        .route("/api/auth/login", web::post().to(auth::login))
        .route("/api/auth/logout", web::post().to(auth::logout))
        .route("/api/contacts", web::get().to(contacts::list_contacts))
        .route("/api/contacts", web::post().to(contacts::create_contact))
        .route("/api/contacts/{id}", web::get().to(contacts::get_contact))
        .route("/api/contacts/{id}", web::put().to(contacts::update_contact))
        .route("/api/contacts/{id}", web::patch().to(contacts::patch_contact))
        .route("/api/contacts/{id}", web::delete().to(contacts::delete_contact))
        .route("/api/export", web::get().to(export::export_contacts))
        .route("/api/import", web::post().to(import::import_contacts))
        .route("/api/preferences", web::get().to(preferences::get_preferences))
        .route("/api/preferences", web::put().to(preferences::update_preferences));
}
