use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use prospect_core::controller::export_file_name;
use prospect_core::ContactStore;
use shared_types::ContactQuery;
use std::sync::Arc;

use crate::database::Database;
use crate::handlers::error::ApiError;

/// Download every contact as a pretty-printed JSON attachment
pub async fn export_contacts(db: web::Data<Arc<Database>>) -> Result<HttpResponse, ApiError> {
    let contacts = db.contact_store().list(&ContactQuery::default()).await?;

    let body = serde_json::to_string_pretty(&contacts)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize contacts: {}", e)))?;
    let file_name = export_file_name(Utc::now().date_naive());

    tracing::info!("Exporting {} contacts as {}", contacts.len(), file_name);

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body))
}
