use actix_web::{web, HttpResponse};
use prospect_core::import::{insert_batch, parse_import};
use shared_types::ImportContactsResponse;
use std::sync::Arc;

use crate::database::Database;
use crate::handlers::error::ApiError;

/// Import a raw JSON array of contacts; nameless records are skipped
pub async fn import_contacts(
    db: web::Data<Arc<Database>>,
    body: String,
) -> Result<HttpResponse, ApiError> {
    let batch = parse_import(&body)?;
    let store = db.contact_store();
    let summary = insert_batch(&store, batch).await?;

    Ok(HttpResponse::Ok().json(ImportContactsResponse {
        success: true,
        imported: summary.imported,
        skipped: summary.skipped,
        contacts: summary.contacts,
    }))
}
