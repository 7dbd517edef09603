use actix_web::{web, HttpResponse};
use prospect_core::controller::{prepare_change, prepare_contact};
use prospect_core::ContactStore;
use serde::Deserialize;
use shared_types::{ContactChange, ContactQuery, NewContact};
use std::str::FromStr;
use std::sync::Arc;

use crate::database::Database;
use crate::handlers::error::ApiError;

/// Raw query string of `GET /api/contacts`. Empty values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListContactsParams {
    pub status: Option<String>,
    pub temperature: Option<String>,
    pub proposal_sent: Option<String>,
    pub referral_type: Option<String>,
    pub search: Option<String>,
}

fn parse_param<T: FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, ApiError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => T::from_str(raw)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {} value: {}", name, raw))),
    }
}

impl ListContactsParams {
    pub fn into_query(self) -> Result<ContactQuery, ApiError> {
        Ok(ContactQuery {
            status: parse_param("status", self.status.as_deref())?,
            temperature: parse_param("temperature", self.temperature.as_deref())?,
            // Present means "filter"; only the literal "true" selects sent proposals
            proposal_sent: self.proposal_sent.map(|v| v == "true"),
            referral_type: parse_param("referral_type", self.referral_type.as_deref())?,
            search: self.search.filter(|s| !s.is_empty()),
        })
    }
}

pub async fn list_contacts(
    db: web::Data<Arc<Database>>,
    params: web::Query<ListContactsParams>,
) -> Result<HttpResponse, ApiError> {
    let query = params.into_inner().into_query()?;
    let contacts = db.contact_store().list(&query).await?;

    Ok(HttpResponse::Ok().json(contacts))
}

pub async fn create_contact(
    db: web::Data<Arc<Database>>,
    body: web::Json<NewContact>,
) -> Result<HttpResponse, ApiError> {
    let contact = prepare_contact(body.into_inner())?;
    let created = db.contact_store().insert(contact).await?;

    tracing::info!("Created contact {} ({})", created.id, created.name);
    Ok(HttpResponse::Created().json(created))
}

pub async fn get_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let contact = db.contact_store().get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(contact))
}

pub async fn update_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    body: web::Json<NewContact>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let contact = prepare_contact(body.into_inner())?;
    let updated = db.contact_store().update(&id, contact).await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn patch_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
    body: web::Json<ContactChange>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let change = prepare_change(body.into_inner())?;
    tracing::debug!("Updating {} on contact {}", change.column(), id);

    let updated = db.contact_store().update_field(&id, change).await?;

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    db.contact_store().delete(&id).await?;

    tracing::info!("Deleted contact {}", id);
    Ok(HttpResponse::NoContent().finish())
}
