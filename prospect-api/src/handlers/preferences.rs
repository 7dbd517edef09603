use actix_web::{web, HttpResponse};
use shared_types::Preferences;
use std::sync::Arc;

use crate::database::preferences as preferences_db;
use crate::database::Database;
use crate::handlers::error::ApiError;

pub async fn get_preferences(db: web::Data<Arc<Database>>) -> Result<HttpResponse, ApiError> {
    let preferences = preferences_db::get_preferences(db.async_connection.clone())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(preferences))
}

pub async fn update_preferences(
    db: web::Data<Arc<Database>>,
    body: web::Json<Preferences>,
) -> Result<HttpResponse, ApiError> {
    let preferences = body.into_inner();
    preferences_db::save_preferences(db.async_connection.clone(), &preferences)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save preferences: {}", e);
            ApiError::Internal(e.to_string())
        })?;

    Ok(HttpResponse::Ok().json(preferences))
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::{authed, test_app};
    use actix_web::test;
    use serde_json::json;
    use shared_types::{Preferences, Theme};

    #[actix_web::test]
    async fn test_round_trip_through_api() {
        let (_dir, app) = test_app().await;

        let req = authed(test::TestRequest::get().uri("/api/preferences")).to_request();
        let initial: Preferences = test::call_and_read_body_json(&app, req).await;
        assert_eq!(initial, Preferences::default());

        let req = authed(test::TestRequest::put().uri("/api/preferences"))
            .set_json(json!({ "theme": "dark", "column_visibility": { "notes": false } }))
            .to_request();
        test::call_service(&app, req).await;

        let req = authed(test::TestRequest::get().uri("/api/preferences")).to_request();
        let saved: Preferences = test::call_and_read_body_json(&app, req).await;
        assert_eq!(saved.theme, Theme::Dark);
        assert_eq!(saved.column_visibility.get("notes"), Some(&false));
    }
}
