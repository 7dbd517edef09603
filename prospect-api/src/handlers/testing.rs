use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use actix_http::Request;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::database::Database;
use crate::helpers::auth_gate::{AuthGate, AUTH_COOKIE_NAME, AUTH_COOKIE_VALUE};

pub const TEST_PASSWORD: &str = "open-sesame";

pub fn authed(req: test::TestRequest) -> test::TestRequest {
    req.cookie(Cookie::new(AUTH_COOKIE_NAME, AUTH_COOKIE_VALUE))
}

pub async fn test_app() -> (
    tempfile::TempDir,
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
) {
    test_app_with_auth(AuthConfig {
        master_password: Some(TEST_PASSWORD.to_string()),
        secure_cookie: false,
    })
    .await
}

/// Full app behind the auth gate, on a fresh database in a temp directory
pub async fn test_app_with_auth(
    auth: AuthConfig,
) -> (
    tempfile::TempDir,
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
) {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::new(&dir.path().join("contacts.db")).unwrap());

    let app = test::init_service(
        App::new()
            .wrap(AuthGate)
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(auth))
            .configure(crate::handlers::configure),
    )
    .await;

    (dir, app)
}
