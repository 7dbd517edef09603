use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

pub const AUTH_COOKIE_NAME: &str = "prospect-tracker-auth";
pub const AUTH_COOKIE_VALUE: &str = "authenticated";

/// Paths reachable without the session cookie (prefix match)
pub const PUBLIC_PREFIXES: &[&str] = &["/login", "/api/auth/login", "/health"];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Redirects every request lacking the session cookie to `/login`
#[derive(Clone, Copy, Default)]
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthGateService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);

        let authenticated = req
            .cookie(AUTH_COOKIE_NAME)
            .is_some_and(|cookie| cookie.value() == AUTH_COOKIE_VALUE);

        if authenticated || is_public_path(req.path()) {
            return Box::pin(async move {
                let res = srv.call(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        tracing::debug!("Redirecting unauthenticated request for {}", req.path());

        Box::pin(async move {
            Ok(req.into_response(
                HttpResponse::Found()
                    .insert_header((header::LOCATION, "/login"))
                    .finish()
                    .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};

    async fn ok_handler() -> HttpResponse {
        HttpResponse::Ok().body("ok")
    }

    #[actix_web::test]
    async fn test_public_paths() {
        assert!(is_public_path("/login"));
        assert!(is_public_path("/login?next=/"));
        assert!(is_public_path("/api/auth/login"));
        assert!(is_public_path("/health"));
        assert!(!is_public_path("/"));
        assert!(!is_public_path("/api/contacts"));
        assert!(!is_public_path("/api/auth/logout"));
    }

    #[actix_web::test]
    async fn test_redirects_without_cookie() {
        let app = test::init_service(
            App::new()
                .wrap(AuthGate)
                .route("/api/contacts", web::get().to(ok_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/contacts").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[actix_web::test]
    async fn test_rejects_wrong_cookie_value() {
        let app = test::init_service(
            App::new()
                .wrap(AuthGate)
                .route("/", web::get().to(ok_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new(AUTH_COOKIE_NAME, "yes"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn test_passes_with_cookie() {
        let app = test::init_service(
            App::new()
                .wrap(AuthGate)
                .route("/api/contacts", web::get().to(ok_handler)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/contacts")
            .cookie(Cookie::new(AUTH_COOKIE_NAME, AUTH_COOKIE_VALUE))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_public_path_passes_without_cookie() {
        let app = test::init_service(
            App::new()
                .wrap(AuthGate)
                .route("/health", web::get().to(ok_handler)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
