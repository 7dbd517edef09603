use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use shared_types::LoginRequest;

use crate::config::AuthConfig;
use crate::handlers::error::ApiError;
use crate::helpers::auth_gate::{AUTH_COOKIE_NAME, AUTH_COOKIE_VALUE};

const SESSION_DAYS: i64 = 7;

fn session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE_NAME, AUTH_COOKIE_VALUE)
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_DAYS))
        .secure(secure)
        .finish()
}

pub async fn login(
    auth: web::Data<AuthConfig>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let Some(master_password) = auth.master_password.as_deref() else {
        tracing::error!("Login attempted but no master password is configured");
        return Err(ApiError::Internal("Server configuration error".to_string()));
    };

    if body.password != master_password {
        tracing::warn!("Rejected login with an invalid password");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    tracing::info!("Operator logged in");
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(auth.secure_cookie))
        .json(serde_json::json!({ "success": true })))
}

pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(AUTH_COOKIE_NAME, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(serde_json::json!({ "success": true }))
}

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Prospect Tracker - Login</title></head>
<body>
<form id="login">
  <label>Password <input type="password" name="password" autofocus></label>
  <button type="submit">Sign in</button>
  <p id="error" role="alert"></p>
</form>
<script>
document.getElementById("login").addEventListener("submit", async (event) => {
  event.preventDefault();
  const password = event.target.password.value;
  const res = await fetch("/api/auth/login", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ password }),
  });
  if (res.ok) {
    window.location.href = "/";
  } else {
    const body = await res.json().catch(() => ({}));
    document.getElementById("error").textContent = body.error || "Login failed";
  }
});
</script>
</body>
</html>
"#;

pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LOGIN_PAGE)
}
