/// Authentication Routes
///
/// Login, public signup and the `/admin` and `/user` access probes.

use actix_web::cookie::{time, Cookie};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::account::{AccountService, Role};
use crate::auth::{authorize_request, SESSION_COOKIE};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// Login request. The password is never logged.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "userName")]
    pub username: String,
    pub password: String,
}

/// Signup request; `userType` defaults to `Regular`
#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(rename = "userName")]
    pub username: String,
    pub password: String,
    #[serde(rename = "userType", default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Regular
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "userName")]
    pub username: String,
}

/// Cookie carrying the session token: HTTP-only, expiring with the session window.
pub fn session_cookie(token: String, config: &JwtSettings) -> Cookie<'static> {
    let lifetime = time::Duration::seconds(config.cookie_lifetime_seconds);
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .expires(time::OffsetDateTime::now_utc() + lifetime)
        .finish()
}

/// POST /login
///
/// Checks credentials and sets the `jwt` session cookie.
///
/// # Errors
/// - 400: malformed body, or unknown username / wrong password (same message)
pub async fn login(
    form: web::Json<LoginRequest>,
    accounts: web::Data<AccountService>,
) -> Result<HttpResponse, AppError> {
    let outcome = accounts.login(&form.username, &form.password).await?;
    let cookie = session_cookie(outcome.token, accounts.jwt_settings());

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        message: "Login successful".to_string(),
        username: outcome.account.username,
    }))
}

/// POST /signup
///
/// Public account creation. Roles outside `security.signup_roles` are refused.
pub async fn signup(
    form: web::Json<SignupRequest>,
    accounts: web::Data<AccountService>,
) -> Result<HttpResponse, AppError> {
    let account = accounts
        .register(&form.username, &form.password, form.role)
        .await?;
    Ok(HttpResponse::Created().json(account))
}

fn probe(req: &HttpRequest, required: Role, config: &JwtSettings) -> Result<HttpResponse, AppError> {
    authorize_request(req, required, config)?;
    Ok(HttpResponse::Ok().json("permission granted"))
}

/// GET /admin: 200 for an Admin session, uniform denial otherwise
pub async fn admin_probe(
    req: HttpRequest,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    probe(&req, Role::Admin, jwt_config.get_ref())
}

/// GET /user: 200 for any valid session, uniform denial otherwise
pub async fn user_probe(
    req: HttpRequest,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    probe(&req, Role::Regular, jwt_config.get_ref())
}
