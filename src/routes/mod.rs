mod accounts;
mod auth;

pub use accounts::{create_account, delete_account, get_account};
pub use auth::{admin_probe, login, session_cookie, signup, user_probe, LoginRequest, SignupRequest};

use actix_web::HttpResponse;

/// Liveness probe; touches neither the store nor the session machinery.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}
