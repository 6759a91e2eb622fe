use actix_web::dev::Server;
use actix_web::{error::JsonPayloadError, web, App, HttpRequest, HttpServer};
use std::net::TcpListener;

use crate::account::AccountService;
use crate::error::{AppError, ValidationError};
use crate::middleware::{RequestLogger, SessionGuard};
use crate::routes::{
    admin_probe, create_account, delete_account, get_account, health_check, login, signup,
    user_probe,
};

/// Malformed JSON bodies become the service's own 400 body.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
}

pub fn run(listener: TcpListener, accounts: AccountService) -> Result<Server, std::io::Error> {
    let jwt_config = accounts.jwt_settings().clone();
    let jwt_config_data = web::Data::new(jwt_config.clone());
    let accounts = web::Data::new(accounts);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)

            // Shared state
            .app_data(accounts.clone())
            .app_data(jwt_config_data.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))

            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login))
            .route("/signup", web::post().to(signup))

            // Access probes: answer PERMIT/DENY and stop
            .route("/admin", web::get().to(admin_probe))
            .route("/user", web::get().to(user_probe))

            // Admin-only account management
            .service(
                web::scope("/accounts")
                    .wrap(SessionGuard::admin(jwt_config.clone()))
                    .route("", web::post().to(create_account))
                    .route("/{id}", web::get().to(get_account))
                    .route("/{id}", web::delete().to(delete_account)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
