use std::net::TcpListener;
use std::sync::Arc;

use auth_service::account::AccountService;
use auth_service::configuration::get_configuration;
use auth_service::startup::run;
use auth_service::store::PostgresStore;
use auth_service::telemetry::init_telemetry;

fn startup_error(kind: std::io::ErrorKind, msg: &str) -> std::io::Error {
    std::io::Error::new(kind, msg.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    // A missing signing secret stops the process here, before anything binds.
    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(startup_error(std::io::ErrorKind::InvalidInput, "Configuration error"));
        }
    };

    tracing::info!("Attempting to connect to database");
    let store = PostgresStore::connect(&configuration.database)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            startup_error(std::io::ErrorKind::ConnectionRefused, "Database connection error")
        })?;

    store.migrate().await.map_err(|e| {
        tracing::error!("Failed to prepare account table: {}", e);
        startup_error(std::io::ErrorKind::Other, "Database migration error")
    })?;
    tracing::info!("Database ready");

    let accounts = AccountService::new(
        Arc::new(store),
        configuration.jwt.clone(),
        configuration.security.clone(),
        configuration.database.query_timeout(),
    );

    if !configuration.application.seed_accounts.is_empty() {
        tracing::info!(
            count = configuration.application.seed_accounts.len(),
            "Seeding accounts"
        );
        accounts
            .seed(&configuration.application.seed_accounts)
            .await
            .map_err(|e| {
                tracing::error!("Failed to seed accounts: {}", e);
                startup_error(std::io::ErrorKind::Other, "Seeding error")
            })?;
    }

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, accounts)?.await
}
