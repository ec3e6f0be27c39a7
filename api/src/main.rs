use std::io;
use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing::info;

use ev_api::telemetry::init_tracing;
use ev_api::{create_app, AppState};
use ev_core::{AttendanceServices, InMemoryRegistrationRepository, RegistrationRepository};
use ev_infra::database::{DatabasePool, MySqlRegistrationRepository};
use ev_shared::{AppConfig, StoreBackend};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging).map_err(io::Error::other)?;

    info!(
        environment = %config.environment,
        backend = ?config.database.backend,
        "Starting Eventhub attendance API"
    );

    match config.database.backend {
        StoreBackend::Memory => {
            let repository = Arc::new(InMemoryRegistrationRepository::new());
            let state = AppState::new(AttendanceServices::with_system_providers(
                repository,
                (&config.attendance).into(),
            ));
            serve(state, &config).await
        }
        StoreBackend::MySql => {
            let pool = DatabasePool::new(config.database.clone())
                .await
                .map_err(io::Error::other)?;
            pool.run_migrations().await.map_err(io::Error::other)?;
            info!(stats = %pool.get_statistics(), "Database ready");

            let repository = Arc::new(MySqlRegistrationRepository::new(pool.get_pool().clone()));
            let state = AppState::new(AttendanceServices::with_system_providers(
                repository,
                (&config.attendance).into(),
            ))
            .with_database(pool.clone());

            let result = serve(state, &config).await;
            pool.close().await;
            result
        }
    }
}

async fn serve<R>(state: AppState<R>, config: &AppConfig) -> io::Result<()>
where
    R: RegistrationRepository + 'static,
{
    let state = web::Data::new(state);
    let cors = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;
    let bind_address = config.server.bind_address();

    info!(address = %bind_address, workers = config.server.workers, "Binding HTTP server");

    let mut server = HttpServer::new(move || create_app(state.clone(), &cors, max_payload_size));
    // Zero keeps actix's default of one worker per core
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive))
        .bind(&bind_address)?
        .run()
        .await
}
