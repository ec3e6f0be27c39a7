//! Application state and factory
//!
//! This module holds the shared application state and provides the factory
//! for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{error::InternalError, web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use ev_core::{AttendanceServices, RegistrationRepository};
use ev_infra::database::DatabasePool;
use ev_shared::{CorsConfig, ErrorResponse};

use crate::middleware::create_cors;
use crate::routes;

/// State shared by all handlers
pub struct AppState<R: RegistrationRepository> {
    pub services: Arc<AttendanceServices<R>>,
    /// Present when the MySQL store backs the repository
    pub database: Option<DatabasePool>,
}

impl<R: RegistrationRepository> AppState<R> {
    pub fn new(services: AttendanceServices<R>) -> Self {
        Self {
            services: Arc::new(services),
            database: None,
        }
    }

    pub fn with_database(mut self, database: DatabasePool) -> Self {
        self.database = Some(database);
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<R>(
    app_state: web::Data<AppState<R>>,
    cors: &CorsConfig,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: RegistrationRepository + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(json_config(max_payload_size))
        // Order matters: CORS runs inside the request span
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .configure(routes::configure::<R>)
        .default_service(web::route().to(not_found))
}

/// JSON extractor settings; malformed bodies get the standard error shape
fn json_config(max_payload_size: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(|err, _req| {
            let body = ErrorResponse::new(ev_shared::error_codes::VALIDATION_ERROR, err.to_string());
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        ev_shared::error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
