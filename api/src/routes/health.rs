//! Health check handler

use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use ev_core::RegistrationRepository;
use ev_shared::{HealthResponse, HealthStatus, ServiceHealth};

use crate::app::AppState;

/// Handler for GET /health
///
/// Reports the database as a dependency when the MySQL store is in use.
/// A slow ping degrades the status but still answers 200.
pub async fn health_check<R: RegistrationRepository + 'static>(
    state: web::Data<AppState<R>>,
) -> HttpResponse {
    let mut services = HashMap::new();

    let store = match &state.database {
        None => ServiceHealth::healthy(),
        Some(pool) => match pool.health_check().await {
            Ok(latency) if pool.is_slow(latency) => {
                ServiceHealth::degraded(format!("Slow database ping: {} ms", latency.as_millis()))
            }
            Ok(_) => ServiceHealth::healthy(),
            Err(e) => ServiceHealth::unhealthy(e.to_string()),
        },
    };
    services.insert("registration_store".to_string(), store);

    let response = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));
    match response.status {
        HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(response),
        _ => HttpResponse::Ok().json(response),
    }
}
