//! CORS middleware configuration for cross-origin requests.
//!
//! Check-in kiosks and the organizer dashboard call the API from the
//! browser. The configuration comes from the shared `CorsConfig`: a `*`
//! entry allows any origin, otherwise only the listed origins are accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use ev_shared::CorsConfig;

/// Creates a CORS middleware instance from configuration.
///
/// # Environment Variables
/// - `ALLOWED_ORIGINS`: Comma-separated list of origins added to the configured ones
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("Configuring permissive CORS");
        cors = cors.allow_any_origin();
    } else {
        for origin in configured_origins(config) {
            tracing::info!(origin = %origin, "Adding allowed origin");
            cors = cors.allowed_origin(&origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}

fn configured_origins(config: &CorsConfig) -> Vec<String> {
    let mut origins: Vec<String> = config.allowed_origins.clone();
    if let Ok(extra) = std::env::var("ALLOWED_ORIGINS") {
        origins.extend(
            extra
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from),
        );
    }
    origins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_development_cors() {
        let _cors = create_cors(&CorsConfig::development());
    }

    #[test]
    fn test_create_restricted_cors() {
        let config = CorsConfig {
            allowed_origins: vec!["https://checkin.example.org".to_string()],
            allow_credentials: true,
            max_age: 600,
        };
        let _cors = create_cors(&config);
        assert_eq!(configured_origins(&config)[0], "https://checkin.example.org");
    }
}
