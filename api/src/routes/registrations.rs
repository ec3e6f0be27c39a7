//! Attendance token issuance handlers

use actix_web::{web, HttpResponse};

use ev_core::RegistrationRepository;

use crate::app::AppState;
use crate::dto::AttendanceTokenResponse;
use crate::handlers::handle_domain_error;

/// Handler for POST /api/v1/registrations/{registration_id}/token
///
/// Issues a token if the registration has none; otherwise returns the
/// current one.
pub async fn issue_token<R: RegistrationRepository + 'static>(
    state: web::Data<AppState<R>>,
    path: web::Path<i64>,
) -> HttpResponse {
    match state.services.issuer.ensure_token(path.into_inner()).await {
        Ok(registration) => HttpResponse::Ok().json(AttendanceTokenResponse::from(&registration)),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/registrations/{registration_id}/token/reissue
///
/// Replaces the token; the previous one stops being accepted.
pub async fn reissue_token<R: RegistrationRepository + 'static>(
    state: web::Data<AppState<R>>,
    path: web::Path<i64>,
) -> HttpResponse {
    match state.services.issuer.reissue(path.into_inner()).await {
        Ok(registration) => HttpResponse::Ok().json(AttendanceTokenResponse::from(&registration)),
        Err(error) => handle_domain_error(error),
    }
}
