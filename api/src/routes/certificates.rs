//! Certificate handlers

use actix_web::{web, HttpResponse};
use validator::Validate;

use ev_core::RegistrationRepository;

use crate::app::AppState;
use crate::dto::{MessageResponse, RegistrationRequest};
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/certificates/mark-received
///
/// # Request Body
///
/// ```json
/// { "registration_id": 7 }
/// ```
///
/// ## Errors
/// - 404 Not Found: Unknown registration
/// - 409 Conflict: Attendance not verified, or certificate already issued
pub async fn mark_certificate_received<R: RegistrationRepository + 'static>(
    state: web::Data<AppState<R>>,
    request: web::Json<RegistrationRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    match state
        .services
        .certificates
        .mark_certificate_received(request.registration_id)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(MessageResponse::success(
            "Certificate marked as received",
        )),
        Err(error) => handle_domain_error(error),
    }
}
