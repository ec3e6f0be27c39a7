//! Attendance verification, check-in and check-out handlers

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use ev_core::{AttendanceError, RegistrationRepository, VerificationRequest};
use ev_shared::ResponseStatus;

use crate::app::AppState;
use crate::dto::{
    CheckInRequest, CheckOutResponse, ParticipantInfo, RegistrationRequest,
    VerifyAttendanceRequest, VerifyAttendanceResponse,
};
use crate::handlers::{handle_domain_error, validation_error_response};
use crate::middleware::request_provenance;

/// Handler for POST /api/v1/attendance/verify
///
/// Looks the registration up by the presented token and records attendance.
///
/// # Request Body
///
/// ```json
/// { "token": "0123456789", "event_id": 42 }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "status": "success",
///     "message": "Attendance verified",
///     "participant": { "registration_id": 7, "registration_number": "EVT-0007", ... }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Unknown or malformed token (`invalid_token`), token of
///   another event, or invalid `event_id`
/// - 409 Conflict: Attendance already verified
/// - 410 Gone: Token expired
/// - 503 Service Unavailable: Registration store unreachable
pub async fn verify_attendance<R: RegistrationRepository + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<R>>,
    request: web::Json<VerifyAttendanceRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        // A token that cannot exist is rejected like one that does not
        if errors.field_errors().contains_key("token") {
            tracing::warn!(
                event_id = request.event_id,
                reason = AttendanceError::InvalidToken.code(),
                event = "attendance_verification_rejected",
                "Attendance verification rejected"
            );
            return handle_domain_error(AttendanceError::InvalidToken.into());
        }
        return validation_error_response(errors);
    }

    let request = request.into_inner();
    let verification =
        VerificationRequest::by_token(request.token, request.event_id, request_provenance(&req));

    match state.services.verifier.verify(verification).await {
        Ok(verified) => HttpResponse::Ok().json(VerifyAttendanceResponse {
            status: ResponseStatus::Success,
            message: "Attendance verified".to_string(),
            participant: Some(ParticipantInfo::new(
                &verified.registration,
                &verified.attendance,
            )),
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/attendance/check-in
///
/// Organizer check-in without a token.
pub async fn check_in<R: RegistrationRepository + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<R>>,
    request: web::Json<CheckInRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    match state
        .services
        .verifier
        .check_in_manually(
            request.registration_id,
            request.event_id,
            request_provenance(&req),
        )
        .await
    {
        Ok(verified) => HttpResponse::Ok().json(VerifyAttendanceResponse {
            status: ResponseStatus::Success,
            message: "Participant checked in".to_string(),
            participant: Some(ParticipantInfo::new(
                &verified.registration,
                &verified.attendance,
            )),
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/attendance/check-out
pub async fn check_out<R: RegistrationRepository + 'static>(
    state: web::Data<AppState<R>>,
    request: web::Json<RegistrationRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    match state.services.verifier.check_out(request.registration_id).await {
        Ok(attendance) => HttpResponse::Ok().json(CheckOutResponse {
            status: ResponseStatus::Success,
            message: "Participant checked out".to_string(),
            registration_id: attendance.registration_id,
            time_in: attendance.time_in,
            time_out: attendance.time_out,
        }),
        Err(error) => handle_domain_error(error),
    }
}
