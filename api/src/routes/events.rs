//! Organizer event handlers

use actix_web::{web, HttpResponse};

use ev_core::RegistrationRepository;
use ev_shared::ResponseStatus;

use crate::app::AppState;
use crate::dto::{AbsenteesResponse, AttendanceSummaryResponse};
use crate::handlers::handle_domain_error;

/// Handler for POST /api/v1/events/{event_id}/absentees
pub async fn mark_absentees<R: RegistrationRepository + 'static>(
    state: web::Data<AppState<R>>,
    path: web::Path<i64>,
) -> HttpResponse {
    let event_id = path.into_inner();

    match state.services.verifier.mark_absentees(event_id).await {
        Ok(marked_absent) => HttpResponse::Ok().json(AbsenteesResponse {
            status: ResponseStatus::Success,
            event_id,
            marked_absent,
        }),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/v1/events/{event_id}/attendance-summary
pub async fn attendance_summary<R: RegistrationRepository + 'static>(
    state: web::Data<AppState<R>>,
    path: web::Path<i64>,
) -> HttpResponse {
    match state.services.verifier.summary(path.into_inner()).await {
        Ok(summary) => HttpResponse::Ok().json(AttendanceSummaryResponse::from(summary)),
        Err(error) => handle_domain_error(error),
    }
}
