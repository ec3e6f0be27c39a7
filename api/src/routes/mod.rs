//! Route registration
//!
//! - `GET /health`
//! - `/api/v1/attendance` - token verification, organizer check-in and check-out
//! - `/api/v1/certificates` - certificate issuance bookkeeping
//! - `/api/v1/registrations/{id}/token` - token issuance and reissue
//! - `/api/v1/events/{id}` - absentee marking and attendance summary

pub mod attendance;
pub mod certificates;
pub mod events;
pub mod health;
pub mod registrations;

use actix_web::web;

use ev_core::RegistrationRepository;

/// Register every route on an app or scope
pub fn configure<R: RegistrationRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check::<R>))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/attendance")
                        .route("/verify", web::post().to(attendance::verify_attendance::<R>))
                        .route("/check-in", web::post().to(attendance::check_in::<R>))
                        .route("/check-out", web::post().to(attendance::check_out::<R>)),
                )
                .service(web::scope("/certificates").route(
                    "/mark-received",
                    web::post().to(certificates::mark_certificate_received::<R>),
                ))
                .service(
                    web::scope("/registrations/{registration_id}")
                        .route("/token", web::post().to(registrations::issue_token::<R>))
                        .route(
                            "/token/reissue",
                            web::post().to(registrations::reissue_token::<R>),
                        ),
                )
                .service(
                    web::scope("/events/{event_id}")
                        .route("/absentees", web::post().to(events::mark_absentees::<R>))
                        .route(
                            "/attendance-summary",
                            web::get().to(events::attendance_summary::<R>),
                        ),
                ),
        );
}
