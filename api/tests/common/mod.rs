//! Shared setup for the HTTP route tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};

use ev_api::AppState;
use ev_core::{
    AttendanceServiceConfig, AttendanceServices, FixedClock, InMemoryRegistrationRepository,
    Registration, SequenceTokenSource,
};

pub const EVENT_ID: i64 = 42;
pub const OTHER_EVENT_ID: i64 = 43;
pub const MAX_PAYLOAD: usize = 64 * 1024;

/// Token produced by the first scripted draw
pub const FIRST_TOKEN: &str = "0000012345";
pub const SECOND_TOKEN: &str = "0000067890";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 14, 8, 30, 0).unwrap()
}

pub fn registration(id: i64, event_id: i64) -> Registration {
    Registration::new(id, event_id, id + 1000, format!("EVT-{:04}", id), start_time())
}

pub struct TestContext {
    pub repository: Arc<InMemoryRegistrationRepository>,
    pub clock: Arc<FixedClock>,
    pub state: web::Data<AppState<InMemoryRegistrationRepository>>,
}

/// In-memory store, frozen clock, and token draws 12345 then 67890
pub fn context() -> TestContext {
    let repository = Arc::new(InMemoryRegistrationRepository::new());
    let clock = Arc::new(FixedClock::new(start_time()));
    let services = AttendanceServices::new(
        repository.clone(),
        clock.clone(),
        Arc::new(SequenceTokenSource::new([12_345, 67_890, 24_680])),
        AttendanceServiceConfig::default(),
    );

    TestContext {
        repository,
        clock,
        state: web::Data::new(AppState::new(services)),
    }
}

impl TestContext {
    /// Insert a registration and issue its token
    pub async fn registered_with_token(&self, id: i64, event_id: i64) -> String {
        self.repository
            .insert(registration(id, event_id))
            .await
            .unwrap();
        let registration = self.state.services.issuer.generate(id).await.unwrap();
        registration.attendance_token.unwrap()
    }
}
