//! MySQL implementation of the RegistrationRepository trait.
//!
//! Token uniqueness and one attendance per registration are enforced by unique
//! keys. Verification runs in a transaction whose first statement is an update
//! guarded by `attendance_verified_at IS NULL` and by the presented token, so
//! of two concurrent requests exactly one sees an affected row, and a token
//! replaced after it was checked is no longer accepted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ev_core::domain::entities::{Attendance, Registration};
use ev_core::domain::value_objects::{AttendanceStatus, AttendanceSummary, VerificationMethod};
use ev_core::errors::DomainError;
use ev_core::repositories::{
    AssignTokenOutcome, CheckOutOutcome, RegistrationRepository, TokenAssignment,
    VerificationCompletion, VerifiedAttendance,
};

const REGISTRATION_COLUMNS: &str = r#"
    id, event_id, participant_id, registration_number, attendance_token,
    token_generated_at, token_expires_at, attendance_status, verification_method,
    attendance_verified_at, has_received_certificate, created_at, updated_at
"#;

const ATTENDANCE_COLUMNS: &str = r#"
    id, event_id, participant_id, registration_id, time_in, time_out,
    ip_address, user_agent, created_at
"#;

/// MySQL implementation of RegistrationRepository
#[derive(Clone)]
pub struct MySqlRegistrationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRegistrationRepository {
    /// Create a new MySQL registration repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert a registration as created by the registration workflow
    pub async fn insert(&self, registration: &Registration) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO registrations (
                id, event_id, participant_id, registration_number, attendance_token,
                token_generated_at, token_expires_at, attendance_status, verification_method,
                attendance_verified_at, has_received_certificate, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(registration.id)
            .bind(registration.event_id)
            .bind(registration.participant_id)
            .bind(&registration.registration_number)
            .bind(&registration.attendance_token)
            .bind(registration.token_generated_at)
            .bind(registration.token_expires_at)
            .bind(registration.attendance_status.as_str())
            .bind(registration.verification_method.map(|m| m.as_str()))
            .bind(registration.attendance_verified_at)
            .bind(registration.has_received_certificate)
            .bind(registration.created_at)
            .bind(registration.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Validation {
                        message: "Registration id, number or token already exists".to_string(),
                    }
                } else {
                    store_error("insert registration", e)
                }
            })?;

        Ok(())
    }

    /// Convert database row to Registration entity
    fn row_to_registration(row: &MySqlRow) -> Result<Registration, DomainError> {
        let status: String = get(row, "attendance_status")?;
        let method: Option<String> = get(row, "verification_method")?;

        Ok(Registration {
            id: get(row, "id")?,
            event_id: get(row, "event_id")?,
            participant_id: get(row, "participant_id")?,
            registration_number: get(row, "registration_number")?,
            attendance_token: get(row, "attendance_token")?,
            token_generated_at: get(row, "token_generated_at")?,
            token_expires_at: get(row, "token_expires_at")?,
            attendance_status: status
                .parse::<AttendanceStatus>()
                .map_err(|message| DomainError::Internal { message })?,
            verification_method: method
                .map(|m| m.parse::<VerificationMethod>())
                .transpose()
                .map_err(|message| DomainError::Internal { message })?,
            attendance_verified_at: get(row, "attendance_verified_at")?,
            has_received_certificate: get(row, "has_received_certificate")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }

    /// Convert database row to Attendance entity
    fn row_to_attendance(row: &MySqlRow) -> Result<Attendance, DomainError> {
        let id: String = get(row, "id")?;

        Ok(Attendance {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid attendance UUID: {}", e),
            })?,
            event_id: get(row, "event_id")?,
            participant_id: get(row, "participant_id")?,
            registration_id: get(row, "registration_id")?,
            time_in: get(row, "time_in")?,
            time_out: get(row, "time_out")?,
            ip_address: get(row, "ip_address")?,
            user_agent: get(row, "user_agent")?,
            created_at: get(row, "created_at")?,
        })
    }

    fn select_registration(filter: &str) -> String {
        format!(
            "SELECT {} FROM registrations WHERE {} LIMIT 1",
            REGISTRATION_COLUMNS, filter
        )
    }

    fn select_attendance() -> String {
        format!(
            "SELECT {} FROM attendances WHERE registration_id = ? LIMIT 1",
            ATTENDANCE_COLUMNS
        )
    }
}

/// Read a column, mapping decode failures to `Internal`
fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(column).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    })
}

fn store_error(operation: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(operation = operation, error = %e, "Registration store failure");
    DomainError::store(format!("Failed to {}: {}", operation, e))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl RegistrationRepository for MySqlRegistrationRepository {
    async fn create(&self, registration: Registration) -> Result<Registration, DomainError> {
        self.insert(&registration).await?;
        Ok(registration)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DomainError> {
        let row = sqlx::query(&Self::select_registration("id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find registration by id", e))?;

        row.as_ref().map(Self::row_to_registration).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, DomainError> {
        let row = sqlx::query(&Self::select_registration("attendance_token = ?"))
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find registration by token", e))?;

        row.as_ref().map(Self::row_to_registration).transpose()
    }

    async fn assign_token(
        &self,
        registration_id: i64,
        assignment: TokenAssignment,
    ) -> Result<AssignTokenOutcome, DomainError> {
        let query = r#"
            UPDATE registrations
            SET attendance_token = ?,
                token_generated_at = ?,
                token_expires_at = ?,
                attendance_status = ?,
                verification_method = ?,
                updated_at = ?
            WHERE id = ? AND attendance_verified_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(&assignment.token)
            .bind(assignment.generated_at)
            .bind(assignment.expires_at)
            .bind(AttendanceStatus::Pending.as_str())
            .bind(VerificationMethod::Token.as_str())
            .bind(assignment.generated_at)
            .bind(registration_id)
            .execute(&self.pool)
            .await;

        let affected = match result {
            Ok(result) => result.rows_affected(),
            Err(e) if is_unique_violation(&e) => return Ok(AssignTokenOutcome::Conflict),
            Err(e) => return Err(store_error("assign attendance token", e)),
        };

        match self.find_by_id(registration_id).await? {
            None => Ok(AssignTokenOutcome::NotFound),
            Some(registration) if affected == 0 && registration.is_attendance_verified() => {
                Ok(AssignTokenOutcome::AlreadyVerified)
            }
            Some(registration) => Ok(AssignTokenOutcome::Assigned(registration)),
        }
    }

    async fn complete_verification(
        &self,
        completion: VerificationCompletion,
    ) -> Result<Option<VerifiedAttendance>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin verification", e))?;

        let update = r#"
            UPDATE registrations
            SET attendance_verified_at = ?,
                attendance_status = ?,
                verification_method = ?,
                updated_at = ?
            WHERE id = ?
                AND attendance_verified_at IS NULL
                AND (? IS NULL OR attendance_token = ?)
        "#;

        let updated = sqlx::query(update)
            .bind(completion.verified_at)
            .bind(AttendanceStatus::Present.as_str())
            .bind(completion.method.as_str())
            .bind(completion.verified_at)
            .bind(completion.registration_id)
            .bind(&completion.expected_token)
            .bind(&completion.expected_token)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("mark registration verified", e))?;

        if updated.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| store_error("roll back verification", e))?;
            return Ok(None);
        }

        let attendance = &completion.attendance;
        let insert = r#"
            INSERT INTO attendances (
                id, event_id, participant_id, registration_id, time_in, time_out,
                ip_address, user_agent, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let inserted = sqlx::query(insert)
            .bind(attendance.id.to_string())
            .bind(attendance.event_id)
            .bind(attendance.participant_id)
            .bind(attendance.registration_id)
            .bind(attendance.time_in)
            .bind(attendance.time_out)
            .bind(&attendance.ip_address)
            .bind(&attendance.user_agent)
            .bind(attendance.created_at)
            .execute(&mut *tx)
            .await;

        if let Err(e) = inserted {
            tx.rollback()
                .await
                .map_err(|e| store_error("roll back verification", e))?;
            if is_unique_violation(&e) {
                return Ok(None);
            }
            return Err(store_error("insert attendance", e));
        }

        let row = sqlx::query(&Self::select_registration("id = ?"))
            .bind(completion.registration_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| store_error("reload verified registration", e))?;
        let registration = Self::row_to_registration(&row)?;

        tx.commit()
            .await
            .map_err(|e| store_error("commit verification", e))?;

        Ok(Some(VerifiedAttendance {
            registration,
            attendance: completion.attendance,
        }))
    }

    async fn mark_certificate_received(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Registration>, DomainError> {
        let query = r#"
            UPDATE registrations
            SET has_received_certificate = TRUE, updated_at = ?
            WHERE id = ?
                AND attendance_verified_at IS NOT NULL
                AND has_received_certificate = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(registration_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("mark certificate received", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(registration_id).await
    }

    async fn find_attendance(
        &self,
        registration_id: i64,
    ) -> Result<Option<Attendance>, DomainError> {
        let row = sqlx::query(&Self::select_attendance())
            .bind(registration_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find attendance", e))?;

        row.as_ref().map(Self::row_to_attendance).transpose()
    }

    async fn record_check_out(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<CheckOutOutcome, DomainError> {
        let query = r#"
            UPDATE attendances
            SET time_out = ?
            WHERE registration_id = ? AND time_out IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(registration_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("record check-out", e))?;

        match self.find_attendance(registration_id).await? {
            None => Ok(CheckOutOutcome::NotCheckedIn),
            Some(_) if result.rows_affected() == 0 => Ok(CheckOutOutcome::AlreadyCheckedOut),
            Some(attendance) => Ok(CheckOutOutcome::Recorded(attendance)),
        }
    }

    async fn mark_pending_as_absent(
        &self,
        event_id: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let query = r#"
            UPDATE registrations
            SET attendance_status = ?, updated_at = ?
            WHERE event_id = ?
                AND attendance_status = ?
                AND attendance_verified_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(AttendanceStatus::Absent.as_str())
            .bind(at)
            .bind(event_id)
            .bind(AttendanceStatus::Pending.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("mark absentees", e))?;

        Ok(result.rows_affected())
    }

    async fn summarize_event(&self, event_id: i64) -> Result<AttendanceSummary, DomainError> {
        let query = r#"
            SELECT
                COUNT(*) AS total,
                CAST(COALESCE(SUM(attendance_status = 'pending'), 0) AS SIGNED) AS pending,
                CAST(COALESCE(SUM(attendance_status = 'present'), 0) AS SIGNED) AS present,
                CAST(COALESCE(SUM(attendance_status = 'absent'), 0) AS SIGNED) AS absent,
                CAST(COALESCE(SUM(has_received_certificate), 0) AS SIGNED) AS certificates_issued
            FROM registrations
            WHERE event_id = ?
        "#;

        let row = sqlx::query(query)
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("summarize event", e))?;

        let count = |column: &str| -> Result<u64, DomainError> {
            let value: i64 = get(&row, column)?;
            Ok(value.max(0) as u64)
        };

        Ok(AttendanceSummary {
            event_id,
            total: count("total")?,
            pending: count("pending")?,
            present: count("present")?,
            absent: count("absent")?,
            certificates_issued: count("certificates_issued")?,
        })
    }

    async fn token_exists(&self, token: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS holders FROM registrations WHERE attendance_token = ?")
            .bind(token)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("check token existence", e))?;

        let holders: i64 = get(&row, "holders")?;
        Ok(holders > 0)
    }
}
