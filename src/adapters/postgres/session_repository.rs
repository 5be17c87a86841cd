//! PostgreSQL implementation of SessionRepository.
//!
//! Persists Session aggregates with the docket publication and id
//! lists stored as JSONB. Updates are version-guarded: the row is
//! touched only when the stored version matches the caller's, and a
//! mismatch surfaces as a Conflict.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    DocketEntryId, DomainError, ErrorCode, MemberId, SessionId, SessionStatus, Timestamp,
};
use crate::domain::session::{DocketPublication, Session};
use crate::ports::SessionRepository;

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let member_ids = ids_to_json(session.member_ids().iter().map(|id| *id.as_uuid()))?;
        let entry_ids = ids_to_json(session.entry_ids().iter().map(|id| *id.as_uuid()))?;
        let publication = session
            .docket_publication()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to serialize docket publication: {}", e),
                )
            })?;

        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, ordinal, year, session_date, status, docket_publication,
                member_ids, notes, entry_ids, last_position, version,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.ordinal() as i32)
        .bind(session.year())
        .bind(session.session_date())
        .bind(session_status_to_str(session.status()))
        .bind(publication)
        .bind(member_ids)
        .bind(session.notes())
        .bind(entry_ids)
        .bind(session.last_position() as i32)
        .bind(session.version() as i64)
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, "session", "Session ordinal already taken for the year"))?;

        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let member_ids = ids_to_json(session.member_ids().iter().map(|id| *id.as_uuid()))?;
        let entry_ids = ids_to_json(session.entry_ids().iter().map(|id| *id.as_uuid()))?;
        let publication = session
            .docket_publication()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to serialize docket publication: {}", e),
                )
            })?;

        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                status = $3,
                docket_publication = $4,
                member_ids = $5,
                notes = $6,
                entry_ids = $7,
                last_position = $8,
                version = version + 1,
                updated_at = $9
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.version() as i64)
        .bind(session_status_to_str(session.status()))
        .bind(publication)
        .bind(member_ids)
        .bind(session.notes())
        .bind(entry_ids)
        .bind(session.last_position() as i32)
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update session: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(stale_write_error(
                &self.pool,
                "sessions",
                session.id().as_uuid(),
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
            .await);
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, ordinal, year, session_date, status, docket_publication,
                   member_ids, notes, entry_ids, last_position, version,
                   created_at, updated_at
            FROM sessions WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch session: {}", e))
        })?;

        row.map(row_to_session).transpose()
    }

    async fn find_by_year(&self, year: i32) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, ordinal, year, session_date, status, docket_publication,
                   member_ids, notes, entry_ids, last_position, version,
                   created_at, updated_at
            FROM sessions
            WHERE year = $1
            ORDER BY ordinal ASC
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch sessions: {}", e))
        })?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn next_ordinal(&self, year: i32) -> Result<u32, DomainError> {
        // The unique (year, ordinal) constraint turns an allocation
        // race into a Conflict at insert time.
        let result: (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(ordinal), 0) + 1 FROM sessions WHERE year = $1")
                .bind(year)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to allocate session ordinal: {}", e),
                    )
                })?;

        Ok(result.0 as u32)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

/// Maps an insert failure, turning a unique violation into a Conflict.
pub(super) fn insert_error(e: sqlx::Error, what: &str, conflict: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return DomainError::conflict(conflict);
        }
    }
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert {}: {}", what, e))
}

/// Distinguishes a missing row from a version mismatch after a
/// guarded UPDATE touched nothing.
pub(super) async fn stale_write_error(
    pool: &PgPool,
    table: &str,
    id: &Uuid,
    not_found: ErrorCode,
    not_found_message: String,
) -> DomainError {
    let query = format!("SELECT version FROM {} WHERE id = $1", table);
    match sqlx::query_as::<_, (i64,)>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some((stored,))) => DomainError::conflict("Concurrent modification detected")
            .with_detail("stored_version", stored.to_string()),
        Ok(None) => DomainError::new(not_found, not_found_message),
        Err(e) => DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to inspect stale write: {}", e),
        ),
    }
}

fn ids_to_json(ids: impl Iterator<Item = Uuid>) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(ids.collect::<Vec<_>>()).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to serialize id list: {}", e))
    })
}

fn json_to_ids(value: serde_json::Value) -> Result<Vec<Uuid>, DomainError> {
    serde_json::from_value(value).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to parse id list: {}", e))
    })
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let id: Uuid = row.get("id");
    let ordinal: i32 = row.get("ordinal");
    let year: i32 = row.get("year");
    let session_date: NaiveDate = row.get("session_date");
    let status: String = row.get("status");
    let publication: Option<serde_json::Value> = row.get("docket_publication");
    let member_ids: serde_json::Value = row.get("member_ids");
    let notes: Option<String> = row.get("notes");
    let entry_ids: serde_json::Value = row.get("entry_ids");
    let last_position: i32 = row.get("last_position");
    let version: i64 = row.get("version");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let publication: Option<DocketPublication> = publication
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to parse docket publication: {}", e),
            )
        })?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        ordinal as u32,
        year,
        session_date,
        str_to_session_status(&status)?,
        publication,
        json_to_ids(member_ids)?
            .into_iter()
            .map(MemberId::from_uuid)
            .collect(),
        notes,
        json_to_ids(entry_ids)?
            .into_iter()
            .map(DocketEntryId::from_uuid)
            .collect(),
        last_position as u32,
        version as u64,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Type Conversions
// ════════════════════════════════════════════════════════════════════════════════

fn session_status_to_str(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::AwaitingPublication => "awaiting_publication",
        SessionStatus::DocketPublished => "docket_published",
        SessionStatus::Concluded => "concluded",
        SessionStatus::Cancelled => "cancelled",
    }
}

fn str_to_session_status(s: &str) -> Result<SessionStatus, DomainError> {
    match s {
        "awaiting_publication" => Ok(SessionStatus::AwaitingPublication),
        "docket_published" => Ok(SessionStatus::DocketPublished),
        "concluded" => Ok(SessionStatus::Concluded),
        "cancelled" => Ok(SessionStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::InternalError,
            format!("Invalid session status: {}", s),
        )),
    }
}
