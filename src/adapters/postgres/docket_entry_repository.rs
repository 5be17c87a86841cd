//! PostgreSQL implementation of DocketEntryRepository.
//!
//! The vote ledger, votings, and judgment travel with the entry row
//! as JSONB; a denormalized judgment_id column backs the lookup that
//! decision creation needs. Updates are version-guarded.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::docket::{DocketEntry, Judgment, Vote, Voting};
use crate::domain::foundation::{
    CaseId, DocketEntryId, DocketStatus, DomainError, ErrorCode, JudgmentId, SessionId, Timestamp,
};
use crate::ports::DocketEntryRepository;

use super::session_repository::{insert_error, stale_write_error};

/// PostgreSQL implementation of DocketEntryRepository.
#[derive(Clone)]
pub struct PostgresDocketEntryRepository {
    pool: PgPool,
}

impl PostgresDocketEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocketEntryRepository for PostgresDocketEntryRepository {
    async fn save(&self, entry: &DocketEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO docket_entries (
                id, session_id, case_id, position, status, minutes,
                votes, votings, judgment, judgment_id, version,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.session_id().as_uuid())
        .bind(entry.case_id().as_uuid())
        .bind(entry.position() as i32)
        .bind(to_json(entry.status(), "docket status")?)
        .bind(entry.minutes())
        .bind(to_json(entry.votes(), "votes")?)
        .bind(to_json(entry.votings(), "votings")?)
        .bind(entry.judgment().map(|j| to_json(j, "judgment")).transpose()?)
        .bind(entry.judgment().map(|j| *j.id().as_uuid()))
        .bind(entry.version() as i64)
        .bind(entry.created_at().as_datetime())
        .bind(entry.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, "docket entry", "Case is already on this session's docket"))?;

        Ok(())
    }

    async fn update(&self, entry: &DocketEntry) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE docket_entries SET
                status = $3,
                minutes = $4,
                votes = $5,
                votings = $6,
                judgment = $7,
                judgment_id = $8,
                version = version + 1,
                updated_at = $9
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(entry.version() as i64)
        .bind(to_json(entry.status(), "docket status")?)
        .bind(entry.minutes())
        .bind(to_json(entry.votes(), "votes")?)
        .bind(to_json(entry.votings(), "votings")?)
        .bind(entry.judgment().map(|j| to_json(j, "judgment")).transpose()?)
        .bind(entry.judgment().map(|j| *j.id().as_uuid()))
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update docket entry: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(stale_write_error(
                &self.pool,
                "docket_entries",
                entry.id().as_uuid(),
                ErrorCode::DocketEntryNotFound,
                format!("Docket entry not found: {}", entry.id()),
            )
            .await);
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &DocketEntryId) -> Result<Option<DocketEntry>, DomainError> {
        let row = sqlx::query(&select_query("WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch docket entry: {}", e),
                )
            })?;

        row.map(row_to_entry).transpose()
    }

    async fn find_by_session_and_case(
        &self,
        session_id: &SessionId,
        case_id: &CaseId,
    ) -> Result<Option<DocketEntry>, DomainError> {
        let row = sqlx::query(&select_query("WHERE session_id = $1 AND case_id = $2"))
            .bind(session_id.as_uuid())
            .bind(case_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch docket entry: {}", e),
                )
            })?;

        row.map(row_to_entry).transpose()
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<DocketEntry>, DomainError> {
        let rows = sqlx::query(&select_query("WHERE session_id = $1 ORDER BY position ASC"))
            .bind(session_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch docket entries: {}", e),
                )
            })?;

        rows.into_iter().map(row_to_entry).collect()
    }

    async fn find_by_judgment(
        &self,
        judgment_id: &JudgmentId,
    ) -> Result<Option<DocketEntry>, DomainError> {
        let row = sqlx::query(&select_query("WHERE judgment_id = $1"))
            .bind(judgment_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch docket entry: {}", e),
                )
            })?;

        row.map(row_to_entry).transpose()
    }

    async fn delete(&self, id: &DocketEntryId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM docket_entries WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete docket entry: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DocketEntryNotFound,
                format!("Docket entry not found: {}", id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

fn select_query(tail: &str) -> String {
    format!(
        "SELECT id, session_id, case_id, position, status, minutes, \
         votes, votings, judgment, version, created_at, updated_at \
         FROM docket_entries {}",
        tail
    )
}

fn to_json<T: serde::Serialize>(value: T, what: &str) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to serialize {}: {}", what, e))
    })
}

fn from_json<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to parse {}: {}", what, e))
    })
}

fn row_to_entry(row: sqlx::postgres::PgRow) -> Result<DocketEntry, DomainError> {
    let id: Uuid = row.get("id");
    let session_id: Uuid = row.get("session_id");
    let case_id: Uuid = row.get("case_id");
    let position: i32 = row.get("position");
    let status: serde_json::Value = row.get("status");
    let minutes: Option<String> = row.get("minutes");
    let votes: serde_json::Value = row.get("votes");
    let votings: serde_json::Value = row.get("votings");
    let judgment: Option<serde_json::Value> = row.get("judgment");
    let version: i64 = row.get("version");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(DocketEntry::reconstitute(
        DocketEntryId::from_uuid(id),
        SessionId::from_uuid(session_id),
        CaseId::from_uuid(case_id),
        position as u32,
        from_json::<DocketStatus>(status, "docket status")?,
        minutes,
        from_json::<Vec<Vote>>(votes, "votes")?,
        from_json::<Vec<Voting>>(votings, "votings")?,
        judgment
            .map(|j| from_json::<Judgment>(j, "judgment"))
            .transpose()?,
        version as u64,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
