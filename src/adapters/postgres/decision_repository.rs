//! PostgreSQL implementation of DecisionRepository.
//!
//! Publication history is stored as JSONB on the decision row. The
//! unique constraints on judgment_id and (year, number) back the
//! one-decision-per-judgment and gapless-numbering guarantees when
//! creations race.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::decision::{Decision, Publication};
use crate::domain::foundation::{
    DecisionId, DecisionStatus, DomainError, ErrorCode, JudgmentId, Timestamp,
};
use crate::ports::DecisionRepository;

use super::session_repository::{insert_error, stale_write_error};

/// PostgreSQL implementation of DecisionRepository.
#[derive(Clone)]
pub struct PostgresDecisionRepository {
    pool: PgPool,
}

impl PostgresDecisionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DecisionRepository for PostgresDecisionRepository {
    async fn save(&self, decision: &Decision) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO decisions (
                id, judgment_id, number, year, ementa_title, ementa_body,
                vote_path, status, publications, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(decision.id().as_uuid())
        .bind(decision.judgment_id().as_uuid())
        .bind(decision.number() as i32)
        .bind(decision.year())
        .bind(decision.ementa_title())
        .bind(decision.ementa_body())
        .bind(decision.vote_path())
        .bind(decision_status_to_str(decision.status()))
        .bind(publications_to_json(decision.publications())?)
        .bind(decision.version() as i64)
        .bind(decision.created_at().as_datetime())
        .bind(decision.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, "decision", "Judgment already has a decision"))?;

        Ok(())
    }

    async fn update(&self, decision: &Decision) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE decisions SET
                ementa_title = $3,
                ementa_body = $4,
                vote_path = $5,
                status = $6,
                publications = $7,
                version = version + 1,
                updated_at = $8
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(decision.id().as_uuid())
        .bind(decision.version() as i64)
        .bind(decision.ementa_title())
        .bind(decision.ementa_body())
        .bind(decision.vote_path())
        .bind(decision_status_to_str(decision.status()))
        .bind(publications_to_json(decision.publications())?)
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update decision: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(stale_write_error(
                &self.pool,
                "decisions",
                decision.id().as_uuid(),
                ErrorCode::DecisionNotFound,
                format!("Decision not found: {}", decision.id()),
            )
            .await);
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &DecisionId) -> Result<Option<Decision>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, judgment_id, number, year, ementa_title, ementa_body,
                   vote_path, status, publications, version, created_at, updated_at
            FROM decisions WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch decision: {}", e))
        })?;

        row.map(row_to_decision).transpose()
    }

    async fn find_by_judgment(
        &self,
        judgment_id: &JudgmentId,
    ) -> Result<Option<Decision>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, judgment_id, number, year, ementa_title, ementa_body,
                   vote_path, status, publications, version, created_at, updated_at
            FROM decisions WHERE judgment_id = $1
            "#,
        )
        .bind(judgment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to fetch decision: {}", e))
        })?;

        row.map(row_to_decision).transpose()
    }

    async fn next_number(&self, year: i32) -> Result<u32, DomainError> {
        // The unique (year, number) constraint turns an allocation
        // race into a Conflict at insert time.
        let result: (i32,) =
            sqlx::query_as("SELECT COALESCE(MAX(number), 0) + 1 FROM decisions WHERE year = $1")
                .bind(year)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to allocate decision number: {}", e),
                    )
                })?;

        Ok(result.0 as u32)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

fn publications_to_json(publications: &[Publication]) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(publications).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize publications: {}", e),
        )
    })
}

fn row_to_decision(row: sqlx::postgres::PgRow) -> Result<Decision, DomainError> {
    let id: Uuid = row.get("id");
    let judgment_id: Uuid = row.get("judgment_id");
    let number: i32 = row.get("number");
    let year: i32 = row.get("year");
    let ementa_title: String = row.get("ementa_title");
    let ementa_body: String = row.get("ementa_body");
    let vote_path: Option<String> = row.get("vote_path");
    let status: String = row.get("status");
    let publications: serde_json::Value = row.get("publications");
    let version: i64 = row.get("version");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let publications: Vec<Publication> = serde_json::from_value(publications).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to parse publications: {}", e))
    })?;

    Ok(Decision::reconstitute(
        DecisionId::from_uuid(id),
        JudgmentId::from_uuid(judgment_id),
        number as u32,
        year,
        ementa_title,
        ementa_body,
        vote_path,
        str_to_decision_status(&status)?,
        publications,
        version as u64,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Type Conversions
// ════════════════════════════════════════════════════════════════════════════════

fn decision_status_to_str(status: DecisionStatus) -> &'static str {
    match status {
        DecisionStatus::Pending => "pending",
        DecisionStatus::Published => "published",
        DecisionStatus::Republished => "republished",
    }
}

fn str_to_decision_status(s: &str) -> Result<DecisionStatus, DomainError> {
    match s {
        "pending" => Ok(DecisionStatus::Pending),
        "published" => Ok(DecisionStatus::Published),
        "republished" => Ok(DecisionStatus::Republished),
        _ => Err(DomainError::new(
            ErrorCode::InternalError,
            format!("Invalid decision status: {}", s),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_status_round_trips() {
        let statuses = [
            DecisionStatus::Pending,
            DecisionStatus::Published,
            DecisionStatus::Republished,
        ];
        for status in statuses {
            let s = decision_status_to_str(status);
            assert_eq!(str_to_decision_status(s).unwrap(), status);
        }
    }

    #[test]
    fn invalid_decision_status_returns_error() {
        assert!(str_to_decision_status("draft").is_err());
    }
}
