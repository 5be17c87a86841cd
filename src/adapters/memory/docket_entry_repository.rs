//! In-memory docket entry repository for testing and local wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::docket::DocketEntry;
use crate::domain::foundation::{CaseId, DocketEntryId, DomainError, ErrorCode, JudgmentId, SessionId};
use crate::ports::DocketEntryRepository;

/// In-memory `DocketEntryRepository` backed by a `RwLock<HashMap>`.
///
/// Stores the whole aggregate (ledger, votings, judgment) per entry
/// and enforces version-checked updates like the PostgreSQL adapter.
pub struct InMemoryDocketEntryRepository {
    entries: RwLock<HashMap<DocketEntryId, DocketEntry>>,
}

impl InMemoryDocketEntryRepository {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDocketEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocketEntryRepository for InMemoryDocketEntryRepository {
    async fn save(&self, entry: &DocketEntry) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .expect("InMemoryDocketEntryRepository: lock poisoned");

        let duplicate = entries
            .values()
            .any(|e| e.session_id() == entry.session_id() && e.case_id() == entry.case_id());
        if duplicate {
            return Err(
                DomainError::conflict("Case is already on this session's docket")
                    .with_detail("session_id", entry.session_id().to_string())
                    .with_detail("case_id", entry.case_id().to_string()),
            );
        }

        entries.insert(*entry.id(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &DocketEntry) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .expect("InMemoryDocketEntryRepository: lock poisoned");

        let stored = entries.get(entry.id()).ok_or_else(|| {
            DomainError::new(ErrorCode::DocketEntryNotFound, "Docket entry not found")
                .with_detail("docket_entry_id", entry.id().to_string())
        })?;
        if stored.version() != entry.version() {
            return Err(DomainError::conflict(
                "Docket entry was modified concurrently; reload and retry",
            )
            .with_detail("docket_entry_id", entry.id().to_string())
            .with_detail("expected_version", entry.version().to_string())
            .with_detail("stored_version", stored.version().to_string()));
        }

        let mut updated = entry.clone();
        updated.bump_version();
        entries.insert(*entry.id(), updated);
        Ok(())
    }

    async fn find_by_id(&self, id: &DocketEntryId) -> Result<Option<DocketEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .expect("InMemoryDocketEntryRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_session_and_case(
        &self,
        session_id: &SessionId,
        case_id: &CaseId,
    ) -> Result<Option<DocketEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .expect("InMemoryDocketEntryRepository: lock poisoned")
            .values()
            .find(|e| e.session_id() == session_id && e.case_id() == case_id)
            .cloned())
    }

    async fn find_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<DocketEntry>, DomainError> {
        let mut entries: Vec<DocketEntry> = self
            .entries
            .read()
            .expect("InMemoryDocketEntryRepository: lock poisoned")
            .values()
            .filter(|e| e.session_id() == session_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.position());
        Ok(entries)
    }

    async fn find_by_judgment(
        &self,
        judgment_id: &JudgmentId,
    ) -> Result<Option<DocketEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .expect("InMemoryDocketEntryRepository: lock poisoned")
            .values()
            .find(|e| e.judgment().map(|j| j.id()) == Some(judgment_id))
            .cloned())
    }

    async fn delete(&self, id: &DocketEntryId) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .expect("InMemoryDocketEntryRepository: lock poisoned");
        entries.remove(id).ok_or_else(|| {
            DomainError::new(ErrorCode::DocketEntryNotFound, "Docket entry not found")
                .with_detail("docket_entry_id", id.to_string())
        })?;
        Ok(())
    }
}
