//! In-memory session repository for testing and local wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::Session;
use crate::ports::SessionRepository;

/// In-memory `SessionRepository` backed by a `RwLock<HashMap>`.
///
/// Mirrors the concurrency contract of the PostgreSQL adapter:
/// `update` applies only when the stored version matches, and ordinal
/// allocation is atomic under the write lock.
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .expect("InMemorySessionRepository: lock poisoned");

        let duplicate = sessions
            .values()
            .any(|s| s.ordinal() == session.ordinal() && s.year() == session.year());
        if duplicate {
            return Err(DomainError::conflict("Session ordinal already taken")
                .with_detail("ordinal", session.ordinal().to_string())
                .with_detail("year", session.year().to_string()));
        }

        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .expect("InMemorySessionRepository: lock poisoned");

        let stored = sessions.get(session.id()).ok_or_else(|| {
            DomainError::new(ErrorCode::SessionNotFound, "Session not found")
                .with_detail("session_id", session.id().to_string())
        })?;
        if stored.version() != session.version() {
            return Err(
                DomainError::conflict("Session was modified concurrently; reload and retry")
                    .with_detail("session_id", session.id().to_string())
                    .with_detail("expected_version", session.version().to_string())
                    .with_detail("stored_version", stored.version().to_string()),
            );
        }

        let mut updated = session.clone();
        updated.bump_version();
        sessions.insert(*session.id(), updated);
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self
            .sessions
            .read()
            .expect("InMemorySessionRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_year(&self, year: i32) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .expect("InMemorySessionRepository: lock poisoned")
            .values()
            .filter(|s| s.year() == year)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.ordinal());
        Ok(sessions)
    }

    async fn next_ordinal(&self, year: i32) -> Result<u32, DomainError> {
        let sessions = self
            .sessions
            .read()
            .expect("InMemorySessionRepository: lock poisoned");
        let max = sessions
            .values()
            .filter(|s| s.year() == year)
            .map(|s| s.ordinal())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }
}
