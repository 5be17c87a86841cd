//! Decision aggregate entity.
//!
//! A decision is the publishable artifact derived from a judgment. It
//! carries a per-year sequential number, an editable ementa (title and
//! body), and an append-only publication history. Republishing always
//! snapshots the ementa as it currently reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DecisionId, DecisionStatus, DomainError, JudgmentId, StateMachine, Timestamp,
};

use super::publication::Publication;

/// A publishable decision derived from a judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    id: DecisionId,
    judgment_id: JudgmentId,
    /// Per-year sequence number, allocated by the repository.
    number: u32,
    year: i32,
    ementa_title: String,
    ementa_body: String,
    /// Path to the consolidated vote document, if one was produced.
    vote_path: Option<String>,
    status: DecisionStatus,
    publications: Vec<Publication>,
    /// Optimistic-concurrency version, managed by the repository.
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Decision {
    /// Creates a new pending decision.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the ementa title is empty or the number
    ///   is not positive
    pub fn new(
        id: DecisionId,
        judgment_id: JudgmentId,
        number: u32,
        year: i32,
        ementa_title: String,
        ementa_body: String,
        vote_path: Option<String>,
    ) -> Result<Self, DomainError> {
        if ementa_title.trim().is_empty() {
            return Err(DomainError::validation(
                "ementa_title",
                "Ementa title cannot be empty",
            ));
        }
        if number == 0 {
            return Err(DomainError::validation(
                "number",
                "Decision number must be positive",
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            judgment_id,
            number,
            year,
            ementa_title,
            ementa_body,
            vote_path,
            status: DecisionStatus::Pending,
            publications: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a decision from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DecisionId,
        judgment_id: JudgmentId,
        number: u32,
        year: i32,
        ementa_title: String,
        ementa_body: String,
        vote_path: Option<String>,
        status: DecisionStatus,
        publications: Vec<Publication>,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            judgment_id,
            number,
            year,
            ementa_title,
            ementa_body,
            vote_path,
            status,
            publications,
            version,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &DecisionId {
        &self.id
    }

    pub fn judgment_id(&self) -> &JudgmentId {
        &self.judgment_id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn ementa_title(&self) -> &str {
        &self.ementa_title
    }

    pub fn ementa_body(&self) -> &str {
        &self.ementa_body
    }

    pub fn vote_path(&self) -> Option<&str> {
        self.vote_path.as_deref()
    }

    pub fn status(&self) -> DecisionStatus {
        self.status
    }

    /// Publication history, ordered by publication order.
    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Advances the concurrency version after a successful
    /// version-checked write. Called by repositories only.
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn is_published(&self) -> bool {
        !self.publications.is_empty()
    }

    /// Updates the ementa text. The published history is untouched;
    /// the new text only appears in later republications.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the title is empty
    pub fn update_ementa(&mut self, title: String, body: String) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation(
                "ementa_title",
                "Ementa title cannot be empty",
            ));
        }
        self.ementa_title = title;
        self.ementa_body = body;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Sets or clears the vote-document path.
    pub fn set_vote_path(&mut self, vote_path: Option<String>) {
        self.vote_path = vote_path;
        self.updated_at = Timestamp::now();
    }

    /// Appends a publication, snapshotting the current ementa.
    ///
    /// The first call publishes the original (no reason allowed); every
    /// later call is a republication (reason required).
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the publication number is empty, a
    ///   reason is given on the original, or missing on a republication
    pub fn publish(
        &mut self,
        publication_number: String,
        publication_date: NaiveDate,
        republish_reason: Option<String>,
    ) -> Result<&Publication, DomainError> {
        if publication_number.trim().is_empty() {
            return Err(DomainError::validation(
                "publication_number",
                "Publication number cannot be empty",
            ));
        }

        let order = self.publications.len() as u32 + 1;
        let target = if order == 1 {
            if republish_reason.is_some() {
                return Err(DomainError::validation(
                    "republish_reason",
                    "The original publication cannot carry a republish reason",
                ));
            }
            DecisionStatus::Published
        } else {
            if republish_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .is_none()
            {
                return Err(DomainError::validation(
                    "republish_reason",
                    "Republishing requires a reason",
                ));
            }
            DecisionStatus::Republished
        };

        self.status = self.status.transition_to(target)?;
        self.publications.push(Publication::new(
            order,
            publication_number,
            publication_date,
            self.ementa_title.clone(),
            self.ementa_body.clone(),
            republish_reason,
        ));
        self.updated_at = Timestamp::now();
        Ok(self.publications.last().expect("publication was just pushed"))
    }
}
