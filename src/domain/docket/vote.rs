//! Vote entity and its decision selection.
//!
//! A vote is one board member's individually recorded position on a
//! docket entry. Votes are append-only: a member who changes position
//! casts a new vote that supersedes the old one, and only
//! non-superseded ("current") votes participate in grouping and
//! tallies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DecisionTextId, DomainError, MemberId, Timestamp, VoteId};

/// Role the member held at the time of the vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Rapporteur,
    Reviewer,
    Chair,
    Voter,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberRole::Rapporteur => "Rapporteur",
            MemberRole::Reviewer => "Reviewer",
            MemberRole::Chair => "Chair",
            MemberRole::Voter => "Voter",
        };
        write!(f, "{}", s)
    }
}

/// Knowledge type of a vote: whether the case was taken on its merits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeType {
    NonAdmission,
    OnMerits,
}

impl fmt::Display for KnowledgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KnowledgeType::NonAdmission => "NonAdmission",
            KnowledgeType::OnMerits => "OnMerits",
        };
        write!(f, "{}", s)
    }
}

/// Decision selection of a vote, enforced at construction.
///
/// A non-admission vote may reference a preliminary and an ex-officio
/// decision but never a merits decision; a merits vote requires
/// exactly one merits decision and may add an ex-officio one. The
/// tagged union makes the illegal combinations unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "knowledge_type", rename_all = "snake_case")]
pub enum VoteSelection {
    NonAdmission {
        preliminary: Option<DecisionTextId>,
        ex_officio: Option<DecisionTextId>,
    },
    OnMerits {
        merits: DecisionTextId,
        ex_officio: Option<DecisionTextId>,
    },
}

impl VoteSelection {
    /// Builds a selection from loosely-typed parts, as received at the
    /// operation boundary.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the knowledge type and the referenced
    ///   decisions are inconsistent
    pub fn from_parts(
        knowledge_type: KnowledgeType,
        preliminary: Option<DecisionTextId>,
        merits: Option<DecisionTextId>,
        ex_officio: Option<DecisionTextId>,
    ) -> Result<Self, DomainError> {
        match knowledge_type {
            KnowledgeType::NonAdmission => {
                if merits.is_some() {
                    return Err(DomainError::validation(
                        "merits_decision",
                        "A non-admission vote cannot reference a merits decision",
                    ));
                }
                Ok(VoteSelection::NonAdmission {
                    preliminary,
                    ex_officio,
                })
            }
            KnowledgeType::OnMerits => {
                if preliminary.is_some() {
                    return Err(DomainError::validation(
                        "preliminary_decision",
                        "A merits vote cannot reference a preliminary decision",
                    ));
                }
                let merits = merits.ok_or_else(|| {
                    DomainError::validation(
                        "merits_decision",
                        "A merits vote requires exactly one merits decision",
                    )
                })?;
                Ok(VoteSelection::OnMerits { merits, ex_officio })
            }
        }
    }

    /// Knowledge type of this selection.
    pub fn knowledge_type(&self) -> KnowledgeType {
        match self {
            VoteSelection::NonAdmission { .. } => KnowledgeType::NonAdmission,
            VoteSelection::OnMerits { .. } => KnowledgeType::OnMerits,
        }
    }

    /// Grouping key used to partition votes into votings.
    pub fn grouping_key(&self) -> GroupingKey {
        match self {
            VoteSelection::NonAdmission {
                preliminary,
                ex_officio,
            } => GroupingKey {
                knowledge_type: KnowledgeType::NonAdmission,
                preliminary: *preliminary,
                merits: None,
                ex_officio: *ex_officio,
            },
            VoteSelection::OnMerits { merits, ex_officio } => GroupingKey {
                knowledge_type: KnowledgeType::OnMerits,
                preliminary: None,
                merits: Some(*merits),
                ex_officio: *ex_officio,
            },
        }
    }

    /// Merits decision, when present.
    pub fn merits(&self) -> Option<DecisionTextId> {
        match self {
            VoteSelection::OnMerits { merits, .. } => Some(*merits),
            VoteSelection::NonAdmission { .. } => None,
        }
    }

    /// Preliminary decision, when present.
    pub fn preliminary(&self) -> Option<DecisionTextId> {
        match self {
            VoteSelection::NonAdmission { preliminary, .. } => *preliminary,
            VoteSelection::OnMerits { .. } => None,
        }
    }

    /// Ex-officio decision, when present.
    pub fn ex_officio(&self) -> Option<DecisionTextId> {
        match self {
            VoteSelection::NonAdmission { ex_officio, .. }
            | VoteSelection::OnMerits { ex_officio, .. } => *ex_officio,
        }
    }
}

/// Decision combination identifying one voting.
///
/// Two votes belong to the same voting exactly when their keys are
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupingKey {
    pub knowledge_type: KnowledgeType,
    pub preliminary: Option<DecisionTextId>,
    pub merits: Option<DecisionTextId>,
    pub ex_officio: Option<DecisionTextId>,
}

impl GroupingKey {
    /// Human-readable label summarizing the decision combination.
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        match self.knowledge_type {
            KnowledgeType::NonAdmission => parts.push("Non-admission".to_string()),
            KnowledgeType::OnMerits => parts.push("On the merits".to_string()),
        }
        if let Some(id) = self.preliminary {
            parts.push(format!("preliminary {}", id.short()));
        }
        if let Some(id) = self.merits {
            parts.push(format!("merits {}", id.short()));
        }
        if let Some(id) = self.ex_officio {
            parts.push(format!("ex officio {}", id.short()));
        }
        parts.join(" / ")
    }
}

/// One member's individually cast position for a docket entry.
///
/// Immutable once created; never updated, only superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    id: VoteId,
    member_id: MemberId,
    role: MemberRole,
    selection: VoteSelection,
    rationale: Option<String>,
    cast_at: Timestamp,
    /// Set when the member re-casts; current votes have this unset.
    superseded_by: Option<VoteId>,
}

impl Vote {
    /// Records a newly cast vote.
    pub fn cast(
        id: VoteId,
        member_id: MemberId,
        role: MemberRole,
        selection: VoteSelection,
        rationale: Option<String>,
    ) -> Self {
        Self {
            id,
            member_id,
            role,
            selection,
            rationale,
            cast_at: Timestamp::now(),
            superseded_by: None,
        }
    }

    /// Reconstitute a vote from persistence.
    pub fn reconstitute(
        id: VoteId,
        member_id: MemberId,
        role: MemberRole,
        selection: VoteSelection,
        rationale: Option<String>,
        cast_at: Timestamp,
        superseded_by: Option<VoteId>,
    ) -> Self {
        Self {
            id,
            member_id,
            role,
            selection,
            rationale,
            cast_at,
            superseded_by,
        }
    }

    pub fn id(&self) -> &VoteId {
        &self.id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn selection(&self) -> &VoteSelection {
        &self.selection
    }

    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    pub fn cast_at(&self) -> &Timestamp {
        &self.cast_at
    }

    pub fn superseded_by(&self) -> Option<&VoteId> {
        self.superseded_by.as_ref()
    }

    /// A current vote has not been superseded by a re-cast.
    pub fn is_current(&self) -> bool {
        self.superseded_by.is_none()
    }

    /// Marks this vote as superseded by a newer one.
    pub(crate) fn mark_superseded(&mut self, by: VoteId) {
        self.superseded_by = Some(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_id(s: &str) -> DecisionTextId {
        format!("{}0e8400-e29b-41d4-a716-446655440000", s)
            .parse()
            .unwrap()
    }

    #[test]
    fn non_admission_rejects_merits_decision() {
        let err = VoteSelection::from_parts(
            KnowledgeType::NonAdmission,
            None,
            Some(DecisionTextId::new()),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.details.get("field"),
            Some(&"merits_decision".to_string())
        );
    }

    #[test]
    fn non_admission_allows_both_optionals_absent() {
        let selection =
            VoteSelection::from_parts(KnowledgeType::NonAdmission, None, None, None).unwrap();
        assert_eq!(selection.knowledge_type(), KnowledgeType::NonAdmission);
    }

    #[test]
    fn on_merits_requires_merits_decision() {
        let err =
            VoteSelection::from_parts(KnowledgeType::OnMerits, None, None, None).unwrap_err();
        assert_eq!(
            err.details.get("field"),
            Some(&"merits_decision".to_string())
        );
    }

    #[test]
    fn on_merits_rejects_preliminary_decision() {
        let err = VoteSelection::from_parts(
            KnowledgeType::OnMerits,
            Some(DecisionTextId::new()),
            Some(DecisionTextId::new()),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.details.get("field"),
            Some(&"preliminary_decision".to_string())
        );
    }

    #[test]
    fn on_merits_accepts_ex_officio_addition() {
        let selection = VoteSelection::from_parts(
            KnowledgeType::OnMerits,
            None,
            Some(DecisionTextId::new()),
            Some(DecisionTextId::new()),
        )
        .unwrap();
        assert!(selection.ex_officio().is_some());
    }

    #[test]
    fn grouping_key_equal_for_same_combination() {
        let merits = DecisionTextId::new();
        let a = VoteSelection::OnMerits {
            merits,
            ex_officio: None,
        };
        let b = VoteSelection::OnMerits {
            merits,
            ex_officio: None,
        };
        assert_eq!(a.grouping_key(), b.grouping_key());
    }

    #[test]
    fn grouping_key_differs_on_merits_decision() {
        let a = VoteSelection::OnMerits {
            merits: DecisionTextId::new(),
            ex_officio: None,
        };
        let b = VoteSelection::OnMerits {
            merits: DecisionTextId::new(),
            ex_officio: None,
        };
        assert_ne!(a.grouping_key(), b.grouping_key());
    }

    #[test]
    fn grouping_key_differs_on_knowledge_type() {
        let a = VoteSelection::NonAdmission {
            preliminary: None,
            ex_officio: None,
        };
        let b = VoteSelection::OnMerits {
            merits: DecisionTextId::new(),
            ex_officio: None,
        };
        assert_ne!(a.grouping_key(), b.grouping_key());
    }

    #[test]
    fn label_summarizes_combination() {
        let key = VoteSelection::OnMerits {
            merits: text_id("55"),
            ex_officio: None,
        }
        .grouping_key();
        assert_eq!(key.label(), "On the merits / merits 550e8400");
    }

    #[test]
    fn new_vote_is_current_until_superseded() {
        let mut vote = Vote::cast(
            VoteId::new(),
            MemberId::new(),
            MemberRole::Rapporteur,
            VoteSelection::NonAdmission {
                preliminary: None,
                ex_officio: None,
            },
            Some("inadmissible for lateness".to_string()),
        );
        assert!(vote.is_current());

        let newer = VoteId::new();
        vote.mark_superseded(newer);
        assert!(!vote.is_current());
        assert_eq!(vote.superseded_by(), Some(&newer));
    }
}
