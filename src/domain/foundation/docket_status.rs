//! DocketStatus enum for a case's status within a session's docket.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MemberId;

/// Status of a single case on a session's docket.
///
/// `Judged` is terminal and is reachable only through judgment
/// finalization, never through a plain status change. The other
/// non-default statuses are excursions from `OnDocket` and may return
/// to it.
///
/// Carries payload data (`UnderInquiry` deadline, `ViewRequested`
/// member), so this is not a plain `Copy` status enum; transition
/// checks compare variants, not payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocketStatus {
    OnDocket,
    Suspended,
    UnderInquiry { deadline_days: u32 },
    ViewRequested { member_id: MemberId },
    Judged,
}

impl DocketStatus {
    /// Returns true if a plain status change from self to target is valid.
    ///
    /// Does not admit `Judged` as a target; that transition belongs to
    /// judgment finalization.
    pub fn can_transition_to(&self, target: &DocketStatus) -> bool {
        use DocketStatus::*;
        match (self, target) {
            (OnDocket, Suspended | UnderInquiry { .. } | ViewRequested { .. }) => true,
            (Suspended | UnderInquiry { .. } | ViewRequested { .. }, OnDocket) => true,
            _ => false,
        }
    }

    /// Returns true once the entry has been judged.
    pub fn is_judged(&self) -> bool {
        matches!(self, DocketStatus::Judged)
    }

    /// Variant name without payload, for error details and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DocketStatus::OnDocket => "OnDocket",
            DocketStatus::Suspended => "Suspended",
            DocketStatus::UnderInquiry { .. } => "UnderInquiry",
            DocketStatus::ViewRequested { .. } => "ViewRequested",
            DocketStatus::Judged => "Judged",
        }
    }
}

impl Default for DocketStatus {
    fn default() -> Self {
        DocketStatus::OnDocket
    }
}

impl fmt::Display for DocketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocketStatus::UnderInquiry { deadline_days } => {
                write!(f, "UnderInquiry({} days)", deadline_days)
            }
            DocketStatus::ViewRequested { member_id } => {
                write!(f, "ViewRequested({})", member_id)
            }
            other => write!(f, "{}", other.kind()),
        }
    }
}
