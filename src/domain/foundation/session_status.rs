//! SessionStatus enum for the hearing-session lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a hearing session.
///
/// `Concluded` and `Cancelled` are terminal. A session's docket is
/// editable (cases added or removed) only before conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    AwaitingPublication,
    DocketPublished,
    Concluded,
    Cancelled,
}

impl SessionStatus {
    /// Returns true while the docket may still be edited.
    pub fn is_docket_editable(&self) -> bool {
        matches!(
            self,
            SessionStatus::AwaitingPublication | SessionStatus::DocketPublished
        )
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (AwaitingPublication, DocketPublished)
                | (AwaitingPublication, Cancelled)
                | (DocketPublished, Concluded)
                | (DocketPublished, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            AwaitingPublication => vec![DocketPublished, Cancelled],
            DocketPublished => vec![Concluded, Cancelled],
            Concluded | Cancelled => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::AwaitingPublication => "AwaitingPublication",
            SessionStatus::DocketPublished => "DocketPublished",
            SessionStatus::Concluded => "Concluded",
            SessionStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_awaiting_publication() {
        assert_eq!(SessionStatus::default(), SessionStatus::AwaitingPublication);
    }

    #[test]
    fn docket_editable_before_conclusion() {
        assert!(SessionStatus::AwaitingPublication.is_docket_editable());
        assert!(SessionStatus::DocketPublished.is_docket_editable());
        assert!(!SessionStatus::Concluded.is_docket_editable());
        assert!(!SessionStatus::Cancelled.is_docket_editable());
    }

    #[test]
    fn awaiting_can_publish_or_cancel() {
        let s = SessionStatus::AwaitingPublication;
        assert!(s.can_transition_to(&SessionStatus::DocketPublished));
        assert!(s.can_transition_to(&SessionStatus::Cancelled));
        assert!(!s.can_transition_to(&SessionStatus::Concluded));
    }

    #[test]
    fn published_can_conclude_or_cancel() {
        let s = SessionStatus::DocketPublished;
        assert!(s.can_transition_to(&SessionStatus::Concluded));
        assert!(s.can_transition_to(&SessionStatus::Cancelled));
        assert!(!s.can_transition_to(&SessionStatus::AwaitingPublication));
    }

    #[test]
    fn concluded_and_cancelled_are_terminal() {
        assert!(SessionStatus::Concluded.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::DocketPublished).unwrap(),
            "\"docket_published\""
        );
    }
}
