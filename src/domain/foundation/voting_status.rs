//! VotingStatus enum for vote-group resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Status of a voting (a group of votes resolved as a unit).
///
/// Completion is one-way; no reopen operation exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VotingStatus {
    #[default]
    Pending,
    Completed,
}

impl StateMachine for VotingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (VotingStatus::Pending, VotingStatus::Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            VotingStatus::Pending => vec![VotingStatus::Completed],
            VotingStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for VotingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VotingStatus::Pending => "Pending",
            VotingStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_completes_once() {
        assert!(VotingStatus::Pending.can_transition_to(&VotingStatus::Completed));
        assert!(VotingStatus::Completed.is_terminal());
    }
}
