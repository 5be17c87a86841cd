//! DecisionStatus enum for the publishable decision lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a publishable decision.
///
/// A decision stays `Republished` once any republication exists; the
/// full history lives in its publication list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    #[default]
    Pending,
    Published,
    Republished,
}

impl StateMachine for DecisionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DecisionStatus::*;
        matches!(
            (self, target),
            (Pending, Published) | (Published, Republished) | (Republished, Republished)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DecisionStatus::*;
        match self {
            Pending => vec![Published],
            Published => vec![Republished],
            Republished => vec![Republished],
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionStatus::Pending => "Pending",
            DecisionStatus::Published => "Published",
            DecisionStatus::Republished => "Republished",
        };
        write!(f, "{}", s)
    }
}
