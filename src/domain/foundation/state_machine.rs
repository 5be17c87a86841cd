//! State machine trait for status enums.
//!
//! Gives the plain status enums (session, voting, decision) validated
//! transitions through one shared interface. `DocketStatus` carries
//! payload data and implements its own transition check instead.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid(
                "status",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Open,
        Closed,
        Archived,
    }

    impl StateMachine for Phase {
        fn can_transition_to(&self, target: &Self) -> bool {
            use Phase::*;
            matches!((self, target), (Open, Closed) | (Closed, Archived))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Phase::*;
            match self {
                Open => vec![Closed],
                Closed => vec![Archived],
                Archived => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(Phase::Open.transition_to(Phase::Closed), Ok(Phase::Closed));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        assert!(Phase::Open.transition_to(Phase::Archived).is_err());
    }

    #[test]
    fn is_terminal_matches_empty_transition_set() {
        assert!(Phase::Archived.is_terminal());
        assert!(!Phase::Open.is_terminal());
    }
}
