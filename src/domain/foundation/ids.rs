//! Strongly-typed identifier value objects.
//!
//! Every entity in the engine is addressed by its own UUID newtype so
//! that a voting id can never be passed where a vote id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short prefix of the UUID, used in generated labels.
            pub fn short(&self) -> String {
                self.0.to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a hearing session.
    SessionId
);

uuid_id!(
    /// Unique identifier for a case on a session's docket.
    DocketEntryId
);

uuid_id!(
    /// Reference to a case in the external case registry.
    CaseId
);

uuid_id!(
    /// Reference to a board member in the external member registry.
    MemberId
);

uuid_id!(
    /// Unique identifier for a single cast vote.
    VoteId
);

uuid_id!(
    /// Unique identifier for a voting (a group of votes resolved as a unit).
    VotingId
);

uuid_id!(
    /// Unique identifier for a judgment.
    JudgmentId
);

uuid_id!(
    /// Unique identifier for a publishable decision.
    DecisionId
);

uuid_id!(
    /// Reference to a canonical decision text in the external registry.
    DecisionTextId
);
