//! Session command handlers - docket lifecycle operations.

mod add_case;
mod cancel_session;
mod conclude_session;
mod create_session;
mod publish_docket;
mod remove_case;
mod set_case_status;

pub use add_case::{AddCaseCommand, AddCaseError, AddCaseHandler, AddCaseResult, CaseAddedEvent};
pub use cancel_session::{
    CancelSessionCommand, CancelSessionError, CancelSessionHandler, CancelSessionResult,
    SessionCancelledEvent,
};
pub use conclude_session::{
    ConcludeSessionCommand, ConcludeSessionError, ConcludeSessionHandler, ConcludeSessionResult,
    SessionConcludedEvent,
};
pub use create_session::{
    CreateSessionCommand, CreateSessionError, CreateSessionHandler, CreateSessionResult,
    SessionCreatedEvent,
};
pub use publish_docket::{
    DocketPublishedEvent, PublishDocketCommand, PublishDocketError, PublishDocketHandler,
    PublishDocketResult,
};
pub use remove_case::{
    CaseRemovedEvent, RemoveCaseCommand, RemoveCaseError, RemoveCaseHandler, RemoveCaseResult,
};
pub use set_case_status::{
    CaseStatusChangedEvent, SetCaseStatusCommand, SetCaseStatusError, SetCaseStatusHandler,
    SetCaseStatusResult,
};
