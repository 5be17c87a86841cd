//! Decision command handlers - creation and publication versioning.

mod create_decision;
mod publish_decision;

pub use create_decision::{
    CreateDecisionCommand, CreateDecisionError, CreateDecisionHandler, CreateDecisionResult,
    DecisionCreatedEvent,
};
pub use publish_decision::{
    DecisionPublishedEvent, PublishDecisionCommand, PublishDecisionError, PublishDecisionHandler,
    PublishDecisionResult,
};
