//! Command handlers.

mod conversation;
mod planning;

pub use conversation::{
    AdvanceConversationCommand, AdvanceConversationError, AdvanceConversationHandler,
    AdvanceConversationResult,
};
pub use planning::{GeneratePlanCommand, GeneratePlanError, GeneratePlanHandler, GeneratedPlan};
