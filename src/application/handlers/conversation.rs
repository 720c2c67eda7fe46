//! Advance-conversation command handler.
//!
//! Loads (or creates) the conversation, advances it by one user message,
//! and persists the updated state. Conversations are strictly sequential:
//! a turn is loaded, advanced, and saved before the next one starts, so
//! the repository only needs per-conversation atomicity.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::dialogue::{DialogError, DialogOrchestrator, TurnStatus};
use crate::domain::foundation::ConversationId;
use crate::domain::profile::ProfileState;
use crate::ports::{ProfileRepository, RepositoryError};

/// One user message for one conversation.
#[derive(Debug, Clone)]
pub struct AdvanceConversationCommand {
    pub conversation_id: ConversationId,
    pub message: String,
}

/// The coach's reply and where the conversation stands.
#[derive(Debug, Clone)]
pub struct AdvanceConversationResult {
    pub reply: Option<String>,
    pub status: TurnStatus,
}

/// Failures while advancing a conversation.
#[derive(Debug, Error)]
pub enum AdvanceConversationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Dialog(#[from] DialogError),
}

/// Handles [`AdvanceConversationCommand`].
pub struct AdvanceConversationHandler {
    repository: Arc<dyn ProfileRepository>,
    orchestrator: DialogOrchestrator,
}

impl AdvanceConversationHandler {
    /// Creates the handler.
    pub fn new(repository: Arc<dyn ProfileRepository>, orchestrator: DialogOrchestrator) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    /// Advances one conversation by one message.
    ///
    /// A dialogue error leaves the stored state untouched, so the caller
    /// can retry the same message.
    #[instrument(skip(self, command), fields(conversation = %command.conversation_id))]
    pub async fn handle(
        &self,
        command: AdvanceConversationCommand,
    ) -> Result<AdvanceConversationResult, AdvanceConversationError> {
        let state = self
            .repository
            .load(command.conversation_id)
            .await?
            .unwrap_or_else(|| ProfileState::new(command.conversation_id));

        let outcome = self.orchestrator.advance(&state, &command.message).await?;
        self.repository.save(&outcome.state).await?;

        info!(
            status = ?outcome.status,
            state = ?outcome.state.dialog_state,
            failures = outcome.state.failure_count,
            "conversation advanced"
        );

        Ok(AdvanceConversationResult {
            reply: outcome.reply,
            status: outcome.status,
        })
    }
}
