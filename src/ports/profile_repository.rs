//! ProfileRepository port for conversation persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::ConversationId;
use crate::domain::profile::ProfileState;

/// Storage failures.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("stored profile could not be decoded: {0}")]
    Corrupt(String),
}

/// Stores conversation state between turns.
///
/// One conversation is always processed sequentially, so implementations
/// only need to make each load/save pair atomic per conversation id; no
/// cross-conversation coordination is required.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Loads a conversation's state, if it exists.
    async fn load(&self, id: ConversationId) -> Result<Option<ProfileState>, RepositoryError>;

    /// Saves (creates or replaces) a conversation's state.
    async fn save(&self, state: &ProfileState) -> Result<(), RepositoryError>;

    /// Deletes a conversation's state.
    async fn delete(&self, id: ConversationId) -> Result<(), RepositoryError>;
}
