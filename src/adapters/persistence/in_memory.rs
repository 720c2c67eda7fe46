//! In-memory profile repository.
//!
//! Keeps conversation state in a process-local map. Each save replaces the
//! whole record under a write lock, which gives the per-conversation
//! read-modify-write atomicity the port asks for as long as a conversation
//! is driven sequentially (which the handlers guarantee).

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::ConversationId;
use crate::domain::profile::ProfileState;
use crate::ports::{ProfileRepository, RepositoryError};

/// Process-local conversation store.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<ConversationId, ProfileState>>,
}

impl InMemoryProfileRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations (for test assertions).
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn load(&self, id: ConversationId) -> Result<Option<ProfileState>, RepositoryError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn save(&self, state: &ProfileState) -> Result<(), RepositoryError> {
        self.profiles.write().await.insert(state.id, state.clone());
        Ok(())
    }

    async fn delete(&self, id: ConversationId) -> Result<(), RepositoryError> {
        self.profiles.write().await.remove(&id);
        Ok(())
    }
}
