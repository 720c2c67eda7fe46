//! Dialogue errors.

use thiserror::Error;

use crate::ports::OracleError;

use super::state::DialogState;

/// Errors surfaced while advancing a conversation.
///
/// An oracle failure leaves the caller's `ProfileState` untouched, so the
/// same turn can simply be retried.
#[derive(Debug, Error)]
pub enum DialogError {
    /// An external judgment call failed or timed out.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The machine attempted an illegal transition. Indicates a bug.
    #[error("invalid dialogue transition from {from:?} to {to:?}")]
    InvalidTransition { from: DialogState, to: DialogState },
}

impl DialogError {
    /// True when retrying the same turn may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Oracle(err) => err.is_retryable(),
            Self::InvalidTransition { .. } => false,
        }
    }
}
