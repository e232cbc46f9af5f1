use thiserror::Error;

/// Longest rejection reason (in characters) a reviewer may record.
pub const MAX_REASON_LEN: usize = 500;

/// Failures surfaced by moderation, archival, audience and listing operations.
///
/// All variants are terminal for the request: nothing is retried internally
/// and nothing is partially applied.
#[derive(Error, Debug)]
pub enum ModerationError {
    /// Malformed input, rejected before any write.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The item does not exist or has been soft-deleted.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: uuid::Uuid },

    /// The transition is illegal from the item's current status.
    #[error("Cannot {action} {kind} {id}: {reason}")]
    InvalidTransition {
        kind: &'static str,
        id: uuid::Uuid,
        action: &'static str,
        reason: String,
    },

    /// The conditional update matched no row: another writer moved the item
    /// between our read and our write.
    #[error("Concurrent update lost while trying to {action} {kind} {id}")]
    ConflictWriteLost {
        kind: &'static str,
        id: uuid::Uuid,
        action: &'static str,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ModerationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for the two outcomes callers treat alike: refresh and re-render.
    pub fn is_stale_state(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::ConflictWriteLost { .. }
        )
    }
}

pub type ModerationResult<T> = std::result::Result<T, ModerationError>;
