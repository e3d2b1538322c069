//! Error types for the sync module.

use std::fmt;

use thiserror::Error;

/// Error produced by a stream transform.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which half of a pairwise sync a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The first transform passed to a sync; it consumes `I` and produces `O`.
    First,
    /// The second transform; it consumes `O` and produces `I`.
    Second,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => f.write_str("first"),
            Side::Second => f.write_str("second"),
        }
    }
}

/// Errors that can occur during sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A transform yielded an error instead of its next value.
    #[error("{side} transform failed: {source}")]
    Transform {
        side: Side,
        #[source]
        source: BoxError,
    },

    /// A value was sent on a channel its own producer had already closed.
    #[error("send on a closed channel")]
    ChannelClosed,

    /// A sync task panicked.
    #[error("sync task panicked: {0}")]
    TaskPanicked(String),

    /// A sync task was cancelled from outside its scope.
    #[error("sync task cancelled")]
    Cancelled,
}

impl SyncError {
    /// The side whose transform failed, if this is a transform failure.
    pub fn side(&self) -> Option<Side> {
        match self {
            SyncError::Transform { side, .. } => Some(*side),
            _ => None,
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
