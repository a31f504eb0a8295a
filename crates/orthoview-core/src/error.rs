//! Error types for the synchronization engine.
//!
//! Recoverable errors (`SessionState`, `NoLayers`, `IncompatibleLayer`)
//! are surfaced at the offending call site with no partial mirrors left
//! behind. `MirrorNotFound` is an invariant violation: the session logs
//! it and tears itself down rather than continue half-synchronized.

use thiserror::Error;

use crate::host::ViewportId;

/// Main error type for synchronization operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Starting an already-active session, or acting on an inactive one.
    #[error("invalid session state: {message}")]
    SessionState { message: String },

    /// The primary viewport holds no layers at session start.
    #[error("no layers in the primary viewport, cannot start synchronization")]
    NoLayers,

    /// A layer is not three-dimensional or has an unsupported kind.
    #[error("layer '{name}' is not compatible: {reason}")]
    IncompatibleLayer { name: String, reason: String },

    /// An expected mirror or overlay layer is missing from a viewport.
    #[error("expected layer '{name}' not found in {viewport:?}")]
    MirrorNotFound { name: String, viewport: ViewportId },
}

impl SyncError {
    /// Convenience constructor for session-state violations.
    pub fn session_state(message: impl Into<String>) -> Self {
        SyncError::SessionState {
            message: message.into(),
        }
    }

    /// Convenience constructor for incompatible layers.
    pub fn incompatible(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncError::IncompatibleLayer {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error forces full session teardown.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::MirrorNotFound { .. })
    }
}

/// Result type alias for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_context() {
        let err = SyncError::incompatible("surface0", "unsupported kind");
        assert!(err.to_string().contains("surface0"));
        assert!(err.to_string().contains("unsupported kind"));
    }

    #[test]
    fn test_fatal_split() {
        assert!(SyncError::MirrorNotFound {
            name: "tomogram".to_string(),
            viewport: ViewportId::SecondaryA,
        }
        .is_fatal());
        assert!(!SyncError::NoLayers.is_fatal());
        assert!(!SyncError::session_state("already active").is_fatal());
    }
}
