//! Error types for the voice pool.

use crate::handle::PlaybackId;

/// Result type alias for voice pool operations.
pub type Result<T> = std::result::Result<T, VoiceError>;

/// Errors reported by the voice pool and its playback handles.
///
/// Usage errors (`NoAvailableVoice`, `NullClip`, `StaleHandle`) are
/// non-fatal: the pool logs them and the operation degrades to a no-op.
/// `SlotInvariantViolation` indicates a bug in slot bookkeeping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VoiceError {
    /// Every voice in the pool is busy.
    #[error("No available voice: all {capacity} voices are busy")]
    NoAvailableVoice { capacity: usize },

    /// Playback was requested for a clip without audio data.
    #[error("Requested playback of an empty clip")]
    NullClip,

    /// The handle no longer controls its voice.
    #[error("Playback {id} has expired")]
    StaleHandle { id: PlaybackId },

    /// A voice was assigned while it was still playing.
    #[error("Voice {slot} was assigned while already playing")]
    SlotInvariantViolation { slot: usize },

    /// The playback unit failed to start.
    #[error("Playback backend error: {0}")]
    Backend(String),

    /// Invalid pool or music configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VoiceError {
    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Whether this error is a usage error that callers are expected to
    /// tolerate (exhausted pool, empty clip, expired handle).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoAvailableVoice { .. } | Self::NullClip | Self::StaleHandle { .. }
        )
    }
}
