//! Error types for the rodio backend.

use horizon_voices::VoiceError;

/// Result type alias for rodio backend operations.
pub type Result<T> = std::result::Result<T, RodioError>;

/// Errors raised while opening the output device or loading and playing
/// sound data.
#[derive(Debug, thiserror::Error)]
pub enum RodioError {
    /// No usable audio output device.
    #[error("Audio device error: {0}")]
    Device(#[from] rodio::StreamError),

    /// A sink could not be created on the output stream.
    #[error("Playback error: {0}")]
    Play(#[from] rodio::PlayError),

    /// The sound data could not be decoded.
    #[error("Failed to decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    /// Reading sound data failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid backend configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<RodioError> for VoiceError {
    fn from(err: RodioError) -> Self {
        match err {
            RodioError::InvalidConfig(message) => VoiceError::InvalidConfig(message),
            other => VoiceError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let err: RodioError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, RodioError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: missing");
    }

    #[test]
    fn test_conversion_into_voice_error() {
        let err = RodioError::Io(std::io::Error::other("device unplugged"));
        assert_eq!(
            VoiceError::from(err),
            VoiceError::Backend("I/O error: device unplugged".into())
        );

        let err = RodioError::InvalidConfig("ear spacing must be positive".into());
        assert_eq!(
            VoiceError::from(err),
            VoiceError::InvalidConfig("ear spacing must be positive".into())
        );
    }
}
