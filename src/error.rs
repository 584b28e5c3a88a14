//! Error types and result utilities for decoding and playback.

use std::time::Duration;
use thiserror::Error;

/// Convenience type alias for results that may contain an [`AudioError`].
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types that can occur while decoding a clip or driving the backend.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The stream does not start with a `RIFF`/`WAVE`/`fmt ` header.
    #[error("Not a WAV file")]
    NotAWavFile,

    /// The stream is a WAV container, but not one this decoder can handle.
    #[error("Unsupported WAV file: {0}")]
    UnsupportedWavFile(UnsupportedReason),

    /// The underlying reader failed while a chunk was being parsed.
    #[error("Cannot read WAV data: {0}")]
    ReadError(#[from] std::io::Error),

    /// The `data` chunk declared more bytes than the stream contained.
    #[error("WAV data size doesn't match: declared {expected} bytes, read {actual}")]
    SizeMismatch {
        /// Size declared by the chunk header.
        expected: usize,
        /// Bytes actually obtained from the stream.
        actual: usize,
    },

    /// Opening the output device or activating a context failed.
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The backend rejected a call.
    #[error("Hardware error during {operation}: {details}")]
    HardwareError {
        /// Backend operation that failed.
        operation: &'static str,
        /// Backend supplied description.
        details: String,
    },

    /// Playback was cancelled through its [`CancelToken`](crate::playback::CancelToken).
    #[error("Playback cancelled")]
    Cancelled,

    /// Playback did not complete within the configured timeout.
    #[error("Playback timed out after {0:?}")]
    TimedOut(Duration),
}

/// Why a structurally valid WAV stream was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The chunk following `fmt ` is not `data`.
    MissingDataChunk,
    /// The `fmt ` chunk is not 16, 18 or 40 bytes long.
    UnsupportedFmtSize(u32),
    /// Only mono and stereo clips can be mapped to a buffer format.
    UnsupportedChannelCount(u16),
    /// Only 8 and 16 bit PCM can be mapped to a buffer format.
    UnsupportedBitDepth(u16),
}

impl std::fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDataChunk => write!(f, "missing data chunk"),
            Self::UnsupportedFmtSize(size) => write!(f, "fmt chunk of {size} bytes"),
            Self::UnsupportedChannelCount(channels) => write!(f, "{channels} channels"),
            Self::UnsupportedBitDepth(bits) => write!(f, "{bits} bits per sample"),
        }
    }
}

impl AudioError {
    /// Create a hardware error for the given backend operation.
    pub fn hardware(operation: &'static str, details: impl Into<String>) -> Self {
        Self::HardwareError {
            operation,
            details: details.into(),
        }
    }

    /// Create a device unavailable error.
    pub fn device_unavailable(details: impl Into<String>) -> Self {
        Self::DeviceUnavailable(details.into())
    }

    /// Check if this error was produced while decoding the clip.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::NotAWavFile
                | Self::UnsupportedWavFile(_)
                | Self::ReadError(_)
                | Self::SizeMismatch { .. }
        )
    }

    /// Check if this error indicates a device problem.
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceUnavailable(_))
    }

    /// Check if playback was stopped early by the caller.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled | Self::TimedOut(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(AudioError::NotAWavFile.is_decode_error());
        assert!(
            AudioError::SizeMismatch {
                expected: 4,
                actual: 2
            }
            .is_decode_error()
        );
        assert!(AudioError::device_unavailable("no output").is_device_error());
        assert!(!AudioError::hardware("play", "invalid name").is_decode_error());
        assert!(AudioError::TimedOut(Duration::from_secs(1)).is_interrupted());
    }

    #[test]
    fn test_unsupported_reason_display() {
        let err = AudioError::UnsupportedWavFile(UnsupportedReason::UnsupportedFmtSize(20));
        assert_eq!(err.to_string(), "Unsupported WAV file: fmt chunk of 20 bytes");
    }
}
