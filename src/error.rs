//! Error handling for Rawclip
//!
//! Only loading and configuration can fail. Every numeric edge case in the
//! transform pipeline (silence, short buffers, degenerate selections) is
//! absorbed into a well-defined output instead of an error.

use thiserror::Error;

/// Result type alias for Rawclip operations
pub type Result<T> = std::result::Result<T, RawclipError>;

/// Message shown to users for any input that is not recognizable audio
pub const INVALID_FILE_TYPE_MESSAGE: &str = "Invalid file type";

/// Main error type for Rawclip operations
#[derive(Error, Debug)]
pub enum RawclipError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The container or codec was not recognized, or decoding the stream failed.
    #[error("Invalid file type: {reason}")]
    InvalidFileType {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any other failure reported by the decoder.
    #[error("{reason}")]
    Decode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    // Session Errors
    #[error("No audio loaded: {operation} needs a preview buffer")]
    NoPreview { operation: String },

    // Export Errors
    #[error("Output {path} was already written from {previous} in this batch")]
    OutputCollision { path: String, previous: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RawclipError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            RawclipError::FileNotFound { .. } => "FILE_NOT_FOUND",
            RawclipError::InvalidFileType { .. } => "INVALID_FILE_TYPE",
            RawclipError::Decode { .. } => "DECODE_ERROR",
            RawclipError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            RawclipError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            RawclipError::NoPreview { .. } => "NO_PREVIEW",
            RawclipError::OutputCollision { .. } => "OUTPUT_COLLISION",
            RawclipError::Io(_) => "IO_ERROR",
            RawclipError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors concern a single input; processing of other inputs
    /// can continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RawclipError::FileNotFound { .. }
                | RawclipError::InvalidFileType { .. }
                | RawclipError::Decode { .. }
                | RawclipError::UnsupportedFormat { .. }
                | RawclipError::InvalidConfiguration { .. }
                | RawclipError::NoPreview { .. }
                | RawclipError::OutputCollision { .. }
        )
    }

    /// Get the message to show the user for this error
    ///
    /// Unrecognized input collapses to a generic "Invalid file type"; any other
    /// decoder message is passed through as-is.
    pub fn friendly_message(&self) -> String {
        match self {
            RawclipError::InvalidFileType { .. } => INVALID_FILE_TYPE_MESSAGE.to_string(),
            RawclipError::Decode { reason, .. } => {
                if reason.is_empty() {
                    "Unknown error".to_string()
                } else {
                    reason.clone()
                }
            }
            RawclipError::FileNotFound { path, .. } => {
                format!("Couldn't find the file at '{}'", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = RawclipError::FileNotFound {
            path: "test.wav".to_string(),
            source: None,
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");

        let err = RawclipError::NoPreview {
            operation: "export".to_string(),
        };
        assert_eq!(err.error_code(), "NO_PREVIEW");
    }

    #[test]
    fn test_invalid_file_type_is_generic() {
        let err = RawclipError::InvalidFileType {
            reason: "no RIFF tag found".to_string(),
            source: None,
        };
        assert_eq!(err.friendly_message(), "Invalid file type");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_decode_message_passes_through() {
        let err = RawclipError::Decode {
            reason: "stream ended after 12 packets".to_string(),
            source: None,
        };
        assert_eq!(err.friendly_message(), "stream ended after 12 packets");
        assert_eq!(err.to_string(), "stream ended after 12 packets");
    }

    #[test]
    fn test_io_error_not_recoverable() {
        let err: RawclipError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!err.is_recoverable());
    }
}
