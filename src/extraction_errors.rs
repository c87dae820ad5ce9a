//! # Extraction Error Types Module
//!
//! This module defines the error type returned by ingredient sources.
//! Service-side "no recipe found" answers are not errors; they are reported
//! through [`crate::extraction::ExtractionOutcome`].

/// Custom error types for extraction requests
#[derive(Debug, Clone)]
pub enum ExtractionError {
    /// Input rejected before any request was made (bad path, bad format)
    Validation(String),
    /// The service could not be reached
    Network(String),
    /// The request did not finish within the configured timeout
    Timeout(String),
    /// The service answered with an error status
    Service { status: u16, detail: String },
    /// The response body could not be decoded
    InvalidResponse(String),
    /// Too many recent failures, requests are short-circuited
    CircuitOpen,
}

impl ExtractionError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ExtractionError::Network(_) | ExtractionError::Timeout(_) => true,
            ExtractionError::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::Validation(msg) => write!(f, "Validation error: {msg}"),
            ExtractionError::Network(msg) => write!(f, "Network error: {msg}"),
            ExtractionError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            ExtractionError::Service { status, detail } => {
                write!(f, "Service error ({status}): {detail}")
            }
            ExtractionError::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            ExtractionError::CircuitOpen => {
                write!(f, "Extraction service is temporarily unavailable")
            }
        }
    }
}

impl std::error::Error for ExtractionError {}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExtractionError::Timeout(err.to_string())
        } else if err.is_decode() {
            ExtractionError::InvalidResponse(err.to_string())
        } else {
            ExtractionError::Network(err.to_string())
        }
    }
}
