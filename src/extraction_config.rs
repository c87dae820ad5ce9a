//! # Extraction Configuration Module
//!
//! This module defines configuration structures for the extraction client,
//! including recovery settings and image upload limits.

// Constants for extraction configuration
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const FORMAT_DETECTION_BUFFER_SIZE: usize = 32;
pub const MIN_FORMAT_BYTES: usize = 8;
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB limit for uploads

/// Recovery configuration for error handling
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single request in seconds
    pub operation_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 1000,  // 1 second
            max_retry_delay_ms: 10000,  // 10 seconds
            operation_timeout_secs: 30, // 30 seconds
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Limits applied to images before upload
#[derive(Debug, Clone)]
pub struct ImageLimits {
    /// Largest accepted file in bytes
    pub max_file_size: u64,
    /// Bytes read for format sniffing
    pub buffer_size: usize,
    /// Minimum bytes required for format detection
    pub min_format_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            buffer_size: FORMAT_DETECTION_BUFFER_SIZE,
            min_format_bytes: MIN_FORMAT_BYTES,
        }
    }
}

/// Configuration structure for the extraction client
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Base URL of the extraction service, without trailing slash
    pub service_url: String,
    /// Image upload limits
    pub image_limits: ImageLimits,
    /// Recovery and error handling configuration
    pub recovery: RecoveryConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            image_limits: ImageLimits::default(),
            recovery: RecoveryConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Build an endpoint URL below the service base
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.service_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_slashes() {
        let config = ExtractionConfig {
            service_url: "https://recipes.example/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint("/parse-url"), "https://recipes.example/parse-url");
        assert_eq!(
            ExtractionConfig::default().endpoint("parse-image"),
            "http://localhost:8000/parse-image"
        );
    }
}
