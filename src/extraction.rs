//! # Extraction Client Module
//!
//! This module talks to the ingredient extraction service, which scrapes
//! recipe pages or runs OCR on photographed recipes and answers with a list of
//! `{name, amount, unit}` triples.
//!
//! ## Features
//!
//! - [`IngredientSource`] trait so the planner can run against any source
//! - `POST {base}/parse-url?url=...` and multipart `POST {base}/parse-image`
//! - Request timeout, exponential backoff with jitter, circuit breaker
//! - Image validation (existence, size, format sniffing) before upload
//!
//! ## Usage
//!
//! ```rust,no_run
//! use madplan::extraction::{HttpExtractionClient, IngredientSource};
//! use madplan::extraction_config::ExtractionConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = HttpExtractionClient::new(ExtractionConfig::default())?;
//! let outcome = client.from_url("https://example.com/opskrift").await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::future::Future;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::extraction_config::{ExtractionConfig, ImageLimits, RecoveryConfig};
use crate::extraction_errors::ExtractionError;
use crate::ingredient_model::RawIngredient;

/// Response body of both extraction endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    #[serde(default)]
    pub ingredients: Vec<RawIngredient>,
    pub success: bool,
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What the service found
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// At least one ingredient was extracted
    Found {
        ingredients: Vec<RawIngredient>,
        recipe_name: Option<String>,
    },
    /// The service reported that it could not extract a recipe
    NotFound {
        recipe_name: Option<String>,
        reason: Option<String>,
    },
    /// The service succeeded but returned no ingredients
    Empty { recipe_name: Option<String> },
}

impl ExtractionResponse {
    pub fn into_outcome(self) -> ExtractionOutcome {
        let recipe_name = self
            .recipe_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        if !self.success {
            ExtractionOutcome::NotFound {
                recipe_name,
                reason: self.error,
            }
        } else if self.ingredients.is_empty() {
            ExtractionOutcome::Empty { recipe_name }
        } else {
            ExtractionOutcome::Found {
                ingredients: self.ingredients,
                recipe_name,
            }
        }
    }
}

/// Error body of the service, `{"detail": ...}`
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    detail: serde_json::Value,
}

/// Map an HTTP status and body to an outcome or error
pub fn outcome_from_body(status: u16, body: &str) -> Result<ExtractionOutcome, ExtractionError> {
    if (200..300).contains(&status) {
        let response: ExtractionResponse = serde_json::from_str(body)
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
        return Ok(response.into_outcome());
    }

    let detail = match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(ServiceErrorBody {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ServiceErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    };
    Err(ExtractionError::Service { status, detail })
}

/// A source of raw ingredients
#[async_trait]
pub trait IngredientSource: Send + Sync {
    /// Extract ingredients from a recipe web page
    async fn from_url(&self, url: &str) -> Result<ExtractionOutcome, ExtractionError>;

    /// Extract ingredients from a photographed recipe
    async fn from_image(&self, path: &Path) -> Result<ExtractionOutcome, ExtractionError>;
}

/// HTTP client for the extraction service
#[derive(Debug)]
pub struct HttpExtractionClient {
    client: reqwest::Client,
    config: ExtractionConfig,
    circuit_breaker: CircuitBreaker,
}

impl HttpExtractionClient {
    pub fn new(config: ExtractionConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.recovery.operation_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            circuit_breaker: CircuitBreaker::new(config.recovery.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run a request with retries, guarded by the circuit breaker
    async fn execute<F, Fut>(
        &self,
        operation: &str,
        mut request: F,
    ) -> Result<ExtractionOutcome, ExtractionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<ExtractionOutcome, ExtractionError>>,
    {
        if self.circuit_breaker.is_open() {
            warn!(operation, "Circuit breaker is open, skipping request");
            return Err(ExtractionError::CircuitOpen);
        }

        let max_attempts = self.config.recovery.max_retries + 1;
        let mut attempt = 1;

        loop {
            match request().await {
                Ok(outcome) => {
                    self.circuit_breaker.record_success();
                    debug!(operation, attempt, "Extraction request succeeded");
                    return Ok(outcome);
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay_ms = calculate_retry_delay(attempt, &self.config.recovery);
                    warn!(
                        operation,
                        attempt,
                        delay_ms,
                        error = %err,
                        "Extraction request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        self.circuit_breaker.record_failure();
                    }
                    warn!(operation, attempt, error = %err, "Extraction request failed");
                    return Err(err);
                }
            }
        }
    }

    async fn post_url(&self, endpoint: &str, url: &str) -> Result<ExtractionOutcome, ExtractionError> {
        let response = self
            .client
            .post(endpoint)
            .query(&[("url", url)])
            .send()
            .await?;
        read_response(response).await
    }

    async fn post_image(
        &self,
        endpoint: &str,
        bytes: Vec<u8>,
        file_name: String,
    ) -> Result<ExtractionOutcome, ExtractionError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self.client.post(endpoint).multipart(form).send().await?;
        read_response(response).await
    }
}

#[async_trait]
impl IngredientSource for HttpExtractionClient {
    async fn from_url(&self, url: &str) -> Result<ExtractionOutcome, ExtractionError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExtractionError::Validation("URL is empty".to_string()));
        }

        let endpoint = self.config.endpoint("parse-url");
        info!(url, "Requesting ingredients from URL");
        self.execute("parse-url", || self.post_url(&endpoint, url))
            .await
    }

    async fn from_image(&self, path: &Path) -> Result<ExtractionOutcome, ExtractionError> {
        let format = validate_image(path, &self.config.image_limits)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ExtractionError::Validation(format!("Could not read image: {e}")))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let endpoint = self.config.endpoint("parse-image");
        info!(
            path = %path.display(),
            format = ?format,
            size = bytes.len(),
            "Uploading image for extraction"
        );
        self.execute("parse-image", || {
            self.post_image(&endpoint, bytes.clone(), file_name.clone())
        })
        .await
    }
}

async fn read_response(response: reqwest::Response) -> Result<ExtractionOutcome, ExtractionError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    outcome_from_body(status, &body)
}

/// Calculate the retry delay for an attempt
///
/// Exponential backoff from `base_retry_delay_ms` with up to 10% random
/// jitter, capped at `max_retry_delay_ms`.
pub fn calculate_retry_delay(attempt: u32, recovery: &RecoveryConfig) -> u64 {
    let exponent = attempt.saturating_sub(1).min(16);
    let backoff = recovery
        .base_retry_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(recovery.max_retry_delay_ms);
    let jitter = rand::thread_rng().gen_range(0..=backoff / 10);
    (backoff + jitter).min(recovery.max_retry_delay_ms)
}

/// Validate an image before upload and return its detected format
pub fn validate_image(path: &Path, limits: &ImageLimits) -> Result<image::ImageFormat, ExtractionError> {
    let metadata = std::fs::metadata(path).map_err(|_| {
        ExtractionError::Validation(format!("Image file does not exist: {}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(ExtractionError::Validation(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    let size = metadata.len();
    if size == 0 {
        return Err(ExtractionError::Validation("Image file is empty".to_string()));
    }

    if size > limits.max_file_size {
        return Err(ExtractionError::Validation(format!(
            "Image file too large: {} bytes (max {} bytes)",
            size, limits.max_file_size
        )));
    }

    let file = File::open(path)
        .map_err(|e| ExtractionError::Validation(format!("Could not open image: {e}")))?;
    let mut reader = BufReader::new(file);
    let mut buffer = vec![0; limits.buffer_size];
    let bytes_read = reader
        .read(&mut buffer)
        .map_err(|e| ExtractionError::Validation(format!("Could not read image: {e}")))?;
    buffer.truncate(bytes_read);

    if bytes_read < limits.min_format_bytes {
        return Err(ExtractionError::Validation(format!(
            "Image file too small to detect format ({bytes_read} bytes)"
        )));
    }

    let format = image::guess_format(&buffer)
        .map_err(|e| ExtractionError::Validation(format!("Unknown image format: {e}")))?;

    if is_supported_format(format) {
        debug!(format = ?format, path = %path.display(), "Detected supported image format");
        Ok(format)
    } else {
        Err(ExtractionError::Validation(format!(
            "Unsupported image format: {format:?}"
        )))
    }
}

/// Formats accepted by the OCR endpoint
pub fn is_supported_format(format: image::ImageFormat) -> bool {
    matches!(
        format,
        image::ImageFormat::Png
            | image::ImageFormat::Jpeg
            | image::ImageFormat::Bmp
            | image::ImageFormat::Tiff
            | image::ImageFormat::WebP
    )
}

/// Validate if an image file is supported for upload
pub fn is_supported_image_format(path: &Path, limits: &ImageLimits) -> bool {
    validate_image(path, limits).is_ok()
}
