//! Prediction backend library for moodcap.
//!
//! This crate provides a trait-based abstraction over the emotion
//! predictor, with an HTTP implementation speaking the multipart upload
//! contract.

mod http;

use async_trait::async_trait;
pub use http::HttpPredictor;
use moodcap_core::{Label, SourceLocator, UnknownLabel};
use thiserror::Error;

/// Errors that can occur during prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("predictor returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not read audio source: {0}")]
    Source(#[from] std::io::Error),

    #[error("malformed predictor response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabel),
}

/// Result type for prediction operations.
pub type Result<T> = std::result::Result<T, PredictError>;

/// Trait for prediction backends.
///
/// Implement this trait to add new backends (another transport, a local
/// model, a scripted predictor in tests).
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Upload one audio resource and return its classification.
    async fn predict(&self, source: SourceLocator) -> Result<Label>;

    /// Returns the name of this predictor for logging/debugging.
    fn name(&self) -> &str;
}
