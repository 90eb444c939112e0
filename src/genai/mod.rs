//! Generative model seams: one trait per kind of output, plus the Gemini
//! implementation used in production and a scripted one for tests.

mod gemini;
mod scripted;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiClient, GeminiConfig};
pub use scripted::{ModelCall, ScriptedModel};

/// Default MIME type for image parts that do not declare one.
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

/// Base64 image bytes with their declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to model {model} timed out")]
    Timeout { model: String },
    #[error("failed to send request to model {model}: {source}")]
    Transport {
        model: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("model {model} request failed ({status}): {body}")]
    Status {
        model: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from model {model}: {source}")]
    Decode {
        model: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Text generation from a prompt.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Returns the generated text, or an empty string if the model produced none.
    async fn generate_text(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Image generation from a prompt.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Returns the generated image, or `None` if the model produced no image.
    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, ModelError>;
}
