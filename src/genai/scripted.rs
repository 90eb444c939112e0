use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{GeneratedImage, ImageModel, ModelError, TextModel};

/// A prompt received by [`ScriptedModel`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelCall {
    Text(String),
    Image(String),
}

/// Canned text and image model for tests. Replays fixed replies and records
/// every prompt it is given.
pub struct ScriptedModel {
    text: Result<String, String>,
    image: Result<Option<GeneratedImage>, String>,
    calls: Mutex<Vec<ModelCall>>,
}

impl ScriptedModel {
    pub fn new(text_reply: impl Into<String>) -> Self {
        Self {
            text: Ok(text_reply.into()),
            image: Ok(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_image(mut self, mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        self.image = Ok(Some(GeneratedImage {
            mime_type: mime_type.into(),
            data: base64.into(),
        }));
        self
    }

    pub fn failing_text(mut self, message: impl Into<String>) -> Self {
        self.text = Err(message.into());
        self
    }

    pub fn failing_image(mut self, message: impl Into<String>) -> Self {
        self.image = Err(message.into());
        self
    }

    pub fn calls(&self) -> Vec<ModelCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: ModelCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

fn scripted_failure(model: &str, message: &str) -> ModelError {
    ModelError::Status {
        model: model.to_string(),
        status: 503,
        body: message.to_string(),
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn generate_text(&self, prompt: &str) -> Result<String, ModelError> {
        self.record(ModelCall::Text(prompt.to_string()));
        self.text
            .clone()
            .map_err(|message| scripted_failure("scripted-text", &message))
    }
}

#[async_trait]
impl ImageModel for ScriptedModel {
    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, ModelError> {
        self.record(ModelCall::Image(prompt.to_string()));
        self.image
            .clone()
            .map_err(|message| scripted_failure("scripted-image", &message))
    }
}
