use async_trait::async_trait;
use tokio::time::{timeout, Duration};

use crate::config::AppConfig;

use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::{GeneratedImage, ImageModel, ModelError, TextModel};

pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_ms: u64,
}

impl From<&AppConfig> for GeminiConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            base_url: cfg.gemini_base_url.clone(),
            api_key: cfg.gemini_api_key.clone(),
            text_model: cfg.text_model.clone(),
            image_model: cfg.image_model.clone(),
            timeout_ms: cfg.timeout_ms,
        }
    }
}

/// Client for the Generative Language REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    cfg: GeminiConfig,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.cfg.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let exchange = async {
            let response = self
                .http
                .post(self.endpoint(model))
                .header("x-goog-api-key", &self.cfg.api_key)
                .json(request)
                .send()
                .await
                .map_err(|source| ModelError::Transport {
                    model: model.to_string(),
                    source,
                })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|source| ModelError::Transport {
                    model: model.to_string(),
                    source,
                })?;

            if !status.is_success() {
                return Err(ModelError::Status {
                    model: model.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: GenerateContentResponse =
                serde_json::from_str(&body).map_err(|source| ModelError::Decode {
                    model: model.to_string(),
                    source,
                })?;
            Ok::<_, ModelError>(parsed)
        };

        timeout(Duration::from_millis(self.cfg.timeout_ms), exchange)
            .await
            .map_err(|_| ModelError::Timeout {
                model: model.to_string(),
            })?
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, ModelError> {
        let request = GenerateContentRequest::text(prompt);
        let response = self.generate_content(&self.cfg.text_model, &request).await?;
        Ok(response.text())
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, ModelError> {
        let request = GenerateContentRequest::image(prompt);
        let response = self.generate_content(&self.cfg.image_model, &request).await?;
        Ok(response.first_image())
    }
}
