//! Receipt image generation through external AI providers.

pub mod anthropic;
pub mod client;
pub mod openai;
pub mod prompt;

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub use client::ImageClient;
pub use prompt::render_prompt;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-image-1";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
}

#[derive(Debug, Clone)]
pub struct ImageResponse {
    /// Base64 PNG for raster providers, markup for SVG providers.
    pub data: String,
    pub mime_type: String,
    pub model: String,
    pub revised_prompt: Option<String>,
}

#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse>;
    fn name(&self) -> &str;
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_size() -> String {
    "1024x1024".to_string()
}

/// Provider selection, either from the service configuration or from a
/// request's `image_config` object.
#[derive(Clone, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_size")]
    pub size: String,
}

impl fmt::Debug for ImageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("size", &self.size)
            .finish()
    }
}

impl ImageSettings {
    pub fn build_client(&self) -> AppResult<ImageClient> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Configuration("No API key configured for image generation".into())
            })?;

        let (provider, default_model): (Arc<dyn ImageProvider>, &str) =
            match self.provider.as_str() {
                "openai" => (
                    Arc::new(openai::OpenAiImageProvider::new(api_key)),
                    DEFAULT_OPENAI_MODEL,
                ),
                "anthropic" => (
                    Arc::new(anthropic::AnthropicImageProvider::new(api_key)),
                    DEFAULT_ANTHROPIC_MODEL,
                ),
                other => {
                    return Err(AppError::Configuration(format!(
                        "Unsupported provider: {other}"
                    )));
                }
            };

        let model = self
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string());

        Ok(ImageClient::new(provider, model, self.size.clone()))
    }
}
