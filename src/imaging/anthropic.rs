use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{ImageProvider, ImageRequest, ImageResponse};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const MAX_TOKENS: u32 = 8192;

const SYSTEM_PROMPT: &str = "You draw receipts as SVG. Reply with a single standalone \
    <svg> document and nothing else. Use only inline styles and no external resources.";

/// Renders receipts as SVG documents through the Messages API.
pub struct AnthropicImageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl AnthropicImageProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    model: String,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// Cuts the `<svg>...</svg>` document out of a model reply.
pub fn extract_svg(text: &str) -> Option<&str> {
    let start = text.find("<svg")?;
    let end = text.rfind("</svg>")? + "</svg>".len();
    (start < end).then(|| &text[start..end])
}

#[async_trait::async_trait]
impl ImageProvider for AnthropicImageProvider {
    async fn generate(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = AnthropicRequest {
            model: req.model.clone(),
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: format!("Canvas size: {}.\n\n{}", req.size, req.prompt),
            }],
        };

        let response = self
            .client
            .post(MESSAGES_URL)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<AnthropicError>(&error_body) {
                return Err(anyhow::anyhow!(
                    "Anthropic API error ({}): {}",
                    status,
                    err.error.message
                ));
            }
            return Err(anyhow::anyhow!(
                "Anthropic API error ({}): {}",
                status,
                error_body
            ));
        }

        let resp: AnthropicResponse = response.json().await?;

        let text = resp
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        let svg = extract_svg(&text)
            .ok_or_else(|| anyhow::anyhow!("Anthropic response did not contain SVG markup"))?;

        Ok(ImageResponse {
            data: svg.to_string(),
            mime_type: "image/svg+xml".to_string(),
            model: resp.model,
            revised_prompt: None,
        })
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
