use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{ImageProvider, ImageRequest, ImageResponse};

const IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

pub struct OpenAiImageProvider {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiImageProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u32,
    // gpt-image models always answer in base64 and reject this field
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'static str>,
}

#[derive(Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| anyhow::anyhow!("invalid API key header: {e}"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = ImagesRequest {
            model: &req.model,
            prompt: &req.prompt,
            size: &req.size,
            n: 1,
            response_format: req.model.starts_with("dall-e").then_some("b64_json"),
        };

        let response = self
            .client
            .post(IMAGES_URL)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<OpenAiError>(&error_body) {
                return Err(anyhow::anyhow!(
                    "OpenAI API error ({}): {}",
                    status,
                    err.error.message
                ));
            }
            return Err(anyhow::anyhow!("OpenAI API error ({}): {}", status, error_body));
        }

        let resp: ImagesResponse = response.json().await?;
        let image = resp
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("OpenAI returned no image"))?;
        let data = image
            .b64_json
            .ok_or_else(|| anyhow::anyhow!("OpenAI image is missing b64_json data"))?;

        Ok(ImageResponse {
            data,
            mime_type: "image/png".to_string(),
            model: req.model.clone(),
            revised_prompt: image.revised_prompt,
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
