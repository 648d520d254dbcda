use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::Instrument;

use super::{ImageProvider, ImageRequest, ImageResponse};
use crate::telemetry::metrics::{IMAGE_ERROR_COUNT, IMAGE_OPERATION_DURATION, IMAGE_RETRY_COUNT};

const MAX_RETRIES: u32 = 3;

pub struct ImageClient {
    provider: Arc<dyn ImageProvider>,
    model: String,
    size: String,
    base_delay: Duration,
}

impl fmt::Debug for ImageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl ImageClient {
    pub fn new(provider: Arc<dyn ImageProvider>, model: String, size: String) -> Self {
        Self {
            provider,
            model,
            size,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Overrides the first backoff step; later steps double it.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn generate_once(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse> {
        let provider_name = self.provider.name().to_string();
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.image",
            otel.name = %format!("gen_ai.image {}", req.model),
            gen_ai.operation.name = "image_generation",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            image.size = %req.size,
            image.mime_type = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        let result = self.provider.generate(req).instrument(span.clone()).await;
        let duration = start.elapsed().as_secs_f64();

        let attrs = [
            KeyValue::new("gen_ai.operation.name", "image_generation"),
            KeyValue::new("gen_ai.provider.name", provider_name),
            KeyValue::new("gen_ai.request.model", req.model.clone()),
        ];

        match result {
            Ok(resp) => {
                span.record("image.mime_type", resp.mime_type.as_str());
                IMAGE_OPERATION_DURATION.record(duration, &attrs);
                Ok(resp)
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("error.type", classify_error(&err));
                IMAGE_ERROR_COUNT.add(1, &attrs);
                Err(err)
            }
        }
    }

    /// Generates one image, retrying with exponential backoff and jitter.
    pub async fn generate(&self, prompt: &str) -> anyhow::Result<ImageResponse> {
        let req = ImageRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            size: self.size.clone(),
        };
        let mut last_err = None;

        for attempt in 0..MAX_RETRIES {
            match self.generate_once(&req).await {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        provider = self.provider.name(),
                        model = %req.model,
                        error = %err,
                        "Image generation failed"
                    );

                    let retryable = classify_error(&err) != "auth_error";
                    last_err = Some(err);

                    if !retryable {
                        break;
                    }

                    if attempt < MAX_RETRIES - 1 {
                        IMAGE_RETRY_COUNT.add(
                            1,
                            &[KeyValue::new(
                                "gen_ai.provider.name",
                                self.provider.name().to_string(),
                            )],
                        );

                        let base = self.base_delay * 2u32.pow(attempt);
                        let base = base.min(Duration::from_secs(10));
                        let jitter_ms = fastrand::u64(0..=base.as_millis() as u64 / 4);
                        tokio::time::sleep(base + Duration::from_millis(jitter_ms)).await;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("all retries exhausted")))
    }
}

pub fn classify_error(err: &anyhow::Error) -> &'static str {
    let msg = err.to_string().to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") {
        "rate_limit"
    } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline") {
        "timeout"
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
    {
        "auth_error"
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        "invalid_request"
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("server")
    {
        "server_error"
    } else if msg.contains("connect")
        || msg.contains("dns")
        || msg.contains("network")
        || msg.contains("reset")
    {
        "network_error"
    } else {
        "unknown_error"
    }
}
