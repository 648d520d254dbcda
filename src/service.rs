use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{AppError, AppResult};
use crate::imaging::client::classify_error;
use crate::imaging::{ImageClient, ImageSettings, render_prompt};
use crate::input_config::InputConfigStore;
use crate::receipt::{
    GenerationOptions, GenerationOverrides, ParsedReceipt, Receipt, ReceiptError,
    ValidationReport, generate_receipt, parse_receipt_text, validate_receipt,
};
use crate::styles::StyleStore;
use crate::telemetry::metrics::{RECEIPTS_GENERATED, RECEIPTS_PARSED, RECEIPTS_VALIDATED};

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageMetadata {
    pub generated_at: String,
    pub style_used: String,
    pub provider: String,
    pub model: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub image_data: String,
    pub prompt: String,
    pub style: String,
    pub metadata: ImageMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub config_loaded: bool,
    pub available_styles: Vec<String>,
    pub config_fields: Vec<String>,
}

pub struct ReceiptService {
    styles: StyleStore,
    input_config: InputConfigStore,
    image_settings: ImageSettings,
    image_client: Option<Arc<ImageClient>>,
    rng: Mutex<fastrand::Rng>,
}

impl ReceiptService {
    pub fn new(
        styles: StyleStore,
        input_config: InputConfigStore,
        image_settings: ImageSettings,
    ) -> Self {
        Self {
            styles,
            input_config,
            image_settings,
            image_client: None,
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Uses a prebuilt image client instead of building one from settings.
    pub fn with_image_client(mut self, client: ImageClient) -> Self {
        self.image_client = Some(Arc::new(client));
        self
    }

    pub fn styles(&self) -> &StyleStore {
        &self.styles
    }

    pub fn input_config(&self) -> &InputConfigStore {
        &self.input_config
    }

    pub fn generate_receipt_data(&self, overrides: Option<Value>) -> AppResult<Receipt> {
        let overrides = GenerationOverrides::from_value(overrides)?;

        let receipt = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| AppError::Internal("receipt generator lock poisoned".into()))?;
            generate_receipt(&overrides, GenerationOptions::default(), &mut rng)?
        };

        RECEIPTS_GENERATED.add(1, &[]);
        tracing::debug!(
            transaction_id = %receipt.transaction_id,
            items = receipt.items.len(),
            "Receipt data generated"
        );
        Ok(receipt)
    }

    fn image_client(&self, image_config: Option<Value>) -> AppResult<Arc<ImageClient>> {
        match image_config {
            Some(config) if !config.is_null() => {
                let settings: ImageSettings = serde_json::from_value(config)
                    .map_err(|e| AppError::Validation(format!("invalid image_config: {e}")))?;
                Ok(Arc::new(settings.build_client()?))
            }
            _ => match &self.image_client {
                Some(client) => Ok(client.clone()),
                None => Ok(Arc::new(self.image_settings.build_client()?)),
            },
        }
    }

    #[tracing::instrument(
        name = "receipt.generate_image",
        skip(self, receipt, image_config),
        fields(receipt.transaction_id = %receipt.transaction_id)
    )]
    pub async fn generate_receipt_image(
        &self,
        receipt: &Receipt,
        style: &str,
        image_config: Option<Value>,
    ) -> AppResult<GeneratedImage> {
        let style_content = self.styles.load(style).await?;
        let prompt = render_prompt(receipt, &style_content);
        let client = self.image_client(image_config)?;

        let image = client
            .generate(&prompt)
            .await
            .map_err(|e| match classify_error(&e) {
                "auth_error" => AppError::AiService(e.to_string()),
                _ => AppError::GenerationFailed {
                    operation: "image_generation".to_string(),
                    details: e.to_string(),
                },
            })?;

        Ok(GeneratedImage {
            image_data: image.data,
            prompt,
            style: style.to_string(),
            metadata: ImageMetadata {
                generated_at: Local::now().to_rfc3339(),
                style_used: style.to_string(),
                provider: client.provider_name().to_string(),
                model: image.model,
                mime_type: image.mime_type,
                revised_prompt: image.revised_prompt,
            },
        })
    }

    pub fn parse_receipt_data(&self, text: &str) -> ParsedReceipt {
        RECEIPTS_PARSED.add(1, &[]);
        parse_receipt_text(text)
    }

    pub fn validate_receipt(&self, data: &Value, strict: bool) -> ValidationReport {
        let report = validate_receipt(data, strict);
        RECEIPTS_VALIDATED.add(
            1,
            &[opentelemetry::KeyValue::new("receipt.valid", report.is_valid)],
        );
        report
    }

    pub async fn get_config(&self) -> AppResult<Map<String, Value>> {
        self.input_config.get().await
    }

    pub async fn update_config(&self, fields: Map<String, Value>) -> AppResult<Map<String, Value>> {
        self.input_config.update(fields).await
    }

    pub async fn create_style(&self, name: &str, content: &Value) -> AppResult<String> {
        let path = self.styles.create(name, content).await?;
        Ok(path.display().to_string())
    }

    pub async fn status(&self) -> AppResult<ServiceStatus> {
        let config = self.get_config().await?;
        Ok(ServiceStatus {
            config_loaded: !config.is_empty(),
            available_styles: self.styles.list().await?,
            config_fields: config.keys().cloned().collect(),
        })
    }

    /// Generation metadata reported when no image was produced.
    pub fn data_only_metadata(style: &str) -> Value {
        json!({
            "generated_at": Local::now().to_rfc3339(),
            "style_used": style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{ImageProvider, ImageRequest, ImageResponse};
    use std::time::Duration;

    struct StubProvider;

    #[async_trait::async_trait]
    impl ImageProvider for StubProvider {
        async fn generate(&self, req: &ImageRequest) -> anyhow::Result<ImageResponse> {
            Ok(ImageResponse {
                data: format!("image-for:{}", req.prompt.len()),
                mime_type: "image/png".to_string(),
                model: req.model.clone(),
                revised_prompt: Some("a receipt on a table".to_string()),
            })
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct RejectingProvider;

    #[async_trait::async_trait]
    impl ImageProvider for RejectingProvider {
        async fn generate(&self, _req: &ImageRequest) -> anyhow::Result<ImageResponse> {
            anyhow::bail!("OpenAI API error (401 Unauthorized): Incorrect API key provided")
        }

        fn name(&self) -> &str {
            "rejecting"
        }
    }

    fn service(dir: &std::path::Path) -> ReceiptService {
        ReceiptService::new(
            StyleStore::new(dir.join("styles")),
            InputConfigStore::new(dir.join("receipt_input.yaml")),
            ImageSettings {
                provider: "openai".into(),
                api_key: None,
                model: None,
                size: "1024x1024".into(),
            },
        )
    }

    #[tokio::test]
    async fn test_image_generation_with_stub_provider() {
        let dir = tempfile::tempdir().unwrap();
        let client = ImageClient::new(Arc::new(StubProvider), "stub-1".into(), "512x512".into())
            .with_base_delay(Duration::from_millis(1));
        let service = service(dir.path()).with_image_client(client);
        service
            .create_style("table_noire", &json!({"description": "black table"}))
            .await
            .unwrap();

        let receipt = service.generate_receipt_data(None).unwrap();
        let image = service
            .generate_receipt_image(&receipt, "table_noire", None)
            .await
            .unwrap();

        assert!(image.image_data.starts_with("image-for:"));
        assert!(image.prompt.contains("black table"));
        assert_eq!(image.metadata.provider, "stub");
        assert_eq!(image.metadata.model, "stub-1");
        assert_eq!(image.metadata.style_used, "table_noire");
        assert_eq!(
            image.metadata.revised_prompt.as_deref(),
            Some("a receipt on a table")
        );
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_ai_service_errors() {
        let dir = tempfile::tempdir().unwrap();
        let client = ImageClient::new(Arc::new(RejectingProvider), "m".into(), "512x512".into())
            .with_base_delay(Duration::from_millis(1));
        let service = service(dir.path()).with_image_client(client);
        service.create_style("plain", &json!({})).await.unwrap();
        let receipt = service.generate_receipt_data(None).unwrap();

        let err = service
            .generate_receipt_image(&receipt, "plain", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AiService(_)));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_body()["error"]["code"], "AI_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_style_fails_before_provider_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let receipt = service.generate_receipt_data(None).unwrap();

        let err = service
            .generate_receipt_image(&receipt, "neon", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StyleNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        service.create_style("plain", &json!({})).await.unwrap();
        let receipt = service.generate_receipt_data(None).unwrap();

        let err = service
            .generate_receipt_image(&receipt, "plain", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_status_reports_styles_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let status = service.status().await.unwrap();
        assert!(!status.config_loaded);
        assert!(status.available_styles.is_empty());

        service.create_style("plain", &json!({})).await.unwrap();
        let mut fields = Map::new();
        fields.insert("default_currency".into(), json!("USD"));
        service.update_config(fields).await.unwrap();

        let status = service.status().await.unwrap();
        assert!(status.config_loaded);
        assert_eq!(status.available_styles, vec!["plain"]);
        assert_eq!(status.config_fields, vec!["default_currency"]);
    }

    #[test]
    fn test_invalid_overrides_are_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = service(dir.path())
            .generate_receipt_data(Some(json!({"total_ttc": "lots"})))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
