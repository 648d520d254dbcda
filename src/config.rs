use std::env;
use std::path::PathBuf;

use crate::imaging::ImageSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub styles_dir: PathBuf,
    pub receipt_input_path: PathBuf,
    pub default_style: String,
    pub image_provider: String,
    pub image_model: Option<String>,
    pub image_size: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("PORT must be a number"),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            styles_dir: env::var("STYLES_DIR")
                .unwrap_or_else(|_| "styles".to_string())
                .into(),
            receipt_input_path: env::var("RECEIPT_INPUT_PATH")
                .unwrap_or_else(|_| "config/receipt_input.yaml".to_string())
                .into(),
            default_style: env::var("DEFAULT_STYLE")
                .unwrap_or_else(|_| "table_noire".to_string()),
            image_provider: env::var("IMAGE_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
            image_model: env::var("IMAGE_MODEL").ok(),
            image_size: env::var("IMAGE_SIZE").unwrap_or_else(|_| "1024x1024".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "receipt-toolkit".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Image settings used when a request does not bring its own.
    pub fn image_settings(&self) -> ImageSettings {
        let api_key = match self.image_provider.as_str() {
            "anthropic" => self.anthropic_api_key.clone(),
            _ => self.openai_api_key.clone(),
        };

        ImageSettings {
            provider: self.image_provider.clone(),
            api_key,
            model: self.image_model.clone(),
            size: self.image_size.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            environment: "development".to_string(),
            styles_dir: PathBuf::from("styles"),
            receipt_input_path: PathBuf::from("config/receipt_input.yaml"),
            default_style: "table_noire".to_string(),
            image_provider: "openai".to_string(),
            image_model: None,
            image_size: "1024x1024".to_string(),
            openai_api_key: None,
            anthropic_api_key: None,
            otel_service_name: "receipt-toolkit".to_string(),
            otel_exporter_endpoint: "http://localhost:4317".to_string(),
        }
    }
}
