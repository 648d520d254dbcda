use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use opentelemetry::trace::TraceContextExt;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidStyle,
    InvalidRequest,
    InvalidConfiguration,
    StyleNotFound,
    GenerationFailed,
    AiServiceError,
    InternalError,
}

/// How a client is expected to recover from an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryStrategy {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: String,
    pub auto_retry: bool,
    pub max_retries: u32,
    pub fallback_action: Option<String>,
}

impl RecoveryStrategy {
    fn manual(description: impl Into<String>) -> Self {
        Self {
            kind: "manual",
            description: description.into(),
            auto_retry: false,
            max_retries: 0,
            fallback_action: None,
        }
    }

    fn retry(description: impl Into<String>, auto_retry: bool, max_retries: u32) -> Self {
        Self {
            kind: "retry",
            description: description.into(),
            auto_retry,
            max_retries,
            fallback_action: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Style '{style}' not found")]
    StyleNotFound {
        style: String,
        available: Vec<String>,
    },

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Generation failed during {operation}: {details}")]
    GenerationFailed { operation: String, details: String },

    #[error("AI service error: {0}")]
    AiService(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidStyle(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::StyleNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AiService(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_)
            | AppError::GenerationFailed { .. }
            | AppError::Io(_)
            | AppError::Yaml(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::InvalidRequest,
            AppError::NotFound(_) | AppError::StyleNotFound { .. } => ErrorCode::StyleNotFound,
            AppError::InvalidStyle(_) => ErrorCode::InvalidStyle,
            AppError::Configuration(_) | AppError::Yaml(_) => ErrorCode::InvalidConfiguration,
            AppError::GenerationFailed { .. } => ErrorCode::GenerationFailed,
            AppError::AiService(_) => ErrorCode::AiServiceError,
            AppError::Io(_) | AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            AppError::StyleNotFound { .. } | AppError::NotFound(_) => "style_lookup",
            AppError::InvalidStyle(_) => "style_management",
            AppError::GenerationFailed { operation, .. } => operation,
            AppError::AiService(_) => "image_generation",
            AppError::Configuration(_) | AppError::Yaml(_) => "configuration",
            AppError::Validation(_) => "request_validation",
            AppError::Io(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn recovery(&self) -> RecoveryStrategy {
        match self {
            AppError::StyleNotFound { available, .. } => RecoveryStrategy::manual(format!(
                "Use one of the available styles: {}",
                available.join(", ")
            )),
            AppError::GenerationFailed { .. } => RecoveryStrategy::retry(
                "Retry the generation or contact support if the issue persists",
                true,
                2,
            ),
            AppError::AiService(_) => {
                RecoveryStrategy::manual("Check the image provider credentials")
            }
            AppError::Configuration(_) | AppError::Yaml(_) => {
                RecoveryStrategy::manual("Check the service configuration")
            }
            AppError::Io(_) | AppError::Internal(_) => {
                RecoveryStrategy::retry("Please try again", false, 0)
            }
            AppError::Validation(_) | AppError::NotFound(_) | AppError::InvalidStyle(_) => {
                RecoveryStrategy::manual("Correct the request and try again")
            }
        }
    }

    /// Message safe to show to API clients.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::InvalidStyle(msg) => {
                msg.clone()
            }
            AppError::StyleNotFound { style, .. } => {
                format!("The requested style '{style}' is not available.")
            }
            AppError::GenerationFailed { .. } => {
                "Failed to generate receipt. Please try again.".to_string()
            }
            AppError::AiService(_) => "The image provider rejected the request.".to_string(),
            AppError::Configuration(_) | AppError::Yaml(_) => {
                "The service is not configured for this operation.".to_string()
            }
            AppError::Io(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn technical_details(&self) -> Option<String> {
        match self {
            AppError::GenerationFailed { details, .. } => Some(details.clone()),
            AppError::AiService(msg) | AppError::Configuration(msg) => Some(msg.clone()),
            _ => None,
        }
    }

    fn metadata(&self) -> Value {
        match self {
            AppError::StyleNotFound { style, available } => json!({
                "requested_style": style,
                "available_styles": available,
            }),
            _ => json!({}),
        }
    }

    pub fn to_body(&self) -> Value {
        let status = self.status();
        json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": self.user_message(),
                "status_code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "operation": self.operation(),
                "recovery": self.recovery(),
                "technical_details": self.technical_details(),
                "metadata": self.metadata(),
            }
        })
    }
}

fn get_trace_id() -> Option<String> {
    let span = Span::current();
    let context = span.context();
    let span_ref = context.span();
    let span_context = span_ref.span_context();

    if span_context.is_valid() {
        Some(span_context.trace_id().to_string())
    } else {
        None
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, code = ?self.code(), "Request failed");
        } else {
            tracing::warn!(error = %self, code = ?self.code(), "Request rejected");
        }

        let mut body = self.to_body();
        if let Some(trace_id) = get_trace_id() {
            body["trace_id"] = Value::String(trace_id);
        }

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
