pub mod config;
pub mod generation;
pub mod health;
pub mod legacy;
pub mod parsing;
pub mod styles;
pub mod validation;

use std::time::{Duration, Instant};

use axum::{
    Json, Router,
    extract::{FromRequest, Request},
    http::{HeaderValue, Response, StatusCode},
    middleware::{self, Next},
    routing::{get, post},
};
use chrono::Local;
use opentelemetry::KeyValue;
use serde::Serialize;
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::AppState;
use crate::error::AppError;
use crate::telemetry::{HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL};

/// `Json` body extractor whose rejections use the `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Envelope shared by the `/api/v1` endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = Value> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: Local::now().to_rfc3339(),
        })
    }
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
            timestamp: Local::now().to_rfc3339(),
        })
    }
}

#[derive(Clone)]
struct HttpMakeSpan;

impl<B> MakeSpan<B> for HttpMakeSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let method = request.method().as_str();
        let path = request.uri().path();

        tracing::info_span!(
            "HTTP request",
            otel.name = %format!("{} {}", method, path),
            http.method = %method,
            http.route = %path,
            http.target = %request.uri(),
            http.scheme = "http",
            http.flavor = ?request.version(),
            http.user_agent = request.headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.request_id = request.headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or(""),
            http.response.status_code = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
        )
    }
}

#[derive(Clone)]
struct HttpOnResponse;

impl<B> OnResponse<B> for HttpOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();

        span.record("http.response.status_code", status as i64);

        if status >= 500 {
            span.record("otel.status_code", "ERROR");
        } else {
            span.record("otel.status_code", "OK");
        }

        let latency_ms = latency.as_secs_f64() * 1000.0;
        let attrs = [
            KeyValue::new("http.status_code", status.to_string()),
            KeyValue::new("http.status_class", format!("{}xx", status / 100)),
        ];

        HTTP_REQUESTS_TOTAL.add(1, &attrs);
        HTTP_REQUEST_DURATION.record(latency_ms, &attrs);

        tracing::info!(
            http.response.status_code = status,
            latency_ms = latency_ms,
            "finished processing request"
        );
    }
}

/// Adds `X-Process-Time` (seconds) to every response.
async fn process_time(request: Request, next: Next) -> axum::response::Response {
    let start = Instant::now();
    let mut response = next.run(request).await;

    let elapsed = format!("{:.6}", start.elapsed().as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        response.headers_mut().insert("x-process-time", value);
    }
    response
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/status", get(health::status))
        .route("/generate", post(generation::generate))
        .route("/generate/data", post(generation::generate_data))
        .route("/parse", post(parsing::parse))
        .route("/validate", post(validation::validate))
        .route("/validate/batch", post(validation::validate_batch))
        .route("/styles", get(styles::list_styles).post(styles::create_style))
        .route(
            "/styles/{name}",
            get(styles::get_style).delete(styles::delete_style),
        )
        .route("/config", get(config::get_config).post(config::update_config))
        .route("/current-config", get(legacy::current_config))
        .route("/update-input", post(legacy::update_input))
        .route("/create-style", post(legacy::create_style))
        .route("/generate-receipt", post(legacy::generate_receipt))
}

pub fn create_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(health::root))
        .route("/ping", get(health::ping));

    if !state.config.is_production() {
        app = app.route("/debug/info", get(health::debug_info));
    }

    app.nest("/api/v1", api_routes())
        .layer(middleware::from_fn(process_time))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(HttpMakeSpan)
                .on_response(HttpOnResponse),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(300),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
