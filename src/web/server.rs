use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::classifier::Classifier;
use crate::cli::ServeArgs;
use crate::config::Settings;
use crate::core::result::MatchResult;
use crate::duty::DutyEstimate;
use crate::utils::validation::{
    validate_description, validate_invoice_value, MAX_DESCRIPTION_LENGTH,
};

/// Request bodies are small JSON documents; anything larger is rejected early
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared application state
pub struct AppState {
    pub classifier: Classifier<'static>,
}

/// Enhanced error response
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

#[derive(Deserialize)]
pub struct ClassifyRequest {
    pub description: String,
    #[serde(default)]
    pub invoice_value: Option<f64>,
}

#[derive(Serialize)]
pub struct ClassifyResponse {
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<DutyEstimate>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, message, None)),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the catalog cannot be
/// loaded, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes and security layers, without per-IP rate limiting.
///
/// Rate limiting keys on the peer address, which only exists when the router
/// is served with connect info; [`create_router`] adds it for the real server.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/classify", post(classify_handler))
        .route("/api/catalog", get(catalog_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("strict-transport-security"),
                    HeaderValue::from_static("max-age=31536000; includeSubDomains"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(100))
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    }))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let settings = Settings::from_args(&args.classifier)?;
    let classifier = settings.build_classifier()?;
    info!(
        "Serving {} catalog entries{}",
        classifier.engine().catalog().len(),
        if classifier.has_remote() { " with remote classification" } else { "" }
    );

    let app = create_router(Arc::new(AppState { classifier }))?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting hs-classifier web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

/// API endpoint for classifying a description
async fn classify_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClassifyRequest>,
) -> Response {
    if let Err(e) = validate_description(&request.description) {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "description_too_long",
            &format!("{e}"),
        );
    }

    let invoice_value = match request.invoice_value.map(validate_invoice_value).transpose() {
        Ok(value) => value,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "invalid_invoice_value", &format!("{e}"));
        }
    };

    let result = state.classifier.classify(&request.description).await;

    let estimate = match (result.as_match(), invoice_value) {
        (Some(matched), Some(value)) => match state.classifier.estimate_duty(matched, value) {
            Ok(estimate) => Some(estimate),
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "invalid_invoice_value",
                    &format!("{e}"),
                );
            }
        },
        _ => None,
    };

    Json(ClassifyResponse { result, estimate }).into_response()
}

/// API endpoint listing the catalog
async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let catalog = state.classifier.engine().catalog();
    let entries: Vec<serde_json::Value> = catalog
        .entries()
        .iter()
        .map(|e| {
            serde_json::json!({
                "hs_code": e.classification_code,
                "product": e.display_name(),
                "description": e.display_description(),
                "tariff_percent": e.duty_percent,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": entries.len(),
        "reference_field": catalog.reference_field(),
        "max_description_length": MAX_DESCRIPTION_LENGTH,
        "entries": entries,
    }))
}
