//! HTTP API for coupon searches.
//!
//! Routes are served both at the root and under `/api`:
//!
//! - `GET  /health`
//! - `POST /coupons/search`           `{itemName, preferences?}`
//! - `POST /coupons/search/multiple`  `{items, preferences?}`

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use coupon_search::{Preferences, SearchError, SearchService};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::error::Result;

#[derive(Clone)]
struct AppState {
    service: Arc<SearchService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    #[serde(default)]
    item_name: Option<String>,
    #[serde(default)]
    preferences: Option<Preferences>,
}

#[derive(Debug, Deserialize)]
struct BatchRequest {
    #[serde(default)]
    items: Option<Vec<String>>,
    #[serde(default)]
    preferences: Option<Preferences>,
}

/// Success envelope: `{success: true, ...body, timestamp}`.
#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
    timestamp: String,
}

impl<T: Serialize> Envelope<T> {
    fn ok(body: T) -> Response {
        let envelope = Self {
            success: true,
            body,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        (StatusCode::OK, Json(envelope)).into_response()
    }
}

/// `{error, message}` with a status code.
struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
            message: message.into(),
        }
    }

    /// Map a service error: validation is the caller's fault, anything else is ours.
    fn from_search(error: &'static str, err: SearchError) -> Self {
        match err {
            SearchError::Validation(message) => Self::bad_request(error, message),
            other => {
                tracing::error!(error = %other, "coupon search failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: "Failed to search coupons",
                    message: other.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "error": self.error,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

/// Build the router over `service`.
///
/// CORS allows any origin: the API is consumed by a browser UI served from
/// a different port.
pub fn router(service: Arc<SearchService>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    let routes = Router::new()
        .route("/health", get(health))
        .route("/coupons/search", post(search_item))
        .route("/coupons/search/multiple", post(search_multiple));

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .with_state(AppState { service })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve the API on an already-bound listener until ctrl-c.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve(listener: TcpListener, service: Arc<SearchService>) -> Result<()> {
    let local_addr = listener.local_addr()?;
    tracing::info!("coupon API listening on http://{local_addr}");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the search service from `config`, bind, and serve.
///
/// # Errors
///
/// Returns an error if the search settings are invalid or the address
/// cannot be bound.
pub async fn run_server(config: ServiceConfig) -> Result<()> {
    let service = Arc::new(SearchService::new(config.search.clone())?);
    tracing::info!(
        sources = ?service.aggregator().source_names(),
        "search service ready"
    );
    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve(listener, service).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Coupon API server is running",
    }))
}

async fn search_item(
    State(state): State<AppState>,
    body: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    const REQUIRED: &str = "Item name is required";

    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return ApiError::bad_request(REQUIRED, rejection.body_text()).into_response();
        }
    };
    let item_name = request.item_name.unwrap_or_default();
    let preferences = request.preferences.unwrap_or_default();

    match state.service.search_item(&item_name, &preferences).await {
        Ok(found) => Envelope::ok(found),
        Err(err) => ApiError::from_search(REQUIRED, err).into_response(),
    }
}

async fn search_multiple(
    State(state): State<AppState>,
    body: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    const REQUIRED: &str = "Items array is required";

    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return ApiError::bad_request(REQUIRED, rejection.body_text()).into_response();
        }
    };
    let items = request.items.unwrap_or_default();
    let preferences = request.preferences.unwrap_or_default();

    match state.service.search_batch(&items, &preferences).await {
        Ok(batch) => Envelope::ok(batch),
        Err(err) => ApiError::from_search(REQUIRED, err).into_response(),
    }
}
