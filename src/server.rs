use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::messages::Locale;
use crate::offline_cache::CacheManifest;
use crate::proxy::{ProxyError, ProxyRequest, ProxyService};

pub const PROXY_PATH: &str = "/api/proxy-gemini-api";

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub struct AppState {
    proxy: ProxyService,
    page: String,
    service_worker: String,
}

impl AppState {
    pub fn new(proxy: ProxyService, manifest: &CacheManifest) -> Result<Self, serde_json::Error> {
        Ok(Self {
            page: index_page(proxy.locale())?,
            service_worker: manifest.service_worker_script(),
            proxy,
        })
    }
}

/// The embedded page with the locale's strings filled in.
pub fn index_page(locale: Locale) -> Result<String, serde_json::Error> {
    // Keep "</" out of the inline script.
    let text = serde_json::to_string(&locale.page_text())?.replace("</", "<\\/");
    Ok(INDEX_HTML
        .replace("__LANG__", &locale.to_string())
        .replace("__PAGE_TEXT__", &text))
}

/// JSON error body shared by the proxy and its client.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/sw.js", get(service_worker))
        .route("/health", get(health))
        .route(
            PROXY_PATH,
            post(analyze)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let locale = state.proxy.locale();
    let request = body
        .map_err(|rejection| ProxyError::BadRequest(rejection.body_text()))
        .and_then(|body| ProxyRequest::decode(&body));
    let outcome = match request {
        Ok(request) => state.proxy.handle(&request).await,
        Err(err) => Err(err),
    };

    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            match &err {
                ProxyError::NoFace => info!("rejected image without a face"),
                other => error!(error = %other, "analysis failed"),
            }
            let body = ErrorBody {
                error: err.user_message(locale),
            };
            (err.status_code(), Json(body)).into_response()
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed(State(state): State<Arc<AppState>>) -> Response {
    let body = ErrorBody {
        error: state.proxy.locale().method_not_allowed().to_string(),
    };
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}

async fn service_worker(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        state.service_worker.clone(),
    )
        .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}
