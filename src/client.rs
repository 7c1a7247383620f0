//! HTTP client for the proxy endpoint.
//!
//! One POST per analysis. No retries, timeout or cancellation; a stale
//! response is discarded by the presentation layer instead.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::encoder::{self, EncodeError, UploadedImage};
use crate::messages::Locale;
use crate::mode::AnalysisMode;
use crate::result::{AnalysisResult, ResultError};
use crate::server::{ErrorBody, PROXY_PATH};

/// Every client-side failure, already carrying its user-facing message.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Encode {
        message: String,
        #[source]
        source: EncodeError,
    },

    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{message}")]
    Server { message: String, status: u16 },

    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: ResultError,
    },
}

impl ClientError {
    pub fn message(&self) -> &str {
        match self {
            ClientError::Encode { message, .. }
            | ClientError::Transport { message, .. }
            | ClientError::Server { message, .. }
            | ClientError::Decode { message, .. } => message,
        }
    }
}

/// Anything that can turn an image into a result for a mode.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        image: &UploadedImage,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult, ClientError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    image: &'a str,
    mime_type: &'a str,
    feature: AnalysisMode,
}

pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: String,
    locale: Locale,
}

impl AnalysisClient {
    /// `server` is the proxy's origin, e.g. `http://localhost:3000`.
    pub fn new(server: &str, locale: Locale) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}{}", server.trim().trim_end_matches('/'), PROXY_PATH),
            locale,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Reads a photo through the picker's MIME filter.
    pub async fn load_image(&self, path: impl AsRef<Path>) -> Result<UploadedImage, ClientError> {
        encoder::load_picked(path).await.map_err(|source| ClientError::Encode {
            message: self.locale.analysis_failed(&source.to_string()),
            source,
        })
    }

    async fn post(
        &self,
        image: &UploadedImage,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult, ClientError> {
        let request = AnalysisRequest {
            image: image.base64(),
            mime_type: image.mime_type(),
            feature: mode,
        };
        debug!(endpoint = %self.endpoint, %mode, "posting analysis request");

        let transport = |source: reqwest::Error| {
            // Connection-level failures carry no useful text for the user.
            let cause = if source.is_connect() || source.is_timeout() {
                self.locale.unknown_error().to_string()
            } else {
                source.to_string()
            };
            ClientError::Transport {
                message: self.locale.analysis_failed(&cause),
                source,
            }
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let cause = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|parsed| parsed.error)
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| {
                    self.locale
                        .http_status_fallback(status.canonical_reason().unwrap_or(status.as_str()))
                });
            warn!(status = status.as_u16(), %mode, "proxy returned an error");
            return Err(ClientError::Server {
                message: self.locale.analysis_failed(&cause),
                status: status.as_u16(),
            });
        }

        AnalysisResult::from_response(mode, &body).map_err(|source| ClientError::Decode {
            message: self.locale.analysis_failed(&source.to_string()),
            source,
        })
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(
        &self,
        image: &UploadedImage,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult, ClientError> {
        self.post(image, mode).await
    }
}
