//! Server-side orchestration: face check, mode dispatch, schema validation.
//!
//! Every step is one awaited round trip to the model, run strictly in order.
//! The face probe always runs first so an unusable photo never costs a full
//! analysis call.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::gemini::{GenerateRequest, GenerationConfig, GenerativeModel, InlineImage, ModelError};
use crate::messages::Locale;
use crate::mode::AnalysisMode;
use crate::prompts;
use crate::result::{self, AnalysisResult, ResultError};

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("no face detected in the image")]
    NoFace,

    #[error("unknown analysis feature")]
    InvalidFeature,

    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Schema(#[from] ResultError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::NoFace => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the end user.
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            ProxyError::NoFace => locale.no_face().to_string(),
            ProxyError::InvalidFeature => locale.server_error(locale.invalid_feature()),
            other => locale.server_error(&other.to_string()),
        }
    }
}

/// Body of `POST /api/proxy-gemini-api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub image: String,
    pub mime_type: String,
    pub feature: AnalysisMode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProxyRequest {
    image: String,
    mime_type: String,
    feature: String,
}

impl ProxyRequest {
    pub fn decode(body: &[u8]) -> Result<Self, ProxyError> {
        let raw: RawProxyRequest =
            serde_json::from_slice(body).map_err(|e| ProxyError::BadRequest(e.to_string()))?;
        let feature = raw
            .feature
            .parse::<AnalysisMode>()
            .map_err(|_| ProxyError::InvalidFeature)?;
        Ok(Self {
            image: raw.image,
            mime_type: raw.mime_type,
            feature,
        })
    }
}

#[derive(Clone)]
pub struct ProxyService {
    model: Arc<dyn GenerativeModel>,
    locale: Locale,
    nationality: String,
}

impl ProxyService {
    pub fn new(model: Arc<dyn GenerativeModel>, locale: Locale, nationality: &str) -> Self {
        Self {
            model,
            locale,
            nationality: nationality.to_string(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub async fn handle(&self, request: &ProxyRequest) -> Result<AnalysisResult, ProxyError> {
        let image = InlineImage {
            mime_type: request.mime_type.clone(),
            data: request.image.clone(),
        };
        info!(
            mode = %request.feature,
            mime_type = %request.mime_type,
            image_len = request.image.len(),
            "analysis requested"
        );

        let answer = self
            .ask(prompts::FACE_PROBE, &image, GenerationConfig::probe())
            .await?;
        if !prompts::face_detected(&answer) {
            info!(answer = %answer.trim(), "face probe was negative");
            return Err(ProxyError::NoFace);
        }

        let result = match request.feature {
            AnalysisMode::Physiognomy => {
                let text = self
                    .ask(
                        &prompts::narrative_prompt(self.locale),
                        &image,
                        GenerationConfig::default(),
                    )
                    .await?;
                AnalysisResult::Narrative(result::parse_narrative(&text))
            }
            AnalysisMode::Celebrity => {
                let text = self
                    .ask(
                        &prompts::celebrity_prompt(self.locale, &self.nationality),
                        &image,
                        GenerationConfig::structured(prompts::celebrity_schema()),
                    )
                    .await?;
                AnalysisResult::Celebrity(result::parse_celebrity(&text).inspect_err(|e| {
                    warn!(error = %e, "celebrity output rejected");
                })?)
            }
            AnalysisMode::Soulmate => {
                let answer = self
                    .ask(prompts::GENDER_PROBE, &image, GenerationConfig::probe())
                    .await?;
                let subject = prompts::classify_gender(&answer);
                info!(answer = %answer.trim(), ?subject, "gender probe answered");

                let text = self
                    .ask(
                        &prompts::soulmate_prompt(self.locale, &self.nationality, subject),
                        &image,
                        GenerationConfig::structured(prompts::soulmate_schema()),
                    )
                    .await?;
                AnalysisResult::Compatibility(result::parse_compatibility(&text).inspect_err(
                    |e| {
                        warn!(error = %e, "compatibility output rejected");
                    },
                )?)
            }
        };

        info!(mode = %request.feature, "analysis finished");
        Ok(result)
    }

    async fn ask(
        &self,
        prompt: &str,
        image: &InlineImage,
        config: GenerationConfig,
    ) -> Result<String, ModelError> {
        let request = GenerateRequest {
            prompt: prompt.to_string(),
            image: image.clone(),
            config,
        };
        self.model.generate(&request).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::gemini::{GenerateRequest, GenerativeModel, ModelError};

    /// Replays canned answers in order and records every request.
    #[derive(Default)]
    pub struct ScriptedModel {
        answers: Mutex<VecDeque<Result<String, ModelError>>>,
        pub calls: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedModel {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: Mutex::new(answers.into_iter().map(|a| Ok(a.into())).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn then_fail(self, error: ModelError) -> Self {
            self.answers.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|call| call.prompt.clone())
                .collect()
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, request: &GenerateRequest) -> Result<String, ModelError> {
            self.calls.lock().unwrap().push(request.clone());
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ModelError::Empty))
        }
    }
}
