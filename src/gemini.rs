//! Google Gemini `generateContent` client behind the [`GenerativeModel`] seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("model returned no text")]
    Empty,
}

/// Base64 image attached to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

impl GenerationConfig {
    /// Deterministic, tiny-output settings for a one-word classification.
    pub fn probe() -> Self {
        Self {
            temperature: Some(0.0),
            max_output_tokens: Some(5),
            thinking_config: Some(ThinkingConfig { thinking_budget: 0 }),
            ..Self::default()
        }
    }

    /// Constrains output to JSON matching `schema`.
    pub fn structured(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One prompt + image round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: InlineImage,
    pub config: GenerationConfig,
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Returns the text of the first candidate.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequestBody<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "config_is_empty")]
    generation_config: &'a GenerationConfig,
}

fn config_is_empty(config: &&GenerationConfig) -> bool {
    config.is_empty()
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: GeminiBlob<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiBlob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseBody {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, model: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            model: model.trim().to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        let model_path = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ModelError> {
        let payload = build_body(request);
        debug!(
            model = %self.model,
            mime_type = %request.image.mime_type,
            image_len = request.image.data.len(),
            structured = request.config.response_schema.is_some(),
            "sending request to Gemini"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Gemini returned an error");
            return Err(ModelError::Api {
                status: status.as_u16(),
                body: truncate(&body, 512),
            });
        }

        let parsed: GeminiResponseBody = serde_json::from_str(&body)?;
        extract_text(parsed).ok_or(ModelError::Empty)
    }
}

fn build_body(request: &GenerateRequest) -> GeminiRequestBody<'_> {
    GeminiRequestBody {
        contents: vec![GeminiContent {
            parts: vec![
                GeminiPart::Text {
                    text: &request.prompt,
                },
                GeminiPart::Inline {
                    inline_data: GeminiBlob {
                        mime_type: &request.image.mime_type,
                        data: &request.image.data,
                    },
                },
            ],
        }],
        generation_config: &request.config,
    }
}

/// Joins the non-thought text parts of the first candidate that has any.
fn extract_text(body: GeminiResponseBody) -> Option<String> {
    for candidate in body.candidates.unwrap_or_default() {
        let parts = candidate
            .content
            .and_then(|content| content.parts)
            .unwrap_or_default();
        let text: String = parts
            .into_iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text)
            .collect();
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(config: GenerationConfig) -> GenerateRequest {
        GenerateRequest {
            prompt: "Is there a face?".to_string(),
            image: InlineImage {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            },
            config,
        }
    }

    #[test]
    fn probe_body_carries_zero_thinking_budget() {
        let req = request(GenerationConfig::probe());
        let body = serde_json::to_value(build_body(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [
                        {"text": "Is there a face?"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }],
                "generationConfig": {
                    "temperature": 0.0,
                    "maxOutputTokens": 5,
                    "thinkingConfig": {"thinkingBudget": 0}
                }
            })
        );
    }

    #[test]
    fn default_config_is_omitted() {
        let req = request(GenerationConfig::default());
        let body = serde_json::to_value(build_body(&req)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn structured_config_sets_json_mime() {
        let config = GenerationConfig::structured(json!({"type": "OBJECT"}));
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseMimeType"], "application/json");
        assert_eq!(value["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn extracts_text_skipping_thoughts() {
        let body: GeminiResponseBody = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "Yes"}
                ]}
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(body).as_deref(), Some("Yes"));
    }

    #[test]
    fn empty_candidates_yield_none() {
        let body: GeminiResponseBody = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(extract_text(body).is_none());
    }

    #[test]
    fn endpoint_accepts_prefixed_model() {
        let client = GeminiClient::new("https://example.test/v1beta/", "models/gemini-2.5-flash", "k");
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
