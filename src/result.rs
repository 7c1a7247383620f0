//! Result shapes for the three analyses, validated where the model's output
//! first enters the system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mode::AnalysisMode;

#[derive(Debug, Error)]
pub enum ResultError {
    #[error("model output is not valid {mode} JSON: {source}")]
    Parse {
        mode: AnalysisMode,
        #[source]
        source: serde_json::Error,
    },

    #[error("model output failed {mode} validation: {reason}")]
    Invalid { mode: AnalysisMode, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn opposite(self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// Free-text face reading. Structure is advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NarrativeReport(pub String);

impl NarrativeReport {
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Bold `**Heading**` lines in order of appearance.
    pub fn headings(&self) -> Vec<&str> {
        self.0
            .lines()
            .map(str::trim)
            .filter(|line| line.len() > 4 && line.starts_with("**") && line.ends_with("**"))
            .map(|line| line.trim_matches('*').trim())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacialFeature {
    pub feature: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityAnalysis {
    pub overall_impression: String,
    pub facial_features: Vec<FacialFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityMatch {
    pub celebrity_name: String,
    pub similarity_score: f64,
    pub analysis: CelebrityAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityAnalysis {
    pub overall: String,
    pub compatibility_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityMatch {
    pub celebrity_name: String,
    pub match_score: f64,
    pub analysis: CompatibilityAnalysis,
    pub advice: String,
}

/// One finished analysis. Serializes to the bare payload the proxy returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Narrative(NarrativeReport),
    Celebrity(CelebrityMatch),
    Compatibility(CompatibilityMatch),
}

impl AnalysisResult {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisResult::Narrative(_) => AnalysisMode::Physiognomy,
            AnalysisResult::Celebrity(_) => AnalysisMode::Celebrity,
            AnalysisResult::Compatibility(_) => AnalysisMode::Soulmate,
        }
    }

    /// Decodes a proxy response body for `mode` without further checks.
    pub fn from_response(mode: AnalysisMode, body: &str) -> Result<Self, ResultError> {
        let parse_err = |source| ResultError::Parse { mode, source };
        Ok(match mode {
            AnalysisMode::Physiognomy => {
                AnalysisResult::Narrative(serde_json::from_str(body).map_err(parse_err)?)
            }
            AnalysisMode::Celebrity => {
                AnalysisResult::Celebrity(serde_json::from_str(body).map_err(parse_err)?)
            }
            AnalysisMode::Soulmate => {
                AnalysisResult::Compatibility(serde_json::from_str(body).map_err(parse_err)?)
            }
        })
    }
}

/// Raw model text becomes the narrative verbatim.
pub fn parse_narrative(text: &str) -> NarrativeReport {
    NarrativeReport(text.to_string())
}

pub fn parse_celebrity(text: &str) -> Result<CelebrityMatch, ResultError> {
    let mode = AnalysisMode::Celebrity;
    let parsed: CelebrityMatch = serde_json::from_str(text.trim())
        .map_err(|source| ResultError::Parse { mode, source })?;

    require_text(mode, "celebrityName", &parsed.celebrity_name)?;
    require_score(mode, "similarityScore", parsed.similarity_score)?;
    require_text(
        mode,
        "analysis.overallImpression",
        &parsed.analysis.overall_impression,
    )?;
    Ok(parsed)
}

pub fn parse_compatibility(text: &str) -> Result<CompatibilityMatch, ResultError> {
    let mode = AnalysisMode::Soulmate;
    let parsed: CompatibilityMatch = serde_json::from_str(text.trim())
        .map_err(|source| ResultError::Parse { mode, source })?;

    require_text(mode, "celebrityName", &parsed.celebrity_name)?;
    require_score(mode, "matchScore", parsed.match_score)?;
    require_text(mode, "analysis.overall", &parsed.analysis.overall)?;
    if parsed.analysis.compatibility_points.is_empty() {
        return Err(ResultError::Invalid {
            mode,
            reason: "analysis.compatibilityPoints is empty".to_string(),
        });
    }
    require_text(mode, "advice", &parsed.advice)?;
    Ok(parsed)
}

fn require_text(mode: AnalysisMode, field: &str, value: &str) -> Result<(), ResultError> {
    if value.trim().is_empty() {
        return Err(ResultError::Invalid {
            mode,
            reason: format!("{field} is empty"),
        });
    }
    Ok(())
}

fn require_score(mode: AnalysisMode, field: &str, value: f64) -> Result<(), ResultError> {
    if !value.is_finite() {
        return Err(ResultError::Invalid {
            mode,
            reason: format!("{field} is not a finite number"),
        });
    }
    Ok(())
}
