//! User-facing text, one catalog per locale.
//!
//! Everything a person can read (error strings, UI labels, the disclaimer
//! the narrative prompt demands, section headings) comes from here so the
//! proxy, the client and the renderer agree on the exact wording.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mode::AnalysisMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" | "korean" => Ok(Locale::Ko),
            "en" | "en-us" | "english" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        })
    }
}

/// Labels shown around one mode's tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeView {
    pub header_title: &'static str,
    pub header_subtitle: &'static str,
    pub button: &'static str,
    pub placeholder_title: &'static str,
    pub placeholder_subtitle: &'static str,
}

/// Every string the embedded page shows, serialized into it at startup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageText {
    pub lang: Locale,
    pub title: &'static str,
    pub upload_heading: &'static str,
    pub upload_prompt: &'static str,
    pub upload_hint: &'static str,
    pub result_heading: &'static str,
    pub analyzing: &'static str,
    pub loading: &'static str,
    pub upload_first: &'static str,
    pub unknown_error: &'static str,
    pub disclaimer_marker: &'static str,
    /// Prefixes; the page appends the status text or the cause.
    pub status_fallback: String,
    pub analysis_failed: String,
    pub views: Vec<PageView>,
    pub celebrity_labels: [&'static str; 4],
    pub celebrity_disclaimer: &'static str,
    pub soulmate_labels: [&'static str; 5],
    pub soulmate_disclaimer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub mode: AnalysisMode,
    pub tab: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub button: &'static str,
    pub placeholder: [&'static str; 2],
}

impl Locale {
    /// Language the model is asked to answer in.
    pub fn language_name(self) -> &'static str {
        match self {
            Locale::Ko => "Korean",
            Locale::En => "English",
        }
    }

    pub fn upload_first(self) -> &'static str {
        match self {
            Locale::Ko => "먼저 사진을 업로드해주세요.",
            Locale::En => "Please upload a photo first.",
        }
    }

    pub fn unknown_error(self) -> &'static str {
        match self {
            Locale::Ko => "알 수 없는 오류가 발생했습니다. 네트워크 연결을 확인하고 다시 시도해주세요.",
            Locale::En => "An unknown error occurred. Check your network connection and try again.",
        }
    }

    pub fn no_face(self) -> &'static str {
        match self {
            Locale::Ko => "사진에서 얼굴을 찾을 수 없습니다. 정면이 보이는 사람 얼굴 사진으로 다시 시도해주세요.",
            Locale::En => "No face was found in the photo. Please try again with a clear, front-facing photo of a person.",
        }
    }

    pub fn method_not_allowed(self) -> &'static str {
        "Method Not Allowed"
    }

    pub fn invalid_feature(self) -> &'static str {
        "Invalid feature specified."
    }

    pub fn tab_label(self, mode: AnalysisMode) -> &'static str {
        match (self, mode) {
            (Locale::Ko, AnalysisMode::Physiognomy) => "🔮 AI 관상",
            (Locale::Ko, AnalysisMode::Celebrity) => "⭐ 닮은꼴 찾기",
            (Locale::Ko, AnalysisMode::Soulmate) => "💖 천생연분",
            (Locale::En, AnalysisMode::Physiognomy) => "🔮 Face Reading",
            (Locale::En, AnalysisMode::Celebrity) => "⭐ Look-alike",
            (Locale::En, AnalysisMode::Soulmate) => "💖 Soulmate",
        }
    }

    pub fn page_text(self) -> PageText {
        let (upload_heading, upload_prompt, upload_hint, result_heading, analyzing) = match self {
            Locale::Ko => (
                "1. 사진 업로드",
                "클릭하거나 사진을 드래그하여 업로드하세요",
                "정면이 잘 나온 선명한 사진을 권장합니다.",
                "2. 분석 결과",
                "분석 중...",
            ),
            Locale::En => (
                "1. Upload a photo",
                "Click or drag a photo here to upload",
                "A clear, front-facing photo works best.",
                "2. Result",
                "Analyzing...",
            ),
        };
        let views = AnalysisMode::ALL
            .iter()
            .map(|&mode| {
                let view = self.mode_view(mode);
                PageView {
                    mode,
                    tab: self.tab_label(mode),
                    title: view.header_title,
                    subtitle: view.header_subtitle,
                    button: view.button,
                    placeholder: [view.placeholder_title, view.placeholder_subtitle],
                }
            })
            .collect();

        PageText {
            lang: self,
            title: self.mode_view(AnalysisMode::Physiognomy).header_title,
            upload_heading,
            upload_prompt,
            upload_hint,
            result_heading,
            analyzing,
            loading: self.loading(),
            upload_first: self.upload_first(),
            unknown_error: self.unknown_error(),
            disclaimer_marker: self.disclaimer_marker(),
            status_fallback: self.http_status_fallback(""),
            analysis_failed: self.analysis_failed(""),
            views,
            celebrity_labels: self.celebrity_labels(),
            celebrity_disclaimer: self.celebrity_disclaimer(),
            soulmate_labels: self.soulmate_labels(),
            soulmate_disclaimer: self.soulmate_disclaimer(),
        }
    }

    /// Wraps any proxy-side failure for the end user.
    pub fn server_error(self, cause: &str) -> String {
        match self {
            Locale::Ko => format!(
                "AI 서버와 통신 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요. ({cause})"
            ),
            Locale::En => format!(
                "An error occurred while talking to the AI server. Please try again shortly. ({cause})"
            ),
        }
    }

    /// Used by the client when an error body has no readable `error` field.
    pub fn http_status_fallback(self, status_text: &str) -> String {
        match self {
            Locale::Ko => format!("서버 오류가 발생했습니다: {status_text}"),
            Locale::En => format!("A server error occurred: {status_text}"),
        }
    }

    /// Wraps every client-side failure.
    pub fn analysis_failed(self, cause: &str) -> String {
        match self {
            Locale::Ko => format!("분석 중 오류가 발생했습니다: {cause}"),
            Locale::En => format!("An error occurred during analysis: {cause}"),
        }
    }

    /// Prefix the renderer uses to spot the disclaimer line.
    pub fn disclaimer_marker(self) -> &'static str {
        match self {
            Locale::Ko => "면책 조항:",
            Locale::En => "Disclaimer:",
        }
    }

    /// Sentence the narrative report must end with.
    pub fn narrative_disclaimer(self) -> &'static str {
        match self {
            Locale::Ko => "면책 조항: 이 분석은 오락적인 목적으로 제공되며, 과학적 근거가 부족할 수 있습니다. 인생의 중요한 결정은 본인의 판단에 따라 신중하게 내리시기 바랍니다.",
            Locale::En => "Disclaimer: This reading is provided for entertainment purposes only and may lack scientific basis. Please make important life decisions carefully, using your own judgement.",
        }
    }

    pub fn celebrity_disclaimer(self) -> &'static str {
        match self {
            Locale::Ko => "면책 조항: 이 분석은 오락적인 목적으로 제공됩니다.",
            Locale::En => "Disclaimer: This analysis is provided for entertainment purposes only.",
        }
    }

    pub fn soulmate_disclaimer(self) -> &'static str {
        match self {
            Locale::Ko => "면책 조항: 이 분석은 오락적인 목적으로 제공되며, 실제 궁합과는 관련이 없습니다.",
            Locale::En => "Disclaimer: This analysis is for entertainment only and says nothing about real compatibility.",
        }
    }

    /// Top-level headings of the narrative report, in order.
    pub fn report_sections(self) -> [&'static str; 4] {
        match self {
            Locale::Ko => ["총평", "얼굴 각 부위별 분석", "성격 및 기질", "조언"],
            Locale::En => [
                "Overall Impression",
                "Facial Region Analysis",
                "Personality and Temperament",
                "Advice",
            ],
        }
    }

    /// Facial regions read in the second section, with what each one covers.
    pub fn face_regions(self) -> [(&'static str, &'static str); 6] {
        match self {
            Locale::Ko => [
                ("이마 (초년운)", "넓이, 모양, 빛깔을 보고 지혜, 직업운, 부모운을 분석합니다."),
                ("눈썹 (형제운, 계획)", "모양, 짙음, 길이를 보고 대인관계와 계획성을 분석합니다."),
                ("눈 (중년운의 핵심)", "눈빛, 크기, 모양을 보고 마음의 상태, 재물운, 지혜를 분석합니다."),
                ("코 (재물운)", "콧대의 높이, 콧방울의 모양을 보고 재물운과 자존심을 분석합니다."),
                ("인중과 입 (말년운)", "인중의 길이와 깊이, 입의 크기와 입꼬리를 보고 자녀운, 의지력, 말년의 생활을 분석합니다."),
                ("턱 (말년운, 부동산운)", "턱의 모양과 살집을 보고 의지력, 아랫사람 복, 안정적인 말년을 분석합니다."),
            ],
            Locale::En => [
                ("Forehead (early life)", "Read width, shape and tone for wisdom, career luck and family support."),
                ("Eyebrows (siblings, planning)", "Read shape, density and length for relationships and planning."),
                ("Eyes (heart of middle age)", "Read gaze, size and shape for state of mind, wealth and insight."),
                ("Nose (wealth)", "Read bridge height and nostril shape for wealth and self-respect."),
                ("Philtrum and mouth (later life)", "Read philtrum length and depth, mouth size and corners for children, willpower and later life."),
                ("Chin (later life, property)", "Read chin shape and fullness for willpower, support from others and a stable later life."),
            ],
        }
    }

    pub fn gender_label(self, gender: crate::result::Gender) -> &'static str {
        use crate::result::Gender;
        match (self, gender) {
            (Locale::Ko, Gender::Male) => "남성",
            (Locale::Ko, Gender::Female) => "여성",
            (Locale::En, Gender::Male) => "male",
            (Locale::En, Gender::Female) => "female",
        }
    }

    pub fn loading(self) -> &'static str {
        match self {
            Locale::Ko => "AI가 당신의 얼굴을 분석하고 있습니다... 잠시만 기다려주세요.",
            Locale::En => "The AI is analyzing your face... please wait.",
        }
    }

    pub fn mode_view(self, mode: AnalysisMode) -> ModeView {
        match (self, mode) {
            (Locale::Ko, AnalysisMode::Physiognomy) => ModeView {
                header_title: "AI 관상 분석",
                header_subtitle: "얼굴 사진으로 당신의 성격과 운명을 알아보세요",
                button: "AI 관상 분석",
                placeholder_title: "AI 관상가에게 당신의 미래를 물어보세요.",
                placeholder_subtitle: "사진을 올리고 분석을 시작하세요.",
            },
            (Locale::Ko, AnalysisMode::Celebrity) => ModeView {
                header_title: "닮은꼴 연예인 찾기",
                header_subtitle: "나와 가장 닮은 연예인은 누구일까요?",
                button: "닮은 연예인 찾기",
                placeholder_title: "가장 닮은 연예인을 찾아보세요!",
                placeholder_subtitle: "사진을 올리고 분석을 시작하세요.",
            },
            (Locale::Ko, AnalysisMode::Soulmate) => ModeView {
                header_title: "천생연분 찾기",
                header_subtitle: "관상으로 내 운명의 짝을 찾아보세요",
                button: "천생연분 찾기",
                placeholder_title: "당신의 천생연분은 누구일까요?",
                placeholder_subtitle: "사진을 올리고 운명의 상대를 찾아보세요.",
            },
            (Locale::En, AnalysisMode::Physiognomy) => ModeView {
                header_title: "AI Face Reading",
                header_subtitle: "Discover your character and fortune from a photo",
                button: "Read my face",
                placeholder_title: "Ask the AI face reader about your future.",
                placeholder_subtitle: "Upload a photo and start the analysis.",
            },
            (Locale::En, AnalysisMode::Celebrity) => ModeView {
                header_title: "Celebrity Look-alike",
                header_subtitle: "Which celebrity do you resemble most?",
                button: "Find my look-alike",
                placeholder_title: "Find the celebrity you look like!",
                placeholder_subtitle: "Upload a photo and start the analysis.",
            },
            (Locale::En, AnalysisMode::Soulmate) => ModeView {
                header_title: "Find Your Soulmate",
                header_subtitle: "Find your destined match through face reading",
                button: "Find my soulmate",
                placeholder_title: "Who is your soulmate?",
                placeholder_subtitle: "Upload a photo and meet your match.",
            },
        }
    }

    /// Panel labels: lead-in, score suffix, overall, feature list.
    pub fn celebrity_labels(self) -> [&'static str; 4] {
        match self {
            Locale::Ko => ["당신과 가장 닮은 연예인은...", "일치", "⭐ 종합 인상", "✨ 닮은 포인트"],
            Locale::En => ["Your celebrity look-alike is...", "match", "⭐ Overall impression", "✨ Shared features"],
        }
    }

    /// Panel labels: lead-in, score prefix, overall, points, advice.
    pub fn soulmate_labels(self) -> [&'static str; 5] {
        match self {
            Locale::Ko => [
                "당신의 천생연분 연예인은...",
                "궁합",
                "💖 환상의 케미",
                "💑 관상 궁합 포인트",
                "💌 로맨틱 조언",
            ],
            Locale::En => [
                "Your celebrity soulmate is...",
                "compatibility",
                "💖 Chemistry",
                "💑 Compatibility points",
                "💌 Romantic advice",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Locale;
    use crate::mode::AnalysisMode;

    #[test]
    fn parses_locale_aliases() {
        assert_eq!("KO".parse::<Locale>().unwrap(), Locale::Ko);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn disclaimers_start_with_marker() {
        for locale in [Locale::Ko, Locale::En] {
            let marker = locale.disclaimer_marker();
            assert!(locale.narrative_disclaimer().starts_with(marker));
            assert!(locale.celebrity_disclaimer().starts_with(marker));
            assert!(locale.soulmate_disclaimer().starts_with(marker));
        }
    }

    #[test]
    fn wrappers_embed_cause() {
        assert!(Locale::Ko.server_error("boom").contains("(boom)"));
        assert!(Locale::En.analysis_failed("boom").ends_with("boom"));
        assert!(Locale::Ko.http_status_fallback("Bad Gateway").contains("Bad Gateway"));
    }

    #[test]
    fn every_mode_has_a_view() {
        for mode in AnalysisMode::ALL {
            assert!(!Locale::Ko.mode_view(mode).button.is_empty());
            assert!(!Locale::En.mode_view(mode).header_title.is_empty());
        }
    }

    #[test]
    fn page_text_follows_locale() {
        let value = serde_json::to_value(Locale::En.page_text()).unwrap();
        assert_eq!(value["lang"], "en");
        assert_eq!(value["views"][2]["mode"], "soulmate");
        assert_eq!(value["views"][2]["button"], "Find my soulmate");
        assert_eq!(value["uploadFirst"], "Please upload a photo first.");
        assert_eq!(value["statusFallback"], "A server error occurred: ");

        let korean = Locale::Ko.page_text();
        assert_eq!(korean.unknown_error, Locale::Ko.unknown_error());
        assert_eq!(korean.analysis_failed, "분석 중 오류가 발생했습니다: ");
    }
}
