//! Plain-text rendering of analysis panels for the terminal.

use std::fmt::Write as _;

use crate::messages::{Locale, ModeView};
use crate::presentation::AnalysisState;
use crate::result::{AnalysisResult, CelebrityMatch, CompatibilityMatch, NarrativeReport};

/// How one line of a narrative report is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine<'a> {
    Heading(String),
    SubHeading(String),
    Bullet(String),
    Disclaimer(&'a str),
    Paragraph(&'a str),
}

/// Line classification, checked in this order: `**Heading**`,
/// `* **Sub heading**`, any `*` bullet, the disclaimer, plain text.
pub fn classify_line<'a>(line: &'a str, disclaimer_marker: &str) -> ReportLine<'a> {
    if line.starts_with("**") && line.ends_with("**") {
        return ReportLine::Heading(line.replace("**", ""));
    }
    if line.starts_with("* **") && line.ends_with("**") {
        return ReportLine::SubHeading(line.replacen("* **", "", 1).replacen("**", "", 1));
    }
    if line.trim().starts_with('*') {
        return ReportLine::Bullet(line.replacen('*', "•", 1));
    }
    if line.contains(disclaimer_marker) {
        return ReportLine::Disclaimer(line);
    }
    ReportLine::Paragraph(line)
}

pub fn report_lines<'a>(report: &'a NarrativeReport, locale: Locale) -> Vec<ReportLine<'a>> {
    report
        .text()
        .lines()
        .map(|line| classify_line(line, locale.disclaimer_marker()))
        .collect()
}

/// Whole-number scores print without a fractional part.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score}")
    }
}

pub fn render_result(result: &AnalysisResult, locale: Locale) -> String {
    match result {
        AnalysisResult::Narrative(report) => render_narrative(report, locale),
        AnalysisResult::Celebrity(matched) => render_celebrity(matched, locale),
        AnalysisResult::Compatibility(matched) => render_compatibility(matched, locale),
    }
}

/// The panel for one mode in whatever state it is in.
pub fn render_state(state: &AnalysisState, view: &ModeView, locale: Locale) -> String {
    match state {
        AnalysisState::Idle => format!("{}\n{}", view.placeholder_title, view.placeholder_subtitle),
        AnalysisState::Loading => locale.loading().to_string(),
        AnalysisState::Failed(message) => format!("❌ {message}"),
        AnalysisState::Success(result) => render_result(result, locale),
    }
}

fn render_narrative(report: &NarrativeReport, locale: Locale) -> String {
    let mut out = String::new();
    for line in report_lines(report, locale) {
        match line {
            ReportLine::Heading(text) => {
                let _ = writeln!(out, "\n■ {}", text.trim());
            }
            ReportLine::SubHeading(text) => {
                let _ = writeln!(out, "  ▸ {}", text.trim());
            }
            ReportLine::Bullet(text) => {
                let _ = writeln!(out, "    {}", text.trim());
            }
            ReportLine::Disclaimer(text) => {
                let _ = writeln!(out, "\n{}\n{}", "─".repeat(40), text.trim());
            }
            ReportLine::Paragraph(text) => {
                let _ = writeln!(out, "{text}");
            }
        }
    }
    out.trim().to_string()
}

fn render_celebrity(matched: &CelebrityMatch, locale: Locale) -> String {
    let [lead, score_suffix, overall, features] = locale.celebrity_labels();
    let mut out = String::new();
    let _ = writeln!(out, "{lead}");
    let _ = writeln!(out, "★ {}", matched.celebrity_name);
    let _ = writeln!(
        out,
        "{}% {score_suffix}\n",
        format_score(matched.similarity_score)
    );
    let _ = writeln!(out, "{overall}");
    let _ = writeln!(out, "  {}\n", matched.analysis.overall_impression);
    let _ = writeln!(out, "{features}");
    for item in &matched.analysis.facial_features {
        let _ = writeln!(out, "  • {}: {}", item.feature, item.description);
    }
    let _ = write!(out, "\n{}", locale.celebrity_disclaimer());
    out
}

fn render_compatibility(matched: &CompatibilityMatch, locale: Locale) -> String {
    let [lead, score_prefix, overall, points, advice] = locale.soulmate_labels();
    let mut out = String::new();
    let _ = writeln!(out, "{lead}");
    let _ = writeln!(out, "♥ {}", matched.celebrity_name);
    let _ = writeln!(out, "{score_prefix} {}%\n", format_score(matched.match_score));
    let _ = writeln!(out, "{overall}");
    let _ = writeln!(out, "  {}\n", matched.analysis.overall);
    let _ = writeln!(out, "{points}");
    for point in &matched.analysis.compatibility_points {
        let _ = writeln!(out, "  • {point}");
    }
    let _ = writeln!(out, "\n{advice}");
    let _ = writeln!(out, "  \"{}\"", matched.advice);
    let _ = write!(out, "\n{}", locale.soulmate_disclaimer());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::AnalysisMode;
    use crate::result::{
        parse_narrative, CelebrityAnalysis, CompatibilityAnalysis, FacialFeature,
    };

    const MARKER: &str = "면책 조항:";

    #[test]
    fn classifies_report_lines() {
        assert_eq!(classify_line("**총평**", MARKER), ReportLine::Heading("총평".into()));
        assert_eq!(
            classify_line("* **이마 (초년운)**", MARKER),
            ReportLine::SubHeading("이마 (초년운)".into())
        );
        assert_eq!(
            classify_line("* **눈**: 맑은 눈빛", MARKER),
            ReportLine::Bullet("• **눈**: 맑은 눈빛".into())
        );
        assert_eq!(
            classify_line("면책 조항: 오락용입니다.", MARKER),
            ReportLine::Disclaimer("면책 조항: 오락용입니다.")
        );
        assert_eq!(classify_line("- 요약", MARKER), ReportLine::Paragraph("- 요약"));
    }

    /// Model output varies run to run, so check structure, not wording.
    #[test]
    fn well_formed_report_has_all_sections_and_disclaimer() {
        let locale = Locale::Ko;
        let sections = locale.report_sections();
        let mut text = String::new();
        for section in sections {
            text.push_str(&format!("**{section}**\n- 내용\n"));
            if section == sections[1] {
                for (region, _) in locale.face_regions() {
                    text.push_str(&format!("* **{region}**: 좋음\n"));
                }
            }
        }
        text.push_str(locale.narrative_disclaimer());
        let report = parse_narrative(&text);

        let lines = report_lines(&report, locale);
        let headings = lines
            .iter()
            .filter(|line| matches!(line, ReportLine::Heading(_)))
            .count();
        let regions = lines
            .iter()
            .filter(|line| matches!(line, ReportLine::Bullet(b) if b.starts_with("• **")))
            .count();
        assert_eq!(headings, 4);
        assert_eq!(regions, 6);
        assert!(matches!(lines.last(), Some(ReportLine::Disclaimer(_))));
        assert_eq!(report.headings(), sections.to_vec());
    }

    #[test]
    fn celebrity_panel_shows_score_and_features() {
        let matched = CelebrityMatch {
            celebrity_name: "Gong Yoo".into(),
            similarity_score: 87.0,
            analysis: CelebrityAnalysis {
                overall_impression: "Warm.".into(),
                facial_features: vec![FacialFeature {
                    feature: "Eyes".into(),
                    description: "Soft.".into(),
                }],
            },
        };
        let text = render_result(&AnalysisResult::Celebrity(matched), Locale::En);
        assert!(text.contains("★ Gong Yoo"));
        assert!(text.contains("87% match"));
        assert!(text.contains("• Eyes: Soft."));
        assert!(text.ends_with(Locale::En.celebrity_disclaimer()));
    }

    #[test]
    fn compatibility_panel_quotes_advice() {
        let matched = CompatibilityMatch {
            celebrity_name: "IU".into(),
            match_score: 92.5,
            analysis: CompatibilityAnalysis {
                overall: "Bright.".into(),
                compatibility_points: vec!["Similar smiles".into()],
            },
            advice: "Laugh often.".into(),
        };
        let text = render_result(&AnalysisResult::Compatibility(matched), Locale::Ko);
        assert!(text.contains("궁합 92.5%"));
        assert!(text.contains("\"Laugh often.\""));
        assert!(text.contains("• Similar smiles"));
    }

    #[test]
    fn idle_state_shows_placeholder() {
        let view = Locale::Ko.mode_view(AnalysisMode::Soulmate);
        let text = render_state(&AnalysisState::Idle, &view, Locale::Ko);
        assert!(text.starts_with(view.placeholder_title));
        let failed = render_state(&AnalysisState::Failed("x".into()), &view, Locale::Ko);
        assert_eq!(failed, "❌ x");
    }

    #[test]
    fn scores_drop_trailing_zero() {
        assert_eq!(format_score(87.0), "87");
        assert_eq!(format_score(87.25), "87.25");
    }
}
