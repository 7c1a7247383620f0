//! Prompt templates and response schemas sent to the model.

use serde_json::{json, Value};

use crate::messages::Locale;
use crate::result::Gender;

pub const FACE_PROBE: &str =
    "Is there a human face in this image? Answer with only 'Yes' or 'No'.";

pub const GENDER_PROBE: &str =
    "Is the person in this image male or female? Answer with only 'male' or 'female'.";

/// Only an answer starting with "yes" counts as a face.
pub fn face_detected(answer: &str) -> bool {
    answer.trim().to_lowercase().starts_with("yes")
}

/// Classifies the probe answer. Anything that is not clearly "male" is
/// treated as female.
pub fn classify_gender(answer: &str) -> Gender {
    let answer = answer.trim().to_lowercase();
    if answer.starts_with("male") {
        Gender::Male
    } else {
        Gender::Female
    }
}

pub fn narrative_prompt(locale: Locale) -> String {
    let [overall, regions, personality, advice] = locale.report_sections();
    let region_lines: Vec<String> = locale
        .face_regions()
        .iter()
        .map(|(region, focus)| format!("* **{region}**: {focus}"))
        .collect();

    format!(
        "You are a face reader with decades of experience in traditional physiognomy. \
Analyze the face in the provided photo and interpret it in detail from the perspective of physiognomy.\n\
Write the entire answer in {language}, using exactly the following Markdown structure:\n\
\n\
**{overall}**\n\
- Summarize the energy the whole face gives off and the general flow of fortune in 2-3 sentences.\n\
\n\
**{regions}**\n\
{region_lines}\n\
\n\
**{personality}**\n\
- Combine the readings above to describe this person's character and temperament.\n\
\n\
**{advice}**\n\
- Give advice on attitudes and habits that offset weaknesses and make the most of strengths.\n\
\n\
Keep the tone kind and easy to understand.\n\
End with this exact sentence on its own line:\n\
\"{disclaimer}\"",
        language = locale.language_name(),
        region_lines = region_lines.join("\n"),
        disclaimer = locale.narrative_disclaimer(),
    )
}

pub fn celebrity_prompt(locale: Locale, nationality: &str) -> String {
    format!(
        "You are an expert in face recognition and entertainment celebrities. \
Analyze the face in the given photo and find the {nationality} celebrity it most resembles. \
Respond only with JSON. Give a detailed analysis, writing every text field in {language}.",
        language = locale.language_name(),
    )
}

pub fn soulmate_prompt(locale: Locale, nationality: &str, subject: Gender) -> String {
    let target = subject.opposite();
    format!(
        "You are a relationship consultant and physiognomy expert. The face in the given photo is {subject}. \
Analyze this person's physiognomy and recommend one {nationality} {target} celebrity who would be the best marriage match. \
The response must be JSON. Keep the analysis detailed and positive, writing every text field in {language}.",
        subject = locale.gender_label(subject),
        target = locale.gender_label(target),
        language = locale.language_name(),
    )
}

pub fn celebrity_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "celebrityName": { "type": "STRING" },
            "similarityScore": { "type": "NUMBER" },
            "analysis": {
                "type": "OBJECT",
                "properties": {
                    "overallImpression": { "type": "STRING" },
                    "facialFeatures": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "feature": { "type": "STRING" },
                                "description": { "type": "STRING" }
                            },
                            "required": ["feature", "description"]
                        }
                    }
                },
                "required": ["overallImpression", "facialFeatures"]
            }
        },
        "required": ["celebrityName", "similarityScore", "analysis"]
    })
}

pub fn soulmate_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "celebrityName": { "type": "STRING" },
            "matchScore": { "type": "NUMBER" },
            "analysis": {
                "type": "OBJECT",
                "properties": {
                    "overall": { "type": "STRING" },
                    "compatibilityPoints": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["overall", "compatibilityPoints"]
            },
            "advice": { "type": "STRING" }
        },
        "required": ["celebrityName", "matchScore", "analysis", "advice"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_answer_must_start_with_yes() {
        assert!(face_detected("Yes"));
        assert!(face_detected("  yes.\n"));
        assert!(!face_detected("No"));
        assert!(!face_detected("I think yes"));
        assert!(!face_detected(""));
    }

    #[test]
    fn gender_answer_defaults_to_female() {
        assert_eq!(classify_gender("Male"), Gender::Male);
        assert_eq!(classify_gender(" male\n"), Gender::Male);
        assert_eq!(classify_gender("female"), Gender::Female);
        assert_eq!(classify_gender("unsure"), Gender::Female);
    }

    #[test]
    fn narrative_prompt_lists_every_section_and_disclaimer() {
        for locale in [Locale::Ko, Locale::En] {
            let prompt = narrative_prompt(locale);
            for section in locale.report_sections() {
                assert!(prompt.contains(&format!("**{section}**")), "{section}");
            }
            for (region, _) in locale.face_regions() {
                assert!(prompt.contains(region));
            }
            assert!(prompt.contains(locale.narrative_disclaimer()));
        }
    }

    #[test]
    fn soulmate_prompt_targets_opposite_gender() {
        let prompt = soulmate_prompt(Locale::En, "Korean", Gender::Male);
        assert!(prompt.contains("The face in the given photo is male"));
        assert!(prompt.contains("Korean female celebrity"));
    }

    #[test]
    fn schemas_require_every_field() {
        assert_eq!(
            celebrity_schema()["required"],
            json!(["celebrityName", "similarityScore", "analysis"])
        );
        assert_eq!(
            soulmate_schema()["properties"]["analysis"]["required"],
            json!(["overall", "compatibilityPoints"])
        );
    }
}
