// analysis/extract.rs
// Pull one JSON object out of free-form model output

use super::types::LLMError;
use crate::types::AiAnalysis;
use regex::Regex;
use std::sync::OnceLock;

/// Return the first balanced `{...}` region. Braces inside string literals
/// are ignored. `None` if no object opens, or the first one never closes.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

fn strip_code_fences(text: &str) -> std::borrow::Cow<'_, str> {
    static FENCE_RE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE_RE.get_or_init(|| Regex::new(r"```(?:json)?\s*").expect("valid fence regex"));
    re.replace_all(text, "")
}

/// Parse and validate an analysis from untrusted model text.
pub fn parse_analysis(text: &str) -> Result<AiAnalysis, LLMError> {
    let cleaned = strip_code_fences(text);
    let json = first_json_object(&cleaned).ok_or(LLMError::MissingJson)?;

    let analysis: AiAnalysis =
        serde_json::from_str(json).map_err(|e| LLMError::Parse(e.to_string()))?;

    validate(&analysis)?;
    Ok(analysis)
}

fn validate(analysis: &AiAnalysis) -> Result<(), LLMError> {
    let insight = &analysis.insight;

    if insight.confidence > 100 {
        return Err(LLMError::Parse(format!(
            "confidence {} is not a percentage",
            insight.confidence
        )));
    }

    let impact = &analysis.health_impact;
    let required = [
        ("insight.explanation", insight.explanation.as_str()),
        ("insight.healthAdvice", insight.health_advice.as_str()),
        ("insight.trend", insight.trend.as_str()),
        (
            "healthImpact.respiratoryRisk.level",
            impact.respiratory_risk.level.as_str(),
        ),
        (
            "healthImpact.respiratoryRisk.description",
            impact.respiratory_risk.description.as_str(),
        ),
        ("healthImpact.visibility.value", impact.visibility.value.as_str()),
        (
            "healthImpact.visibility.description",
            impact.visibility.description.as_str(),
        ),
        (
            "healthImpact.outdoorActivity.level",
            impact.outdoor_activity.level.as_str(),
        ),
        (
            "healthImpact.outdoorActivity.description",
            impact.outdoor_activity.description.as_str(),
        ),
    ];

    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(LLMError::Parse(format!("{} is empty", field)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
      "insight": {
        "explanation": "Traffic {and} \"smog\" dominate.",
        "healthAdvice": "Wear a mask.",
        "trend": "Worsening overnight.",
        "confidence": 82
      },
      "healthImpact": {
        "respiratoryRisk": {"level": "High", "description": "d", "color": "hsl(0, 84%, 55%)"},
        "visibility": {"value": "< 5 km", "description": "d", "color": "hsl(0, 84%, 55%)"},
        "outdoorActivity": {"level": "Limited", "description": "d", "color": "hsl(0, 84%, 55%)"}
      }
    }"#;

    #[test]
    fn test_first_object_skips_braces_in_strings() {
        let text = r#"Sure! {"a": "}{", "b": {"c": 1}} trailing {"d": 2}"#;
        assert_eq!(first_json_object(text), Some(r#"{"a": "}{", "b": {"c": 1}}"#));
    }

    #[test]
    fn test_first_object_none_when_missing_or_truncated() {
        assert_eq!(first_json_object("no json here"), None);
        assert_eq!(first_json_object(r#"{"a": {"b": 1}"#), None);
    }

    #[test]
    fn test_parse_with_prose_and_fences() {
        let text = format!("Here is the analysis:\n```json\n{}\n```\nHope it helps.", VALID);
        let analysis = parse_analysis(&text).unwrap();
        assert_eq!(analysis.insight.confidence, 82);
        assert_eq!(analysis.insight.explanation, "Traffic {and} \"smog\" dominate.");
        assert!(analysis.insight.future_projection.is_none());
        assert_eq!(analysis.health_impact.visibility.value, "< 5 km");
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let partial =
            r#"{"insight": {"explanation": "x", "healthAdvice": "y", "trend": "z", "confidence": 80}}"#;
        assert!(matches!(parse_analysis(partial), Err(LLMError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_types_and_ranges() {
        let wrong_type = VALID.replace("\"confidence\": 82", "\"confidence\": \"high\"");
        assert!(matches!(parse_analysis(&wrong_type), Err(LLMError::Parse(_))));

        let out_of_range = VALID.replace("\"confidence\": 82", "\"confidence\": 180");
        assert!(matches!(parse_analysis(&out_of_range), Err(LLMError::Parse(_))));

        let blank = VALID.replace("\"healthAdvice\": \"Wear a mask.\"", "\"healthAdvice\": \"  \"");
        assert!(matches!(parse_analysis(&blank), Err(LLMError::Parse(_))));
    }

    #[test]
    fn test_parse_without_json() {
        assert!(matches!(
            parse_analysis("I cannot help with that."),
            Err(LLMError::MissingJson)
        ));
    }

    #[test]
    fn test_parse_rejects_blank_descriptions() {
        let blank = VALID.replacen("\"description\": \"d\"", "\"description\": \" \"", 1);
        match parse_analysis(&blank) {
            Err(LLMError::Parse(reason)) => {
                assert!(reason.contains("respiratoryRisk.description"))
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_color_is_accepted() {
        let colorless = VALID.replace(", \"color\": \"hsl(0, 84%, 55%)\"", "");
        let analysis = parse_analysis(&colorless).unwrap();
        assert!(analysis.health_impact.visibility.color.is_empty());
    }
}
