//! Turning model output into an [`AnalysisOutcome`].

use std::sync::LazyLock;

use regex::Regex;

use nuvra_core::{AnalysisOutcome, AnalysisReport};

/// Greedy: from the first `{` to the last `}`, across lines.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("Invalid regex"));

/// Upper bound of every score the prompt asks for.
const MAX_SCORE: u8 = 100;

/// Read a scored report out of model output.
///
/// Anything that does not deserialize into an [`AnalysisReport`] with
/// scores in `0..=100` is returned verbatim as [`AnalysisOutcome::RawText`].
#[must_use]
pub fn parse_analysis(output: &str) -> AnalysisOutcome {
    JSON_OBJECT_RE
        .find(output)
        .and_then(|m| serde_json::from_str::<AnalysisReport>(m.as_str()).ok())
        .filter(scores_in_range)
        .map_or_else(
            || AnalysisOutcome::RawText(output.to_owned()),
            AnalysisOutcome::StructuredScore,
        )
}

fn scores_in_range(report: &AnalysisReport) -> bool {
    [report.score, report.engagement, report.conversion]
        .iter()
        .all(|&s| s <= MAX_SCORE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
  "score": 72,
  "engagement": 65,
  "conversion": 80,
  "suggestions": [{"title": "Urgência", "description": "Adicione um prazo."}],
  "optimized_text": "Compre hoje!"
}"#;

    #[test]
    fn test_bare_json() {
        let outcome = parse_analysis(REPORT);
        let report = outcome.as_report().unwrap();
        assert_eq!(report.score, 72);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.optimized_text, "Compre hoje!");
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let output = format!("Aqui está a análise:\n```json\n{REPORT}\n```\nQuer que a Nuvra otimize isso?");
        let outcome = parse_analysis(&output);
        assert_eq!(outcome.as_report().unwrap().engagement, 65);
    }

    #[test]
    fn test_plain_text_is_raw() {
        let output = "Análise de Código: a função não trata erros.";
        assert_eq!(
            parse_analysis(output),
            AnalysisOutcome::RawText(output.to_owned())
        );
    }

    #[test]
    fn test_wrong_shape_is_raw() {
        let output = r#"Resultado: {"nota": 10}"#;
        assert_eq!(
            parse_analysis(output),
            AnalysisOutcome::RawText(output.to_owned())
        );
    }

    #[test]
    fn test_two_objects_span_is_invalid() {
        // The greedy match covers both objects, which is not valid JSON.
        let output = format!("{REPORT} e também {REPORT}");
        assert!(matches!(parse_analysis(&output), AnalysisOutcome::RawText(_)));
    }

    #[test]
    fn test_score_above_hundred_is_raw() {
        for score in ["150", "720"] {
            let output = REPORT.replace("72", score);
            assert!(matches!(parse_analysis(&output), AnalysisOutcome::RawText(_)));
        }
        let output = REPORT.replace("\"conversion\": 80", "\"conversion\": 101");
        assert!(matches!(parse_analysis(&output), AnalysisOutcome::RawText(_)));
    }

    #[test]
    fn test_boundary_scores_are_structured() {
        let output = REPORT.replace("72", "100").replace("65", "0");
        let report = parse_analysis(&output);
        assert_eq!(report.as_report().unwrap().score, 100);
    }
}
