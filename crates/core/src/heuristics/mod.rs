//! Heuristic copy and code analysis.
//!
//! Everything here is a pure function of its input: no I/O, no clock, no
//! randomness. The same text always yields the same [`AnalysisOutcome`].
//!
//! - [`analyzer`] classifies input as code or marketing copy and scores it
//! - [`optimizer`] rewrites marketing copy to add missing persuasion elements
//! - [`chat`] picks a canned reply for a chat message
//! - [`rules`] holds the keyword sets, score weights and phrase tables

pub mod analyzer;
pub mod chat;
pub mod optimizer;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::AnalysisType;

pub use analyzer::{analyze, word_count};

/// Closing line appended to code reports and the fixed system prompt.
pub const CLOSING_CTA: &str =
    "Quer que a Nuvra otimize isso para o seu negócio? Fale com nossos especialistas 🚀";

/// One improvement suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

impl Suggestion {
    /// Build a suggestion from static text.
    #[must_use]
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
        }
    }
}

/// Scored analysis of a piece of marketing copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub score: u8,
    pub engagement: u8,
    pub conversion: u8,
    pub suggestions: Vec<Suggestion>,
    pub optimized_text: String,
}

/// Result of an analysis: either a scored report or free text (code reviews
/// and unparseable model output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    StructuredScore(AnalysisReport),
    RawText(String),
}

impl AnalysisOutcome {
    /// Category under which this outcome is logged.
    ///
    /// Free text mentioning code ("Código" or "função") counts as a code
    /// review; everything else is marketing.
    #[must_use]
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            Self::RawText(text) if text.contains("Código") || text.contains("função") => {
                AnalysisType::Code
            }
            _ => AnalysisType::Marketing,
        }
    }

    /// The scored report, if any.
    #[must_use]
    pub const fn as_report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::StructuredScore(report) => Some(report),
            Self::RawText(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_code_report_is_code_type() {
        let outcome = analyze("const x = 1;");
        assert_eq!(outcome.analysis_type(), AnalysisType::Code);
    }

    #[test]
    fn test_raw_text_without_code_words_is_marketing() {
        let outcome = AnalysisOutcome::RawText("Ótimo texto de vendas".to_owned());
        assert_eq!(outcome.analysis_type(), AnalysisType::Marketing);
    }

    #[test]
    fn test_report_is_marketing() {
        assert_eq!(analyze("oi").analysis_type(), AnalysisType::Marketing);
    }

    #[test]
    fn test_outcome_is_tagged() {
        let json = serde_json::to_value(AnalysisOutcome::RawText("x".to_owned())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "raw_text", "value": "x"}));

        let json = serde_json::to_value(analyze("oi")).unwrap();
        assert_eq!(json["kind"], "structured_score");
        assert_eq!(json["value"]["score"], 15);
    }
}
