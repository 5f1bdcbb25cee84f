//! Code-versus-copy classification and scoring.

use std::sync::LazyLock;

use regex::Regex;

use super::optimizer::{FeatureSet, optimize};
use super::rules::{
    self, BASE_SCORES, CODE_MARKERS, EXPAND_BELOW_WORDS, Feature, LANGUAGE_HINTS,
    LONG_TEXT_BONUS, LONG_TEXT_WORDS, MAX_SUGGESTIONS, MIN_WORDS, SHORT_TEXT_PITCH,
    SHORT_TEXT_SCORES, UNKNOWN_LANGUAGE,
};
use super::{AnalysisOutcome, AnalysisReport};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Number of pieces left after splitting on runs of whitespace.
///
/// Leading and trailing whitespace produce empty pieces that still count,
/// and the empty string counts as one word.
#[must_use]
pub fn word_count(text: &str) -> usize {
    WHITESPACE_RE.split(text).count()
}

/// Whether the text looks like source code.
#[must_use]
pub fn is_code(text: &str) -> bool {
    CODE_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Best-effort language label for a code snippet.
#[must_use]
pub fn detect_language(text: &str) -> &'static str {
    LANGUAGE_HINTS
        .iter()
        .find(|(hints, _)| hints.iter().any(|hint| text.contains(hint)))
        .map_or(UNKNOWN_LANGUAGE, |(_, language)| language)
}

/// Analyze a piece of text.
///
/// Code gets a free-text review; marketing copy gets a scored report with
/// at most three suggestions and a rewritten version.
#[must_use]
pub fn analyze(text: &str) -> AnalysisOutcome {
    if is_code(text) {
        let lines = text.split('\n').count();
        return AnalysisOutcome::RawText(rules::code_report(detect_language(text), lines));
    }

    let words = word_count(text);
    if words < MIN_WORDS {
        return AnalysisOutcome::StructuredScore(AnalysisReport {
            score: SHORT_TEXT_SCORES.score,
            engagement: SHORT_TEXT_SCORES.engagement,
            conversion: SHORT_TEXT_SCORES.conversion,
            suggestions: rules::short_text_suggestions(),
            optimized_text: format!("{text}{SHORT_TEXT_PITCH}"),
        });
    }

    let features = FeatureSet::detect(text);

    let mut scores = BASE_SCORES;
    if words >= LONG_TEXT_WORDS {
        scores = scores.add(LONG_TEXT_BONUS);
    }
    for feature in Feature::ALL {
        if features.has(feature) {
            scores = scores.add(feature.bonus());
        }
    }

    let mut suggestions: Vec<_> = Feature::ALL
        .into_iter()
        .filter(|feature| !features.has(*feature))
        .map(Feature::suggestion)
        .collect();
    if words < EXPAND_BELOW_WORDS {
        suggestions.push(rules::expand_content_suggestion());
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    if suggestions.is_empty() {
        suggestions.push(rules::excellent_text_suggestion());
    }

    AnalysisOutcome::StructuredScore(AnalysisReport {
        score: scores.score,
        engagement: scores.engagement,
        conversion: scores.conversion,
        suggestions,
        optimized_text: optimize(text, &features, words),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report(text: &str) -> AnalysisReport {
        match analyze(text) {
            AnalysisOutcome::StructuredScore(report) => report,
            AnalysisOutcome::RawText(raw) => panic!("expected a report, got {raw}"),
        }
    }

    fn titles(report: &AnalysisReport) -> Vec<&str> {
        report.suggestions.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_word_count_edges() {
        assert_eq!(word_count(""), 1);
        assert_eq!(word_count("oi"), 1);
        assert_eq!(word_count("oi tudo bem"), 3);
        assert_eq!(word_count(" oi "), 3);
        assert_eq!(word_count("a\n\tb"), 2);
    }

    #[test]
    fn test_short_text() {
        let report = report("oi");
        assert_eq!(
            (report.score, report.engagement, report.conversion),
            (15, 20, 10)
        );
        assert_eq!(
            titles(&report),
            [
                "Conteúdo Insuficiente",
                "Desenvolva a Mensagem",
                "Adicione Chamada para Ação"
            ]
        );
        assert_eq!(
            report.optimized_text,
            "oi - Descubra como nossa solução inovadora pode transformar seu negócio. Entre em contato agora e receba uma consultoria gratuita!"
        );
    }

    #[test]
    fn test_three_words_is_scored() {
        let report = report("bom dia pessoal");
        assert_eq!(report.score, 40);
        assert_eq!(report.suggestions.len(), 3);
    }

    #[test]
    fn test_code_is_raw_text() {
        for snippet in [
            "function soma(a, b) { return a + b }",
            "const x = 1",
            "import React from 'react'",
            "class Lead {}",
            "xs.map(x => x * 2)",
            "var total = 0",
            "let y = 2",
        ] {
            assert!(
                matches!(analyze(snippet), AnalysisOutcome::RawText(_)),
                "{snippet}"
            );
        }
    }

    #[test]
    fn test_code_report_contents() {
        let AnalysisOutcome::RawText(text) = analyze("class A {\n}\n") else {
            panic!("expected raw text");
        };
        assert!(text.contains("Linguagem identificada: POO\n"));
        assert!(text.contains("Linhas de código: 3\n"));
    }

    #[test]
    fn test_language_priority() {
        assert_eq!(detect_language("const f = () => 1"), "JavaScript");
        assert_eq!(detect_language("const a = 1"), "TypeScript/JavaScript");
        assert_eq!(detect_language("import x; class Y"), "POO");
        assert_eq!(detect_language("import x"), "ES6+");
        assert_eq!(detect_language("return 1"), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_complete_copy_keeps_text() {
        let text = "Compre agora nosso produto revolucionário, garantido para milhares de clientes satisfeitos! Acesse e aproveite.";
        let report = report(text);
        assert_eq!(word_count(text), 14);
        assert_eq!(
            (report.score, report.engagement, report.conversion),
            (80, 85, 90)
        );
        assert_eq!(
            titles(&report),
            ["Incluir Dados Concretos", "Expandir o Conteúdo"]
        );
        assert_eq!(report.optimized_text, text);
    }

    #[test]
    fn test_excellent_text() {
        let text = "Produto exclusivo e garantido, aprovado por 500 clientes reais. \
                    Compre agora com desconto de 30% e aproveite condições que só existem hoje \
                    para quem decide rápido.";
        let report = report(text);
        assert_eq!(titles(&report), ["Excelente Texto!"]);
        assert_eq!(
            (report.score, report.engagement, report.conversion),
            (95, 95, 95)
        );
    }

    #[test]
    fn test_suggestions_capped_at_three() {
        let report = report("bom dia a todos vocês");
        assert_eq!(
            titles(&report),
            [
                "Adicionar Gatilhos Emocionais",
                "Incluir Prova Social",
                "Fortalecer a Chamada para Ação"
            ]
        );
    }

    #[test]
    fn test_scores_in_range_and_deterministic() {
        for text in [
            "",
            "oi",
            "texto simples de teste",
            "Oferta exclusiva hoje: 50% de desconto para 100 clientes, clique e compre",
        ] {
            let first = analyze(text);
            assert_eq!(first, analyze(text));
            if let Some(report) = first.as_report() {
                assert!(report.score <= 95);
                assert!(report.engagement <= 95);
                assert!(report.conversion <= 95);
                assert!((1..=3).contains(&report.suggestions.len()));
            }
        }
    }
}
