//! Rewriting marketing copy to add missing persuasion elements.

use super::rules::{
    Domain, Feature, GENERIC_OPENER, LEADING_SPAN_RE, SOCIAL_PROOF_BELOW_WORDS,
    URGENCY_FROM_WORDS,
};

/// Which persuasion features a text already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureSet {
    pub emotional: bool,
    pub social_proof: bool,
    pub call_to_action: bool,
    pub urgency: bool,
    pub numbers: bool,
}

impl FeatureSet {
    /// Run every feature pattern over the raw text.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let found = |feature: Feature| feature.pattern().is_match(text);
        Self {
            emotional: found(Feature::Emotional),
            social_proof: found(Feature::SocialProof),
            call_to_action: found(Feature::CallToAction),
            urgency: found(Feature::Urgency),
            numbers: found(Feature::Numbers),
        }
    }

    #[must_use]
    pub const fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Emotional => self.emotional,
            Feature::SocialProof => self.social_proof,
            Feature::CallToAction => self.call_to_action,
            Feature::Urgency => self.urgency,
            Feature::Numbers => self.numbers,
        }
    }
}

/// Rewrite `text`, filling in missing elements in a fixed order: emotional
/// opener, social proof, call to action, urgency.
///
/// The domain is detected on the original text, the rewrite starts from the
/// trimmed text, and each step builds on the previous one.
#[must_use]
pub fn optimize(text: &str, features: &FeatureSet, word_count: usize) -> String {
    let domain = Domain::detect(text);
    let mut optimized = text.trim().to_owned();

    if !features.emotional {
        optimized = match domain.emotional_opener() {
            Some(opener) => with_opener(&optimized, opener),
            None => format!("{GENERIC_OPENER}{}", optimized.to_lowercase()),
        };
    }

    if !features.social_proof && word_count < SOCIAL_PROOF_BELOW_WORDS {
        optimized.push_str(domain.social_proof_clause());
    }

    if !features.call_to_action {
        optimized.push_str(domain.call_to_action());
    }

    if !features.urgency && word_count >= URGENCY_FROM_WORDS {
        optimized.push_str(domain.urgency());
    }

    optimized
}

/// Replace the leading span of the first line with `opener` followed by the
/// span lowercased. Text starting with a line break is left unchanged.
fn with_opener(text: &str, opener: &str) -> String {
    match LEADING_SPAN_RE.find(text) {
        Some(span) => {
            let (head, tail) = text.split_at(span.end());
            format!("{opener}{}{tail}", head.to_lowercase())
        }
        None => text.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::heuristics::word_count;

    fn run(text: &str) -> String {
        optimize(text, &FeatureSet::detect(text), word_count(text))
    }

    #[test]
    fn test_product_rewrite_compounds() {
        let text = "Nosso Produto Chegou";
        assert_eq!(
            run(text),
            "Transforme sua experiência: nosso produto chegou \
             — já conquistou a confiança de milhares de clientes satisfeitos\
             . Garanta o seu agora e aproveite condições especiais!"
        );
    }

    #[test]
    fn test_opener_only_lowercases_first_fifty_chars() {
        let text = format!("Serviço {} FIM", "A".repeat(60));
        let out = run(&text);
        let expected_head = format!("Revolucione seus resultados com serviço {}", "a".repeat(42));
        assert!(out.starts_with(&expected_head), "{out}");
        assert!(out.contains(&format!("{} FIM", "A".repeat(18))));
    }

    #[test]
    fn test_generic_lowercases_everything() {
        let out = run("Bom Dia Pessoal");
        assert!(out.starts_with("Descubra como bom dia pessoal — solução validada"));
        assert!(out.ends_with(". Saiba mais e descubra como podemos te ajudar!"));
    }

    #[test]
    fn test_event_uses_generic_opener_and_own_cta() {
        let out = run("Participe do nosso Workshop");
        assert_eq!(
            out,
            "Descubra como participe do nosso workshop \
             — solução validada por centenas de profissionais da área\
             . Reserve sua vaga agora!"
        );
    }

    #[test]
    fn test_urgency_needs_ten_words() {
        let short = run("Curso completo de marketing para iniciantes");
        assert!(!short.contains("Últimas vagas"));

        let long = run("Curso completo de marketing digital para iniciantes que querem crescer rápido");
        assert!(long.ends_with(". Inscreva-se hoje e comece sua jornada de transformação! Últimas vagas disponíveis!"));
    }

    #[test]
    fn test_social_proof_skipped_for_long_text() {
        let text = "palavra ".repeat(31);
        assert!(!run(&text).contains(" — "));
    }

    #[test]
    fn test_input_is_trimmed() {
        assert!(run("  bom dia pessoal  ").starts_with("Descubra como bom dia pessoal —"));
    }
}
