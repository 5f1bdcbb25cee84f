//! Keyword sets, score weights and phrase tables.
//!
//! The analyzer and optimizer only walk these tables; changing a keyword or
//! a weight never requires touching control flow.

use std::sync::LazyLock;

use regex::Regex;

use super::{CLOSING_CTA, Suggestion};

/// Substrings that mark input as source code (case-sensitive).
pub const CODE_MARKERS: &[&str] = &[
    "function", "const", "import", "class", "return", "=>", "var ", "let ",
];

/// Language guesses, first match wins.
pub const LANGUAGE_HINTS: &[(&[&str], &str)] = &[
    (&["function", "=>"], "JavaScript"),
    (&["const", "let"], "TypeScript/JavaScript"),
    (&["class"], "POO"),
    (&["import"], "ES6+"),
];

/// Language reported when no hint matches.
pub const UNKNOWN_LANGUAGE: &str = "Linguagem desconhecida";

/// Fixed improvement bullets of a code review.
pub const CODE_IMPROVEMENTS: &[&str] = &[
    "Adicionar tipagem TypeScript para maior segurança de tipos",
    "Implementar tratamento de erros com try/catch",
    "Considerar otimização de performance e modularização",
    "Documentar funções com JSDoc para melhor manutenibilidade",
];

/// Render the code review text.
#[must_use]
pub fn code_report(language: &str, lines: usize) -> String {
    let bullets: String = CODE_IMPROVEMENTS
        .iter()
        .map(|item| format!("- {item}\n"))
        .collect();
    format!(
        "Análise de Código Detectada\n\n\
         Linguagem identificada: {language}\n\
         Linhas de código: {lines}\n\n\
         Sugestões de Melhoria:\n\
         {bullets}\n\
         {CLOSING_CTA}"
    )
}

/// Score triple, also used as an increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub score: u8,
    pub engagement: u8,
    pub conversion: u8,
}

impl Scores {
    const fn new(score: u8, engagement: u8, conversion: u8) -> Self {
        Self {
            score,
            engagement,
            conversion,
        }
    }

    /// Add an increment, saturating at [`SCORE_CAP`].
    #[must_use]
    pub const fn add(self, delta: Self) -> Self {
        Self {
            score: cap(self.score.saturating_add(delta.score)),
            engagement: cap(self.engagement.saturating_add(delta.engagement)),
            conversion: cap(self.conversion.saturating_add(delta.conversion)),
        }
    }
}

const fn cap(value: u8) -> u8 {
    if value > SCORE_CAP { SCORE_CAP } else { value }
}

/// Highest score the heuristics ever award.
pub const SCORE_CAP: u8 = 95;

/// Starting scores for any marketing text of three or more words.
pub const BASE_SCORES: Scores = Scores::new(40, 35, 30);

/// Word count that earns [`LONG_TEXT_BONUS`].
pub const LONG_TEXT_WORDS: usize = 20;
pub const LONG_TEXT_BONUS: Scores = Scores::new(15, 15, 10);

/// Below this many words, input gets the fixed [`short_text_report`].
pub const MIN_WORDS: usize = 3;

/// Below this many words, suggest expanding the content.
pub const EXPAND_BELOW_WORDS: usize = 15;

/// Social proof is only appended to texts shorter than this.
pub const SOCIAL_PROOF_BELOW_WORDS: usize = 30;

/// Urgency is only appended to texts at least this long.
pub const URGENCY_FROM_WORDS: usize = 10;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 3;

/// Scored persuasion elements, in suggestion priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Emotional,
    SocialProof,
    CallToAction,
    Urgency,
    Numbers,
}

impl Feature {
    /// All features in suggestion priority order.
    pub const ALL: [Self; 5] = [
        Self::Emotional,
        Self::SocialProof,
        Self::CallToAction,
        Self::Urgency,
        Self::Numbers,
    ];

    /// Case-insensitive pattern that detects this feature.
    #[must_use]
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Emotional => &EMOTIONAL_RE,
            Self::SocialProof => &SOCIAL_PROOF_RE,
            Self::CallToAction => &CTA_RE,
            Self::Urgency => &URGENCY_RE,
            Self::Numbers => &NUMBERS_RE,
        }
    }

    /// Score increment when the feature is present.
    #[must_use]
    pub const fn bonus(self) -> Scores {
        match self {
            Self::Emotional => Scores::new(15, 20, 15),
            Self::CallToAction => Scores::new(10, 10, 20),
            Self::SocialProof => Scores::new(10, 15, 15),
            Self::Urgency => Scores::new(5, 5, 10),
            Self::Numbers => Scores::new(5, 10, 10),
        }
    }

    /// Suggestion offered when the feature is missing.
    #[must_use]
    pub fn suggestion(self) -> Suggestion {
        match self {
            Self::Emotional => Suggestion::new(
                "Adicionar Gatilhos Emocionais",
                "Use palavras poderosas como \"transformar\", \"exclusivo\", \"revolucionar\" e \"inovador\" para criar conexão emocional com o público.",
            ),
            Self::SocialProof => Suggestion::new(
                "Incluir Prova Social",
                "Mencione resultados comprovados, número de clientes satisfeitos, avaliações ou depoimentos reais para aumentar a credibilidade.",
            ),
            Self::CallToAction => Suggestion::new(
                "Fortalecer a Chamada para Ação",
                "Adicione um CTA claro e direto como \"Clique aqui\", \"Entre em contato agora\" ou \"Aproveite hoje\" para guiar o usuário.",
            ),
            Self::Urgency => Suggestion::new(
                "Criar Senso de Urgência",
                "Adicione elementos de escassez ou tempo limitado como \"últimas vagas\", \"oferta por tempo limitado\" ou \"apenas hoje\".",
            ),
            Self::Numbers => Suggestion::new(
                "Incluir Dados Concretos",
                "Use números específicos e estatísticas para tornar sua mensagem mais confiável e tangível. Ex: \"Mais de 500 clientes\", \"Aumento de 87%\".",
            ),
        }
    }
}

static EMOTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)transformar|exclusivo|revolucionar|inovador|único|garantido|comprovado")
        .expect("Invalid regex")
});
static CTA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)clique|acesse|compre|adquira|entre em contato|saiba mais|descubra|aproveite",
    )
    .expect("Invalid regex")
});
static SOCIAL_PROOF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)cliente|depoimento|avaliação|resultado|testemunho|pessoas|empresas")
        .expect("Invalid regex")
});
static URGENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)agora|hoje|limitado|últimas|vagas|promoção|oferta|desconto")
        .expect("Invalid regex")
});
static NUMBERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9]+%|[0-9]+ pessoas|[0-9]+ empresas|[0-9]+ clientes")
        .expect("Invalid regex")
});

/// Suggestion added when the text is short.
#[must_use]
pub fn expand_content_suggestion() -> Suggestion {
    Suggestion::new(
        "Expandir o Conteúdo",
        "Textos mais elaborados têm melhor performance. Desenvolva mais sua mensagem explicando benefícios e diferenciais.",
    )
}

/// Sole suggestion when nothing is missing.
#[must_use]
pub fn excellent_text_suggestion() -> Suggestion {
    Suggestion::new(
        "Excelente Texto!",
        "Seu texto já possui os principais elementos de persuasão. Continue mantendo essa qualidade!",
    )
}

/// Fixed scores for texts under [`MIN_WORDS`] words.
pub const SHORT_TEXT_SCORES: Scores = Scores::new(15, 20, 10);

/// Fixed suggestions for texts under [`MIN_WORDS`] words.
#[must_use]
pub fn short_text_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "Conteúdo Insuficiente",
            "Textos muito curtos não transmitem valor. Adicione mais contexto e informações relevantes.",
        ),
        Suggestion::new(
            "Desenvolva a Mensagem",
            "Crie uma narrativa completa que guie o leitor do problema à solução.",
        ),
        Suggestion::new(
            "Adicione Chamada para Ação",
            "Inclua um CTA claro que direcione o usuário para o próximo passo.",
        ),
    ]
}

/// Appended to the raw input of a short text.
pub const SHORT_TEXT_PITCH: &str = " - Descubra como nossa solução inovadora pode transformar seu negócio. Entre em contato agora e receba uma consultoria gratuita!";

/// What the copy is selling. Detection order is product, service, course,
/// event; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Product,
    Service,
    Course,
    Event,
    Generic,
}

impl Domain {
    /// Classify a text by its keywords.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        DOMAIN_KEYWORDS
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map_or(Self::Generic, |(domain, _)| *domain)
    }

    /// Opener prepended to the first characters of the text, if this domain
    /// has one. Domains without an opener rewrite the whole text as
    /// `"Descubra como " + text`.
    #[must_use]
    pub const fn emotional_opener(self) -> Option<&'static str> {
        match self {
            Self::Product => Some("Transforme sua experiência: "),
            Self::Service => Some("Revolucione seus resultados com "),
            Self::Course => Some("Domine novas habilidades: "),
            Self::Event | Self::Generic => None,
        }
    }

    #[must_use]
    pub const fn social_proof_clause(self) -> &'static str {
        match self {
            Self::Product => " — já conquistou a confiança de milhares de clientes satisfeitos",
            Self::Service => " — mais de 500 empresas já transformaram seus resultados conosco",
            Self::Course => " — aprovado por mais de 1.000 alunos com resultados comprovados",
            Self::Event | Self::Generic => " — solução validada por centenas de profissionais da área",
        }
    }

    #[must_use]
    pub const fn call_to_action(self) -> &'static str {
        match self {
            Self::Product => ". Garanta o seu agora e aproveite condições especiais!",
            Self::Service => ". Entre em contato e receba uma análise gratuita!",
            Self::Course => ". Inscreva-se hoje e comece sua jornada de transformação!",
            Self::Event => ". Reserve sua vaga agora!",
            Self::Generic => ". Saiba mais e descubra como podemos te ajudar!",
        }
    }

    #[must_use]
    pub const fn urgency(self) -> &'static str {
        match self {
            Self::Product => " Últimas unidades disponíveis.",
            Self::Service => " Vagas limitadas para este mês.",
            Self::Course | Self::Event => " Últimas vagas disponíveis!",
            Self::Generic => " Oferta válida por tempo limitado.",
        }
    }
}

/// Generic opener used by domains without their own.
pub const GENERIC_OPENER: &str = "Descubra como ";

static DOMAIN_KEYWORDS: LazyLock<[(Domain, Regex); 4]> = LazyLock::new(|| {
    [
        (Domain::Product, r"(?i)produto|vend|compra|promo|oferta|preço"),
        (Domain::Service, r"(?i)serviço|consultoria|atendimento|solução|ajud"),
        (Domain::Course, r"(?i)curso|treinamento|aula|aprend|ensino"),
        (Domain::Event, r"(?i)evento|workshop|palestra|encontro|webinar"),
    ]
    .map(|(domain, pattern)| (domain, Regex::new(pattern).expect("Invalid regex")))
});

/// Up to 50 characters at the start of the first line.
pub static LEADING_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\n\r\u{2028}\u{2029}]{1,50}").expect("Invalid regex")
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_priority() {
        assert_eq!(Domain::detect("Curso com oferta especial"), Domain::Product);
        assert_eq!(Domain::detect("Consultoria e treinamento"), Domain::Service);
        assert_eq!(Domain::detect("Workshop e aula prática"), Domain::Course);
        assert_eq!(Domain::detect("Nosso WEBINAR gratuito"), Domain::Event);
        assert_eq!(Domain::detect("Bom dia a todos"), Domain::Generic);
    }

    #[test]
    fn test_features_are_case_insensitive() {
        assert!(Feature::CallToAction.pattern().is_match("CLIQUE aqui"));
        assert!(Feature::Urgency.pattern().is_match("Últimas unidades"));
        assert!(Feature::Emotional.pattern().is_match("ÚNICO no mercado"));
    }

    #[test]
    fn test_numbers_need_a_unit() {
        assert!(Feature::Numbers.pattern().is_match("aumento de 87%"));
        assert!(Feature::Numbers.pattern().is_match("500 clientes"));
        assert!(!Feature::Numbers.pattern().is_match("desde 1999"));
    }

    #[test]
    fn test_scores_are_capped() {
        let all = Feature::ALL
            .iter()
            .fold(BASE_SCORES.add(LONG_TEXT_BONUS), |acc, f| acc.add(f.bonus()));
        assert_eq!(all, Scores::new(SCORE_CAP, SCORE_CAP, SCORE_CAP));
    }

    #[test]
    fn test_leading_span_stops_at_newline() {
        let m = LEADING_SPAN_RE.find("abc\ndef").unwrap();
        assert_eq!(m.as_str(), "abc");
        let long = "x".repeat(80);
        assert_eq!(LEADING_SPAN_RE.find(&long).unwrap().as_str().len(), 50);
    }

    #[test]
    fn test_code_report_layout() {
        let report = code_report("POO", 4);
        assert!(report.starts_with("Análise de Código Detectada\n\nLinguagem identificada: POO\n"));
        assert!(report.contains("Linhas de código: 4\n\nSugestões de Melhoria:\n- Adicionar"));
        assert!(report.ends_with("manutenibilidade\n\nQuer que a Nuvra otimize isso para o seu negócio? Fale com nossos especialistas 🚀"));
    }
}
