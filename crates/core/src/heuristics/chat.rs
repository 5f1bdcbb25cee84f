//! Canned chat replies.
//!
//! Messages are routed by topic keywords on the lowercased text; the first
//! matching topic wins. Each reply varies one sentence on how long (or how
//! question-like) the message is.

/// First assistant message of every conversation.
pub const GREETING: &str = "Olá! Sou a IA da Nuvra. Como posso ajudar você hoje?";

/// Reply sent instead of an answer once the free quota is used up.
pub const QUOTA_EXHAUSTED_REPLY: &str = "Você atingiu o limite de uso gratuito. Para continuar usando o chat, entre em contato com a Nuvra para conhecer nossos planos!";

/// Conversation topics, in routing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Marketing,
    Programming,
    Conversion,
    Help,
    General,
}

const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Marketing, &["marketing", "vendas"]),
    (Topic::Programming, &["código", "programação", "função"]),
    (Topic::Conversion, &["engajamento", "conversão"]),
    (Topic::Help, &["ajuda", "como", "?"]),
];

impl Topic {
    /// Route a message to its topic.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(Self::General, |(topic, _)| *topic)
    }
}

/// Pick the canned reply for a message.
#[must_use]
pub fn respond(message: &str) -> String {
    let length = message.chars().count();

    match Topic::classify(message) {
        Topic::Marketing => {
            let opener = if length > 50 {
                "Vejo que você tem uma dúvida específica."
            } else {
                "Vou te ajudar com isso!"
            };
            format!(
                "Sobre marketing e vendas, aqui estão minhas recomendações baseadas na sua mensagem:\n\n\
                 {opener}\n\n\
                 Para estratégias de marketing digital eficazes, é fundamental:\n\
                 - Conhecer profundamente seu público-alvo\n\
                 - Criar conteúdo relevante e envolvente\n\
                 - Usar dados para otimizar campanhas\n\
                 - Testar diferentes abordagens (A/B testing)\n\n\
                 Quer que a Nuvra otimize isso para o seu negócio? Fale com nossos especialistas 🚀"
            )
        }
        Topic::Programming => {
            let opener = if length > 50 {
                "Entendo sua questão técnica."
            } else {
                "Vou te orientar!"
            };
            format!(
                "Sobre programação e desenvolvimento:\n\n\
                 {opener}\n\n\
                 Para um código limpo e eficiente, recomendo:\n\
                 - Seguir princípios SOLID\n\
                 - Escrever testes unitários\n\
                 - Documentar funções complexas\n\
                 - Manter funções pequenas e focadas\n\n\
                 Precisa de ajuda com desenvolvimento? A Nuvra pode criar a solução ideal! 🚀"
            )
        }
        Topic::Conversion => {
            let goal = if message.to_lowercase().contains("engajamento") {
                "engajamento"
            } else {
                "conversão"
            };
            let remark = if length > 30 {
                "Sua questão é bem específica!"
            } else {
                ""
            };
            format!(
                "Para melhorar {goal}:\n\n\
                 Analise os elementos que você mencionou. {remark}\n\n\
                 Estratégias comprovadas:\n\
                 - Use storytelling para conectar emocionalmente\n\
                 - Adicione CTAs claros e diretos\n\
                 - Implemente prova social (depoimentos, números)\n\
                 - Crie senso de urgência quando apropriado\n\n\
                 Quer implementar isso profissionalmente? Fale com a Nuvra! 🚀"
            )
        }
        Topic::Help => {
            let remark = if message.contains('?') {
                "Vou responder sua pergunta."
            } else {
                ""
            };
            format!(
                "Entendo que você precisa de orientação! {remark}\n\n\
                 Baseado no que você mencionou, posso ajudar com:\n\
                 - Análise e otimização de textos de marketing\n\
                 - Revisão e melhoria de código\n\
                 - Estratégias de conversão e engajamento\n\
                 - Consultoria técnica e estratégica\n\n\
                 A Nuvra tem expertise em todas essas áreas. Vamos conversar? 🚀"
            )
        }
        Topic::General => {
            let remark = if length > 40 {
                "Vejo que você compartilhou bastante contexto."
            } else {
                ""
            };
            format!(
                "Obrigado por sua mensagem! {remark}\n\n\
                 Posso ajudar você com:\n\
                 - Marketing digital e copywriting\n\
                 - Desenvolvimento de software\n\
                 - Estratégias de crescimento\n\
                 - Otimização de processos\n\n\
                 Cada projeto é único. Quer que a Nuvra desenvolva uma solução personalizada para você? 🚀"
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_question() {
        let message = "Como melhorar minha conversão?";
        assert_eq!(message.chars().count(), 30);
        assert_eq!(Topic::classify(message), Topic::Conversion);

        let reply = respond(message);
        assert!(reply.starts_with("Para melhorar conversão:\n\nAnalise os elementos que você mencionou. \n\n"));
        assert!(!reply.contains("Sua questão é bem específica!"));
    }

    #[test]
    fn test_engagement_wins_over_conversion_wording() {
        let reply = respond("Quero mais engajamento e conversão nas minhas campanhas");
        assert!(reply.starts_with("Para melhorar engajamento:"));
        assert!(reply.contains("Sua questão é bem específica!"));
    }

    #[test]
    fn test_marketing_first() {
        assert_eq!(
            Topic::classify("Como melhorar vendas com código?"),
            Topic::Marketing
        );
        assert!(respond("dicas de marketing").contains("Vou te ajudar com isso!"));
    }

    #[test]
    fn test_programming_long_message() {
        let reply = respond("Minha função em Rust está lenta quando processa listas enormes");
        assert!(reply.starts_with("Sobre programação e desenvolvimento:\n\nEntendo sua questão técnica."));
    }

    #[test]
    fn test_help_with_and_without_question_mark() {
        assert!(respond("preciso de ajuda").starts_with("Entendo que você precisa de orientação! \n\n"));
        assert!(respond("O que vocês fazem?").contains("Vou responder sua pergunta."));
    }

    #[test]
    fn test_general_reply() {
        let reply = respond("Bom dia");
        assert_eq!(Topic::classify("Bom dia"), Topic::General);
        assert!(reply.starts_with("Obrigado por sua mensagem! \n\nPosso ajudar você com:"));
    }

    #[test]
    fn test_uppercase_keywords_match() {
        assert_eq!(Topic::classify("CÓDIGO quebrado"), Topic::Programming);
    }
}
