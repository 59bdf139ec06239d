use std::fmt;
use std::str::FromStr;

/// Language of the prompts, placeholders and digest chrome.
///
/// The articles themselves may be fetched in several languages; the locale
/// only decides which text table the pipeline speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }

    /// Locale matching a NewsAPI language tag, if we have a text table for it.
    pub fn from_language(language: &str) -> Option<Self> {
        match language.trim().to_lowercase().as_str() {
            "en" => Some(Locale::En),
            "fr" => Some(Locale::Fr),
            _ => None,
        }
    }

    pub fn default_query(&self) -> &'static str {
        match self {
            Locale::En => {
                r#"("artificial intelligence" OR "AI" OR "machine learning" OR "deep learning" OR "GPT" OR "ChatGPT" OR "OpenAI" OR "Google AI" OR "Meta AI" OR "Microsoft AI" OR "robots" OR "automation" OR "algorithms" OR "neural networks" OR "computer vision" OR "natural language processing" OR "NLP" OR "large language models" OR "LLM") AND NOT ("fire" OR "wildfire" OR "natural disaster" OR "weather" OR "climate" OR "environment" OR "pollution")"#
            }
            Locale::Fr => {
                r#"("intelligence artificielle" OR "IA" OR "AI" OR "machine learning" OR "apprentissage automatique" OR "deep learning" OR "apprentissage profond" OR "GPT" OR "ChatGPT" OR "OpenAI" OR "Google AI" OR "Meta AI" OR "Microsoft AI" OR "robots" OR "automatisation" OR "algorithmes" OR "neural networks" OR "réseaux neuronaux") AND NOT ("incendie" OR "feu" OR "catastrophe naturelle" OR "météo" OR "climat" OR "environnement" OR "pollution")"#
            }
        }
    }

    /// What the relevance gate asks the model to look for.
    pub fn default_topic(&self) -> &'static str {
        match self {
            Locale::En => "artificial intelligence (AI), machine learning, robots, automation, or AI-related technologies",
            Locale::Fr => "l'intelligence artificielle (IA), du machine learning, des robots, de l'automatisation, ou de technologies liées à l'IA",
        }
    }

    pub fn summary_prompt(&self, title: &str, url: &str, text: &str) -> String {
        match self {
            Locale::En => format!(
                "Summarize this article in 2-3 sentences maximum.\n\n\
                Article title: {}\n\
                URL: {}\n\n\
                Content to summarize:\n\
                {}\n\n\
                Summary:",
                title, url, text
            ),
            Locale::Fr => format!(
                "Résume cet article en 2-3 phrases maximum.\n\n\
                Titre de l'article : {}\n\
                URL : {}\n\n\
                Contenu à résumer :\n\
                {}\n\n\
                Résumé :",
                title, url, text
            ),
        }
    }

    pub fn relevance_prompt(&self, topic: &str, text: &str) -> String {
        let (yes, no) = (self.affirmative_token(), self.negative_token());
        match self {
            Locale::En => format!(
                "Analyze this text and determine if it deals with {}.\n\n\
                Text to analyze: \"{}\"\n\n\
                Answer only with \"{}\" if the article deals with this subject, or \"{}\" otherwise.",
                topic, text, yes, no
            ),
            Locale::Fr => format!(
                "Analyse ce texte et détermine s'il traite de {}.\n\n\
                Texte à analyser : \"{}\"\n\n\
                Réponds uniquement par \"{}\" si l'article traite de ce sujet, ou \"{}\" sinon.",
                topic, text, yes, no
            ),
        }
    }

    pub fn affirmative_token(&self) -> &'static str {
        match self {
            Locale::En => "YES",
            Locale::Fr => "OUI",
        }
    }

    pub fn negative_token(&self) -> &'static str {
        match self {
            Locale::En => "NO",
            Locale::Fr => "NON",
        }
    }

    pub fn content_unavailable(&self) -> &'static str {
        match self {
            Locale::En => "Article content not available",
            Locale::Fr => "Contenu de l'article non disponible",
        }
    }

    pub fn summary_unavailable(&self) -> &'static str {
        match self {
            Locale::En => "Summary not available",
            Locale::Fr => "Résumé non disponible",
        }
    }

    pub fn summary_failed(&self) -> &'static str {
        match self {
            Locale::En => "Error generating summary",
            Locale::Fr => "Erreur lors de la génération du résumé",
        }
    }

    pub fn digest_heading(&self) -> &'static str {
        match self {
            Locale::En => "Latest AI News",
            Locale::Fr => "Actualités IA",
        }
    }

    pub fn default_subject(&self) -> &'static str {
        match self {
            Locale::En => "Daily AI News - English",
            Locale::Fr => "Veille IA quotidienne - Français",
        }
    }

    pub(crate) fn date_format(&self) -> &'static str {
        match self {
            Locale::En => "%A, %-d %B %Y",
            Locale::Fr => "%d/%m/%Y",
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_language(s)
            .ok_or_else(|| anyhow::anyhow!("Unsupported locale: {}. Use 'en' or 'fr'", s))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
