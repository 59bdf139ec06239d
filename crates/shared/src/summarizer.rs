use tracing::{debug, warn};

use crate::completion::{CompletionClient, CompletionParams};
use crate::locale::Locale;
use crate::models::Summary;

pub const DEFAULT_MIN_CHARS: usize = 10;

const SUMMARY_PARAMS: CompletionParams = CompletionParams {
    max_tokens: 150,
    temperature: 0.3,
};

/// Turns article text into a short caption. Never fails: every problem
/// becomes one of the placeholder variants of [`Summary`].
pub struct Summarizer<'a> {
    client: &'a dyn CompletionClient,
    locale: Locale,
    min_chars: usize,
}

impl<'a> Summarizer<'a> {
    pub fn new(client: &'a dyn CompletionClient, locale: Locale) -> Self {
        Self {
            client,
            locale,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub async fn summarize(&self, text: &str, title: &str, url: &str) -> Summary {
        let text = text.trim();
        if text.is_empty() || text.chars().count() < self.min_chars {
            debug!(url, "Text too short to summarize");
            return Summary::ContentUnavailable;
        }

        let prompt = self.locale.summary_prompt(title, url, text);

        match self.client.complete(&prompt, SUMMARY_PARAMS).await {
            Ok(Some(answer)) if !answer.trim().is_empty() => {
                Summary::Generated(answer.trim().to_string())
            }
            Ok(_) => Summary::Unavailable,
            Err(e) => {
                warn!(url, error = %e, "Failed to summarize");
                Summary::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail,
    }

    struct ScriptedClient {
        reply: Reply,
        prompts: Mutex<Vec<(String, CompletionParams)>>,
    }

    impl ScriptedClient {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, prompt: &str, params: CompletionParams) -> Result<Option<String>> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), params));
            match self.reply {
                Reply::Text(text) => Ok(Some(text.to_string())),
                Reply::Empty => Ok(None),
                Reply::Fail => anyhow::bail!("connection reset"),
            }
        }
    }

    const TEXT: &str = "A long enough article body about neural networks.";

    #[tokio::test]
    async fn test_empty_text_skips_model() {
        let client = ScriptedClient::new(Reply::Text("unused"));
        let summarizer = Summarizer::new(&client, Locale::En);

        assert_eq!(
            summarizer.summarize("", "T", "u").await,
            Summary::ContentUnavailable
        );
        assert_eq!(
            summarizer.summarize("   ", "T", "u").await,
            Summary::ContentUnavailable
        );
        assert_eq!(
            summarizer.summarize("short", "T", "u").await,
            Summary::ContentUnavailable
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_text_counts_characters_after_trim() {
        let client = ScriptedClient::new(Reply::Text("ok"));
        let summarizer = Summarizer::new(&client, Locale::En);

        // nine chars padded with spaces is still too short
        let summary = summarizer.summarize("   123456789   ", "T", "u").await;
        assert_eq!(summary, Summary::ContentUnavailable);

        let summary = summarizer.summarize("1234567890", "T", "u").await;
        assert_eq!(summary, Summary::Generated("ok".to_string()));
    }

    #[tokio::test]
    async fn test_generated_summary_is_trimmed() {
        let client = ScriptedClient::new(Reply::Text("\n  A short caption.  \n"));
        let summarizer = Summarizer::new(&client, Locale::En);

        let summary = summarizer
            .summarize(TEXT, "Title", "https://a.example")
            .await;
        assert_eq!(summary, Summary::Generated("A short caption.".to_string()));

        let prompts = client.prompts.lock().unwrap();
        let (prompt, params) = &prompts[0];
        assert!(prompt.contains("Article title: Title"));
        assert!(prompt.contains("URL: https://a.example"));
        assert!(prompt.contains(TEXT));
        assert_eq!(params.max_tokens, 150);
        assert_eq!(params.temperature, 0.3);
    }

    #[tokio::test]
    async fn test_empty_payload() {
        let client = ScriptedClient::new(Reply::Empty);
        let summarizer = Summarizer::new(&client, Locale::En);
        assert_eq!(
            summarizer.summarize(TEXT, "T", "u").await,
            Summary::Unavailable
        );

        let client = ScriptedClient::new(Reply::Text("   "));
        let summarizer = Summarizer::new(&client, Locale::En);
        assert_eq!(
            summarizer.summarize(TEXT, "T", "u").await,
            Summary::Unavailable
        );
    }

    #[tokio::test]
    async fn test_failure_is_absorbed() {
        let client = ScriptedClient::new(Reply::Fail);
        let summarizer = Summarizer::new(&client, Locale::Fr);

        let summary = summarizer.summarize(TEXT, "T", "u").await;
        assert_eq!(summary, Summary::Failed("connection reset".to_string()));
        assert_eq!(
            summary.display_text(Locale::Fr),
            "Erreur lors de la génération du résumé"
        );
    }

    #[tokio::test]
    async fn test_custom_min_chars() {
        let client = ScriptedClient::new(Reply::Text("ok"));
        let summarizer = Summarizer::new(&client, Locale::En).with_min_chars(3);
        assert_eq!(
            summarizer.summarize("abcd", "T", "u").await,
            Summary::Generated("ok".to_string())
        );
    }
}
