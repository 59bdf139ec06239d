use tracing::{debug, warn};

use crate::completion::{CompletionClient, CompletionParams};
use crate::locale::Locale;
use crate::models::ArticleRecord;

const RELEVANCE_PARAMS: CompletionParams = CompletionParams {
    max_tokens: 10,
    temperature: 0.1,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Relevant,
    OffTopic,
    Unclear,
}

/// Asks the model whether a record is on topic.
///
/// Only an explicit negative answer rejects a record. Errors and answers
/// that are neither token keep it, so a model outage cannot empty a digest.
pub struct RelevanceClassifier<'a> {
    client: &'a dyn CompletionClient,
    locale: Locale,
    topic: String,
}

impl<'a> RelevanceClassifier<'a> {
    pub fn new(client: &'a dyn CompletionClient, locale: Locale, topic: &str) -> Self {
        Self {
            client,
            locale,
            topic: topic.to_string(),
        }
    }

    pub async fn is_relevant(&self, record: &ArticleRecord) -> bool {
        let text = format!(
            "{} {}",
            record.title,
            record.description.as_deref().unwrap_or("")
        );
        let prompt = self.locale.relevance_prompt(&self.topic, &text);

        match self.client.complete(&prompt, RELEVANCE_PARAMS).await {
            Ok(answer) => match self.verdict(answer.as_deref().unwrap_or("")) {
                Verdict::Relevant => true,
                Verdict::OffTopic => {
                    debug!(url = %record.url, "Rejected as off topic");
                    false
                }
                Verdict::Unclear => {
                    debug!(url = %record.url, answer = ?answer, "Unclear relevance answer, keeping record");
                    true
                }
            },
            Err(e) => {
                warn!(url = %record.url, error = %e, "Relevance check failed, keeping record");
                true
            }
        }
    }

    fn verdict(&self, answer: &str) -> Verdict {
        let answer = answer
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_punctuation())
            .trim_end()
            .to_uppercase();
        if answer == self.locale.affirmative_token() {
            Verdict::Relevant
        } else if answer == self.locale.negative_token() {
            Verdict::OffTopic
        } else {
            Verdict::Unclear
        }
    }

    /// Keep the relevant records, in order.
    pub async fn filter(&self, records: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
        let mut relevant = Vec::with_capacity(records.len());
        for record in records {
            if self.is_relevant(&record).await {
                relevant.push(record);
            }
        }
        relevant
    }
}
