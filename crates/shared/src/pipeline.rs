use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::completion::CompletionClient;
use crate::curation::{dedupe, filter_usable};
use crate::digest::DigestComposer;
use crate::locale::Locale;
use crate::mailer::{Envelope, Mailer};
use crate::models::{ArticleRecord, CurationReport, DigestOutcome, Summary};
use crate::newsapi::ArticleSource;
use crate::relevance::RelevanceClassifier;
use crate::summarizer::{Summarizer, DEFAULT_MIN_CHARS};

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Everything one batch needs to know, injected by the caller.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub query: String,
    /// Fetched in this order; each tag is one search call.
    pub languages: Vec<String>,
    pub page_size: u32,
    pub locale: Locale,
    pub relevance_gate: bool,
    pub topic: String,
    pub min_summary_chars: usize,
    pub subject: String,
    /// Also write the composed HTML here.
    pub output: Option<PathBuf>,
}

impl PipelineSettings {
    pub fn for_locale(locale: Locale) -> Self {
        Self {
            query: locale.default_query().to_string(),
            languages: vec![locale.tag().to_string()],
            page_size: DEFAULT_PAGE_SIZE,
            locale,
            relevance_gate: true,
            topic: locale.default_topic().to_string(),
            min_summary_chars: DEFAULT_MIN_CHARS,
            subject: locale.default_subject().to_string(),
            output: None,
        }
    }
}

/// A composed digest that has not been delivered yet.
#[derive(Debug, Clone)]
pub struct Digest {
    pub html: String,
    pub text: String,
    pub articles: usize,
}

pub struct Pipeline<'a> {
    source: &'a dyn ArticleSource,
    completion: &'a dyn CompletionClient,
    settings: PipelineSettings,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn ArticleSource,
        completion: &'a dyn CompletionClient,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            completion,
            settings,
        }
    }

    /// One search call per configured language, results concatenated in order.
    pub async fn fetch(&self) -> Result<Vec<ArticleRecord>> {
        let mut all_articles = Vec::new();

        for language in &self.settings.languages {
            let articles = self
                .source
                .fetch(&self.settings.query, language, self.settings.page_size)
                .await
                .with_context(|| format!("Failed to fetch articles for language {}", language))?;

            info!(language = %language, count = articles.len(), "Fetched articles");
            all_articles.extend(articles);
        }

        Ok(all_articles)
    }

    /// Quality filter, then deduplication, then the optional relevance gate.
    pub async fn curate(
        &self,
        records: Vec<ArticleRecord>,
    ) -> (Vec<ArticleRecord>, CurationReport) {
        let mut report = CurationReport {
            fetched: records.len(),
            ..Default::default()
        };

        let usable = filter_usable(records);
        report.usable = usable.len();

        let unique = dedupe(usable);
        report.unique = unique.len();

        let relevant = if self.settings.relevance_gate {
            RelevanceClassifier::new(self.completion, self.settings.locale, &self.settings.topic)
                .filter(unique)
                .await
        } else {
            debug!("Relevance gate disabled");
            unique
        };
        report.relevant = relevant.len();

        info!(
            fetched = report.fetched,
            usable = report.usable,
            unique = report.unique,
            relevant = report.relevant,
            "Curated batch"
        );

        (relevant, report)
    }

    /// Summaries for each record, one model call at a time, in order.
    pub async fn summarize_all(
        &self,
        records: Vec<ArticleRecord>,
    ) -> Vec<(ArticleRecord, Summary)> {
        let summarizer = Summarizer::new(self.completion, self.settings.locale)
            .with_min_chars(self.settings.min_summary_chars);

        let total = records.len();
        let mut pairs = Vec::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            let summary = summarizer
                .summarize(record.summary_source(), &record.title, &record.url)
                .await;
            debug!(
                index = index + 1,
                total,
                title = %record.title,
                generated = summary.is_generated(),
                "Summarized article"
            );
            pairs.push((record, summary));
        }

        pairs
    }

    /// Fetch, curate, summarize and compose. The digest is `None` when
    /// nothing survived curation.
    pub async fn build(&self, date: DateTime<Utc>) -> Result<(CurationReport, Option<Digest>)> {
        let fetched = self.fetch().await?;
        let (curated, report) = self.curate(fetched).await;

        if curated.is_empty() {
            info!(fetched = report.fetched, "No articles left after curation");
            return Ok((report, None));
        }

        let pairs = self.summarize_all(curated).await;
        let html = DigestComposer::compose(&pairs, self.settings.locale, date);
        let text = DigestComposer::to_plain_text(&html)?;

        Ok((
            report,
            Some(Digest {
                html,
                text,
                articles: pairs.len(),
            }),
        ))
    }

    /// Run one batch end to end and hand the digest to `mailer`.
    pub async fn run(
        &self,
        mailer: &dyn Mailer,
        sender: &str,
        recipients: &[String],
    ) -> Result<DigestOutcome> {
        let (report, digest) = self.build(Utc::now()).await?;
        let Some(digest) = digest else {
            return Ok(DigestOutcome::NothingToSend {
                fetched: report.fetched,
            });
        };

        if let Some(path) = &self.settings.output {
            fs::write(path, &digest.html)
                .with_context(|| format!("Failed to write digest to {}", path.display()))?;
            info!(path = %path.display(), "Digest written");
        }

        let envelope = Envelope {
            subject: self.settings.subject.clone(),
            html: digest.html,
            text: digest.text,
            sender: sender.to_string(),
            recipients: recipients.to_vec(),
        };
        mailer.send(&envelope).await?;

        Ok(DigestOutcome::Delivered {
            articles: digest.articles,
            recipients: recipients.len(),
        })
    }
}
