use chrono::{DateTime, Utc};

use crate::locale::Locale;

/// One news item, normalized at the fetch boundary.
///
/// Missing `title`/`url` are empty strings; blank `description`/`content`
/// are `None`. Nothing downstream mutates a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub language: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
}

impl ArticleRecord {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            content: None,
            url: url.into(),
            language: language.into(),
            published_at: None,
            source: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(Some(description.into()));
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = non_blank(Some(content.into()));
        self
    }

    /// Text handed to the summarizer: the description, else the content.
    pub fn summary_source(&self) -> &str {
        self.description
            .as_deref()
            .or(self.content.as_deref())
            .unwrap_or("")
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Caption attached to one curated record.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Generated(String),
    /// Input text was empty or too short to summarize.
    ContentUnavailable,
    /// The model answered with nothing.
    Unavailable,
    Failed(String),
}

impl Summary {
    /// Text shown in the digest, with placeholders from the locale.
    pub fn display_text(&self, locale: Locale) -> &str {
        match self {
            Summary::Generated(text) => text,
            Summary::ContentUnavailable => locale.content_unavailable(),
            Summary::Unavailable => locale.summary_unavailable(),
            Summary::Failed(_) => locale.summary_failed(),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Summary::Generated(_))
    }
}

/// How a batch ended when no collaborator failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestOutcome {
    Delivered {
        articles: usize,
        /// Addresses the digest went to.
        recipients: usize,
    },
    /// Nothing survived curation; delivery was skipped.
    NothingToSend { fetched: usize },
}

/// Record counts after each curation stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurationReport {
    pub fetched: usize,
    pub usable: usize,
    pub unique: usize,
    pub relevant: usize,
}
