// Public modules
pub mod completion;
pub mod config;
pub mod curation;
pub mod digest;
pub mod locale;
pub mod mailer;
pub mod models;
pub mod newsapi;
pub mod pipeline;
pub mod relevance;
pub mod summarizer;

// Re-export commonly used types
pub use completion::{CompletionClient, CompletionParams, OpenAiClient};
pub use config::{Config, SmtpConfig};
pub use curation::{dedupe, is_usable};
pub use digest::DigestComposer;
pub use locale::Locale;
pub use mailer::{Envelope, Mailer, PreviewMailer, SmtpMailer};
pub use models::{ArticleRecord, CurationReport, DigestOutcome, Summary};
pub use newsapi::{ArticleSource, NewsApiClient};
pub use pipeline::{Digest, Pipeline, PipelineSettings};
pub use relevance::RelevanceClassifier;
pub use summarizer::Summarizer;
