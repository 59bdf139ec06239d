use anyhow::{Context, Result};
use clap::Parser;
use shared::pipeline::DEFAULT_PAGE_SIZE;
use shared::summarizer::DEFAULT_MIN_CHARS;
use shared::{
    Config, DigestOutcome, Locale, Mailer, NewsApiClient, OpenAiClient, Pipeline, PipelineSettings,
    PreviewMailer, SmtpConfig, SmtpMailer,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "send-digest")]
#[command(about = "Fetch recent news, summarize each article and email an HTML digest")]
struct Args {
    /// Language tags to fetch, in order (repeatable)
    #[arg(short, long = "language", default_value = "en")]
    languages: Vec<String>,

    /// Locale for prompts and digest text (en, fr); defaults to the first language
    #[arg(long)]
    locale: Option<Locale>,

    /// Search query; defaults to the locale's built-in AI query
    #[arg(short, long)]
    query: Option<String>,

    /// What the relevance check should look for
    #[arg(long)]
    topic: Option<String>,

    /// Articles requested per language
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Skip the model-based relevance check
    #[arg(long)]
    no_relevance: bool,

    /// Minimum characters of text needed to ask for a summary
    #[arg(long, default_value_t = DEFAULT_MIN_CHARS)]
    min_chars: usize,

    /// Email subject
    #[arg(short, long)]
    subject: Option<String>,

    /// Print the digest instead of sending it (also TEST_MODE=true)
    #[arg(long)]
    dry_run: bool,

    /// Also write the HTML digest to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> PipelineSettings {
        let locale = self.locale.unwrap_or_else(|| {
            self.languages
                .first()
                .and_then(|tag| Locale::from_language(tag))
                .unwrap_or_default()
        });

        let mut settings = PipelineSettings::for_locale(locale);
        settings.languages = self.languages.clone();
        settings.page_size = self.page_size;
        settings.relevance_gate = !self.no_relevance;
        settings.min_summary_chars = self.min_chars;
        settings.output = self.output.clone();
        if let Some(query) = &self.query {
            settings.query = query.clone();
        }
        if let Some(topic) = &self.topic {
            settings.topic = topic.clone();
        }
        if let Some(subject) = &self.subject {
            settings.subject = subject.clone();
        }
        settings
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = Config::from_env()?;
    let settings = args.settings();
    let dry_run = args.dry_run || config.test_mode;

    println!(
        "🚀 Starting {} digest ({})...",
        settings.locale,
        settings.languages.join(", ")
    );

    let source = NewsApiClient::new(config.newsapi_key)?;
    let completion = OpenAiClient::new(config.openai_key, config.openai_model)?;

    let (mailer, sender, recipients): (Box<dyn Mailer>, String, Vec<String>) = if dry_run {
        println!("🧪 Dry run: the digest will be printed, not sent");
        (
            Box::new(PreviewMailer::stdout()),
            "dry-run@localhost".to_string(),
            vec!["dry-run@localhost".to_string()],
        )
    } else {
        let smtp = SmtpConfig::from_env()?;
        let mailer = SmtpMailer::new(&smtp)?;
        (Box::new(mailer), smtp.sender, smtp.recipients)
    };

    let pipeline = Pipeline::new(&source, &completion, settings);
    let outcome = pipeline
        .run(mailer.as_ref(), &sender, &recipients)
        .await
        .context("Digest run failed")?;

    match outcome {
        DigestOutcome::Delivered {
            articles,
            recipients,
        } => {
            if dry_run {
                println!("✅ Digest with {} articles generated", articles);
            } else {
                println!(
                    "✅ Digest with {} articles sent to {} recipient(s)",
                    articles, recipients
                );
            }
        }
        DigestOutcome::NothingToSend { fetched } => {
            println!(
                "❌ No valid articles found ({} fetched); nothing to send",
                fetched
            );
        }
    }

    Ok(())
}
