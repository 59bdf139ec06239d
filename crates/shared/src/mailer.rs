use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::io::Write;
use std::sync::Mutex;
use tracing::info;

use crate::config::SmtpConfig;

/// A composed digest ready to go out.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub subject: String,
    pub html: String,
    pub text: String,
    pub sender: String,
    pub recipients: Vec<String>,
}

/// Delivers a composed digest.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, envelope: &Envelope) -> Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Implicit-TLS SMTP transport, as used on port 465.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let credentials = Credentials::new(config.user.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
            .with_context(|| format!("Failed to configure SMTP relay {}", config.server))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport })
    }
}

fn build_message(envelope: &Envelope) -> Result<Message> {
    if envelope.recipients.is_empty() {
        anyhow::bail!("No recipients configured");
    }

    let from: Mailbox = envelope
        .sender
        .parse()
        .with_context(|| format!("Invalid sender address: {}", envelope.sender))?;

    let mut builder = Message::builder().from(from).subject(&envelope.subject);
    for recipient in &envelope.recipients {
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", recipient))?;
        builder = builder.to(to);
    }

    let body = MultiPart::alternative_plain_html(envelope.text.clone(), envelope.html.clone());
    builder
        .multipart(body)
        .context("Failed to build email message")
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, envelope: &Envelope) -> Result<()> {
        let message = build_message(envelope)?;

        self.transport
            .send(message)
            .await
            .context("Failed to send email over SMTP")?;

        info!(
            recipients = envelope.recipients.len(),
            subject = %envelope.subject,
            "Digest sent"
        );
        Ok(())
    }
}

/// Writes the digest to a sink instead of sending it.
pub struct PreviewMailer<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> PreviewMailer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreviewMailer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait]
impl<W: Write + Send> Mailer for PreviewMailer<W> {
    async fn send(&self, envelope: &Envelope) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("Preview output lock poisoned"))?;

        let rule = "=".repeat(50);
        writeln!(out, "{}", rule)?;
        writeln!(out, "DRY RUN - {}", envelope.subject)?;
        writeln!(out, "From: {}", envelope.sender)?;
        writeln!(out, "To: {}", envelope.recipients.join(", "))?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "{}", envelope.html)?;
        writeln!(out, "{}", rule)?;
        out.flush()?;
        Ok(())
    }
}
