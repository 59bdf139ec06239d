use anyhow::{Context, Result};
use std::env;

use crate::completion::DEFAULT_MODEL;

const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;

/// Credentials for the search and completion APIs.
#[derive(Debug, Clone)]
pub struct Config {
    pub newsapi_key: String,
    pub openai_key: String,
    pub openai_model: String,
    pub test_mode: bool,
}

/// Outgoing mail settings. Only needed when the digest is actually sent.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub sender: String,
    pub recipients: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        try_load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let newsapi_key = require(&lookup, &["NEWSAPI_KEY"], &mut missing);
        let openai_key = require(&lookup, &["OPENAI_KEY", "OPENAI_API_KEY"], &mut missing);
        report_missing(&missing)?;

        Ok(Self {
            newsapi_key,
            openai_key,
            openai_model: lookup("OPENAI_MODEL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            test_mode: lookup("TEST_MODE")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

impl SmtpConfig {
    pub fn from_env() -> Result<Self> {
        try_load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let user = require(&lookup, &["SMTP_USER", "GMAIL_USER"], &mut missing);
        let password = require(&lookup, &["SMTP_PASSWORD", "GMAIL_PASSWORD"], &mut missing);
        report_missing(&missing)?;

        let port = match lookup("SMTP_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("SMTP_PORT is not a valid port: {}", port))?,
            None => DEFAULT_SMTP_PORT,
        };

        let sender = lookup("SENDER")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| user.clone());

        let mut recipients = lookup("RECIPIENTS")
            .map(|list| parse_recipients(&list))
            .unwrap_or_default();
        if recipients.is_empty() {
            recipients.push(user.clone());
        }

        Ok(Self {
            server: lookup("SMTP_SERVER")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            port,
            user,
            password,
            sender,
            recipients,
        })
    }
}

/// Split a comma-separated address list, dropping blanks.
pub fn parse_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// First non-empty value among `keys`; records the primary key as missing otherwise.
fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    keys: &[&'static str],
    missing: &mut Vec<&'static str>,
) -> String {
    let found = keys
        .iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()));

    found.unwrap_or_else(|| {
        missing.push(keys[0]);
        String::new()
    })
}

fn report_missing(missing: &[&str]) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }
    anyhow::bail!(
        "Missing environment variables: {}\n\n\
        To fix this, set them in the environment or create ~/.config/news-digest/.env with:\n  \
        NEWSAPI_KEY=your_newsapi_key\n  \
        OPENAI_KEY=your_openai_key\n  \
        SMTP_USER=you@example.com\n  \
        SMTP_PASSWORD=your_smtp_password\n  \
        RECIPIENTS=a@example.com,b@example.com",
        missing.join(", ")
    )
}

fn try_load_dotenv() {
    // Try locations in order of preference:

    // 1. Current directory (for development)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // 2. ~/.config/news-digest/.env (standard config location)
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("news-digest").join(".env");
        if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
            return;
        }
    }

    // 3. ~/.env (home directory)
    if let Some(home_dir) = dirs::home_dir() {
        let home_path = home_dir.join(".env");
        if home_path.exists() {
            let _ = dotenvy::from_path(&home_path);
        }
    }

    // If none found, that's okay - environment variables might be set system-wide
}
