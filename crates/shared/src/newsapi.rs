use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{non_blank, ArticleRecord};

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Where a batch gets its articles from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(
        &self,
        query: &str,
        language: &str,
        page_size: u32,
    ) -> Result<Vec<ArticleRecord>>;
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
    message: Option<String>,
    code: Option<String>,
}

impl RawArticle {
    fn into_record(self, language: &str) -> ArticleRecord {
        ArticleRecord {
            title: self.title.unwrap_or_default(),
            description: non_blank(self.description),
            content: non_blank(self.content),
            url: self.url.unwrap_or_default(),
            language: language.to_string(),
            published_at: self
                .published_at
                .and_then(|s| s.parse::<DateTime<Utc>>().ok()),
            source: self.source.and_then(|s| non_blank(s.name)),
        }
    }
}

/// Turn an `/v2/everything` body into records tagged with `language`.
fn parse_everything(body: &str, language: &str) -> Result<Vec<ArticleRecord>> {
    let response: EverythingResponse =
        serde_json::from_str(body).context("Failed to parse NewsAPI response")?;

    if response.status != "ok" {
        anyhow::bail!(
            "NewsAPI returned error: {} - {}",
            response.code.as_deref().unwrap_or("unknown"),
            response.message.as_deref().unwrap_or("no message")
        );
    }

    Ok(response
        .articles
        .into_iter()
        .map(|article| article.into_record(language))
        .collect())
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("news-digest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn everything_url(&self, query: &str, language: &str, page_size: u32) -> String {
        format!(
            "{}/v2/everything?q={}&language={}&pageSize={}&sortBy=publishedAt",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(language),
            page_size
        )
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn fetch(
        &self,
        query: &str,
        language: &str,
        page_size: u32,
    ) -> Result<Vec<ArticleRecord>> {
        let url = self.everything_url(query, language, page_size);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to fetch articles from NewsAPI")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read NewsAPI response body")?;

        if !status.is_success() {
            anyhow::bail!("NewsAPI returned error: {} - {}", status, body);
        }

        parse_everything(&body, language)
    }
}
