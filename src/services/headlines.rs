// src/services/headlines.rs
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::models::Headline;
use crate::BoxError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Outcome of a headline lookup. Unknown symbols and symbols without
/// recent news both come back as `NotFound`.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlineFetch {
    Found(Vec<Headline>),
    NotFound,
}

impl HeadlineFetch {
    /// Empty lists are always reported as `NotFound`.
    pub fn from_headlines(headlines: Vec<Headline>) -> Self {
        if headlines.is_empty() {
            HeadlineFetch::NotFound
        } else {
            HeadlineFetch::Found(headlines)
        }
    }

    pub fn found(&self) -> bool {
        matches!(self, HeadlineFetch::Found(_))
    }
}

#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch(&self, ticker: &str) -> Result<HeadlineFetch, BoxError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsItem {
    #[serde(default)]
    title: String,
    publisher: Option<String>,
    provider_publish_time: Option<i64>,
}

impl NewsItem {
    fn into_headline(self) -> Option<Headline> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let published_at: Option<DateTime<Utc>> = self
            .provider_publish_time
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
        Some(Headline {
            title: title.to_string(),
            publisher: self.publisher,
            published_at,
        })
    }
}

/// Recent headlines from the Yahoo Finance search endpoint.
pub struct YahooHeadlineSource {
    client: Client,
    base_url: String,
    news_count: usize,
}

impl YahooHeadlineSource {
    pub fn new(base_url: &str, news_count: usize, timeout: Duration) -> Result<Self, BoxError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(YahooHeadlineSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            news_count,
        })
    }
}

#[async_trait]
impl HeadlineSource for YahooHeadlineSource {
    async fn fetch(&self, ticker: &str) -> Result<HeadlineFetch, BoxError> {
        let url = format!("{}/v1/finance/search", self.base_url);
        info!("Fetching headlines for {} from {}", ticker, url);

        let news_count = self.news_count.to_string();
        let response: SearchResponse = self
            .client
            .get(&url)
            .query(&[
                ("q", ticker),
                ("quotesCount", "0"),
                ("newsCount", news_count.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let headlines: Vec<Headline> = response
            .news
            .into_iter()
            .filter_map(NewsItem::into_headline)
            .collect();

        if headlines.is_empty() {
            warn!("No news data found for ticker: {}", ticker);
        } else {
            debug!("Found {} headlines for {}", headlines.len(), ticker);
        }
        Ok(HeadlineFetch::from_headlines(headlines))
    }
}
