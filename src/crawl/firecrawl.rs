//! Firecrawl REST API客户端

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::FirecrawlConfig;
use crate::crawl::error::{FirecrawlError, Result};
use crate::crawl::{CrawlService, ScrapedPage, SearchHit};

const MARKDOWN_FORMAT: &str = "markdown";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    limit: usize,
    scrape_options: ScrapeOptions,
}

#[derive(Debug, Serialize)]
struct ScrapeOptions {
    formats: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PageMetadata {
    title: Option<String>,
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    url: String,
    title: Option<String>,
    description: Option<String>,
    markdown: Option<String>,
    #[serde(default)]
    metadata: PageMetadata,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    #[serde(default)]
    metadata: PageMetadata,
}

impl From<SearchItem> for SearchHit {
    fn from(item: SearchItem) -> Self {
        let title = item
            .title
            .filter(|t| !t.trim().is_empty())
            .or(item.metadata.title);
        let url = if item.url.is_empty() {
            item.metadata.source_url.unwrap_or_default()
        } else {
            item.url
        };
        SearchHit {
            url,
            title,
            description: item.description,
            markdown: item.markdown,
        }
    }
}

/// Firecrawl客户端
#[derive(Clone)]
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlClient {
    /// 根据配置创建客户端，API KEY缺失时直接失败
    pub fn new(config: &FirecrawlConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(FirecrawlError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 调用搜索接口，并要求同时返回每条结果的markdown
    pub async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let body = SearchRequest {
            query,
            limit,
            scrape_options: ScrapeOptions {
                formats: vec![MARKDOWN_FORMAT],
            },
        };

        tracing::debug!(query, limit, "Firecrawl search");
        let items: Vec<SearchItem> = self.post("v1/search", &body).await?;
        Ok(items.into_iter().take(limit).map(SearchHit::from).collect())
    }

    /// 调用抓取接口，返回页面markdown
    pub async fn try_scrape(&self, url: &str) -> Result<ScrapedPage> {
        let parsed = Url::parse(url).map_err(|e| FirecrawlError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FirecrawlError::InvalidUrl(url.to_string()));
        }

        let body = ScrapeRequest {
            url,
            formats: vec![MARKDOWN_FORMAT],
        };

        tracing::debug!(url, "Firecrawl scrape");
        let data: ScrapeData = self.post("v1/scrape", &body).await?;
        Ok(ScrapedPage {
            url: data.metadata.source_url.unwrap_or_else(|| url.to_string()),
            title: data.metadata.title,
            markdown: data.markdown.unwrap_or_default(),
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let api_resp: ApiResponse<T> = serde_json::from_str(&text)?;
        if !api_resp.success {
            return Err(FirecrawlError::Unsuccessful(
                api_resp.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        api_resp
            .data
            .ok_or_else(|| FirecrawlError::Parse("response has no `data` field".to_string()))
    }
}

#[async_trait]
impl CrawlService for FirecrawlClient {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        match self.try_search(query, limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(query, error = %e, "Search failed, continuing with no results");
                Vec::new()
            }
        }
    }

    async fn scrape(&self, url: &str) -> Option<ScrapedPage> {
        match self.try_scrape(url).await {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::warn!(url, error = %e, "Scrape failed, continuing without page");
                None
            }
        }
    }
}
