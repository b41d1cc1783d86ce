//! 搜索/抓取服务 - 对外部搜索与网页抓取能力的统一抽象

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod firecrawl;

pub use error::FirecrawlError;
pub use firecrawl::FirecrawlClient;

/// 一条搜索结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// 服务商随搜索结果一并返回的页面markdown
    pub markdown: Option<String>,
}

/// 一次抓取得到的页面
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: Option<String>,
    pub markdown: String,
}

/// 搜索/抓取能力
///
/// 实现方负责吞掉服务商错误：失败时记录日志并返回空列表或`None`，
/// 调用方永远不会看到错误。
#[async_trait]
pub trait CrawlService: Send + Sync {
    /// 按服务商排序返回不超过`limit`条结果
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit>;

    /// 抓取单个URL并返回markdown内容
    async fn scrape(&self, url: &str) -> Option<ScrapedPage>;
}
