//! 对话模式中暴露给Agent的工具

use thiserror::Error;

mod scrape;
mod search;

pub use scrape::{AgentToolScrape, ScrapeArgs};
pub use search::{AgentToolSearch, SearchArgs};

/// 搜索/抓取工具错误
#[derive(Debug, Error)]
pub enum CrawlToolError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not scrape {0}")]
    ScrapeFailed(String),
}
