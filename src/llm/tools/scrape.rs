//! 网页抓取工具

use rig::tool::Tool;
use serde::Deserialize;
use std::sync::Arc;

use crate::crawl::{CrawlService, ScrapedPage};
use crate::llm::tools::CrawlToolError;

/// 抓取工具
#[derive(Clone)]
pub struct AgentToolScrape {
    crawler: Arc<dyn CrawlService>,
}

/// 抓取参数
#[derive(Debug, Deserialize)]
pub struct ScrapeArgs {
    pub url: String,
}

impl AgentToolScrape {
    pub fn new(crawler: Arc<dyn CrawlService>) -> Self {
        Self { crawler }
    }
}

impl Tool for AgentToolScrape {
    const NAME: &'static str = "firecrawl_scrape";

    type Error = CrawlToolError;
    type Args = ScrapeArgs;
    type Output = ScrapedPage;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Scrape a single web page and return its content as markdown.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "Absolute http(s) URL of the page to scrape"
                    }
                },
                "required": ["url"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        tracing::info!(url = %args.url, "tool called: {}", Self::NAME);

        self.crawler
            .scrape(&args.url)
            .await
            .ok_or(CrawlToolError::ScrapeFailed(args.url))
    }
}
