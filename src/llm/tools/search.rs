//! 网页搜索工具

use rig::tool::Tool;
use serde::Deserialize;
use std::sync::Arc;

use crate::crawl::{CrawlService, SearchHit};
use crate::llm::tools::CrawlToolError;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 10;

/// 搜索工具
#[derive(Clone)]
pub struct AgentToolSearch {
    crawler: Arc<dyn CrawlService>,
}

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    pub limit: Option<usize>,
}

impl AgentToolSearch {
    pub fn new(crawler: Arc<dyn CrawlService>) -> Self {
        Self { crawler }
    }
}

impl Tool for AgentToolSearch {
    const NAME: &'static str = "firecrawl_search";

    type Error = CrawlToolError;
    type Args = SearchArgs;
    type Output = Vec<SearchHit>;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search the web and return result URLs, titles, descriptions and the markdown content of each result page.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results (default 5, at most 10)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        tracing::info!(query = %args.query, "tool called: {}", Self::NAME);

        if args.query.trim().is_empty() {
            return Err(CrawlToolError::InvalidArgument("query must not be empty".to_string()));
        }
        let limit = args.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Ok(self.crawler.search(&args.query, limit).await)
    }
}
