use async_trait::async_trait;

use crate::crawl::CrawlService;
use crate::llm::LanguageModel;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::prompts;
use crate::pipeline::stage::ResearchStage;
use crate::types::{ResearchState, StageOutput, StateField};
use crate::utils::text::{strip_reasoning, truncate_chars};

const ARTICLE_SEPARATOR: &str = "\n\n";

/// 第一阶段：从对比类文章中抽取候选工具名称
#[derive(Default)]
pub struct ToolExtractor;

/// 构造检索对比文章的查询
pub fn article_query(query: &str) -> String {
    format!("{} tools comparison best alternatives", query)
}

/// 解析模型输出的工具列表：按行切分、去首尾空白、丢弃空行，不去重
pub fn parse_tool_names(response: &str) -> Vec<String> {
    strip_reasoning(response)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl ToolExtractor {
    /// 检索并抓取文章，每篇截断到固定字符数后拼接
    pub async fn collect_article_context(
        &self,
        crawler: &dyn CrawlService,
        query: &str,
        article_limit: usize,
        char_budget: usize,
    ) -> String {
        let hits = crawler.search(&article_query(query), article_limit).await;
        tracing::info!(articles = hits.len(), "Found comparison articles");

        let mut all_content = String::new();
        for hit in hits.iter().take(article_limit) {
            if let Some(page) = crawler.scrape(&hit.url).await {
                all_content.push_str(truncate_chars(&page.markdown, char_budget));
                all_content.push_str(ARTICLE_SEPARATOR);
            }
        }
        all_content
    }
}

#[async_trait]
impl<M: LanguageModel> ResearchStage<M> for ToolExtractor {
    fn name(&self) -> &'static str {
        "extract_tools"
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[]
    }

    fn produced_field(&self) -> StateField {
        StateField::ExtractedTools
    }

    async fn run(&self, context: &ResearchContext<M>, state: &ResearchState) -> StageOutput {
        tracing::info!(query = %state.query, "Finding articles");

        let config = &context.config;
        let all_content = self
            .collect_article_context(
                context.crawler.as_ref(),
                &state.query,
                config.article_limit,
                config.article_char_budget,
            )
            .await;

        let user_prompt = prompts::tool_extraction_user(&state.query, &all_content);
        let tool_names = match context
            .model
            .complete(prompts::TOOL_EXTRACTION_SYSTEM, &user_prompt)
            .await
        {
            Ok(response) => parse_tool_names(&response),
            Err(e) => {
                tracing::warn!(error = %e, "Tool extraction failed, continuing with no candidates");
                Vec::new()
            }
        };

        tracing::info!(
            tools = %tool_names.iter().take(5).cloned().collect::<Vec<_>>().join(", "),
            "Extracted tools"
        );
        StageOutput::ExtractedTools(tool_names)
    }
}
