use async_trait::async_trait;

use crate::crawl::CrawlService;
use crate::llm::LanguageModel;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::stage::ResearchStage;
use crate::types::{CompanyInfo, ResearchState, StageOutput, StateField};

/// 回退检索结果没有标题时使用的名称
pub const UNKNOWN_NAME: &str = "Unknown";

/// 第二阶段：对候选工具逐一检索官网、抓取并做结构化分析
#[derive(Default)]
pub struct CompanyResearcher;

/// 构造检索官网的查询
pub fn official_site_query(name: &str) -> String {
    format!("{} official site", name)
}

impl CompanyResearcher {
    /// 确定候选名单：优先使用抽取结果，为空时回退到直接检索原始查询并取结果标题
    pub async fn candidate_names(
        &self,
        crawler: &dyn CrawlService,
        query: &str,
        extracted_tools: &[String],
        fallback_limit: usize,
        candidate_limit: usize,
    ) -> Vec<String> {
        let names: Vec<String> = if extracted_tools.is_empty() {
            tracing::info!("No extracted tools, falling back to direct search");
            crawler
                .search(query, fallback_limit)
                .await
                .into_iter()
                .map(|hit| {
                    hit.title
                        .filter(|title| !title.trim().is_empty())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
                })
                .collect()
        } else {
            extracted_tools.to_vec()
        };

        names.into_iter().take(candidate_limit).collect()
    }

    async fn research_company<M: LanguageModel>(
        &self,
        context: &ResearchContext<M>,
        name: &str,
    ) -> Option<CompanyInfo> {
        let hits = context
            .crawler
            .search(
                &official_site_query(name),
                context.config.official_site_result_limit,
            )
            .await;

        let Some(hit) = hits.into_iter().next() else {
            tracing::debug!(company = name, "No official site found, skipping");
            return None;
        };

        let mut company = CompanyInfo::new(name, hit.markdown.unwrap_or_default(), hit.url);

        let Some(page) = context.crawler.scrape(&company.website).await else {
            tracing::debug!(company = name, url = %company.website, "Official site could not be scraped, skipping");
            return None;
        };

        match context
            .analyzer
            .analyze(context.model.as_ref(), name, &page.markdown)
            .await
        {
            Ok(analysis) => company.apply_analysis(analysis),
            Err(e) => {
                tracing::warn!(company = name, error = %e, "Company analysis failed");
                company.apply_analysis_failure(e.to_string());
            }
        }

        Some(company)
    }
}

#[async_trait]
impl<M: LanguageModel> ResearchStage<M> for CompanyResearcher {
    fn name(&self) -> &'static str {
        "research"
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[StateField::ExtractedTools]
    }

    fn produced_field(&self) -> StateField {
        StateField::Companies
    }

    async fn run(&self, context: &ResearchContext<M>, state: &ResearchState) -> StageOutput {
        let config = &context.config;
        let names = self
            .candidate_names(
                context.crawler.as_ref(),
                &state.query,
                state.extracted_tools(),
                config.fallback_result_limit,
                config.candidate_limit,
            )
            .await;

        tracing::info!(
            candidates = %names.join(", "),
            "Researching specific tools"
        );

        let mut companies = Vec::with_capacity(names.len());
        for name in &names {
            if let Some(company) = self.research_company(context, name).await {
                companies.push(company);
            }
        }

        StageOutput::Companies(companies)
    }
}
