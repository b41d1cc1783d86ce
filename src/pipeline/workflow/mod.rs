use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::Instrument;

use crate::config::{Config, ResearchConfig};
use crate::crawl::{CrawlService, FirecrawlClient};
use crate::llm::{LLMClient, LanguageModel};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::orchestrator::ResearchOrchestrator;
use crate::pipeline::outlet::{self, ReportFormat};
use crate::types::ResearchState;

/// 调研工作流：持有共享依赖，每次调用run都从全新状态开始
pub struct Workflow<M: LanguageModel> {
    context: ResearchContext<M>,
}

impl<M: LanguageModel> Clone for Workflow<M> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<M: LanguageModel> Workflow<M> {
    pub fn new(crawler: Arc<dyn CrawlService>, model: Arc<M>, config: ResearchConfig) -> Self {
        Self {
            context: ResearchContext::new(crawler, model, config),
        }
    }

    /// 执行一次完整调研，总是返回最终状态
    pub async fn run(&self, query: &str) -> ResearchState {
        let mut state = ResearchState::new(query);
        let span = tracing::info_span!("research", run_id = %state.run_id);

        async {
            let started = Instant::now();
            ResearchOrchestrator
                .execute_research_pipeline(&self.context, &mut state)
                .await;
            tracing::info!(
                companies = state.companies().len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Research finished"
            );
        }
        .instrument(span)
        .await;

        state
    }
}

impl Workflow<LLMClient> {
    /// 基于配置构建真实的Firecrawl和大模型客户端
    pub fn from_config(config: &Config) -> Result<Self> {
        let crawler: Arc<dyn CrawlService> = Arc::new(FirecrawlClient::new(&config.firecrawl)?);
        let model = Arc::new(LLMClient::new(config.llm.clone())?);
        Ok(Self::new(crawler, model, config.research.clone()))
    }
}

/// 启动调研工作流
pub async fn launch(
    config: &Config,
    query: &str,
    output: Option<PathBuf>,
    format: ReportFormat,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        println!("⚠️ Please enter a query before running the research.");
        return Ok(());
    }

    let workflow = Workflow::from_config(config)?;

    println!("🔍 Researching developer tools for: {}", query);
    let state = workflow.run(query).await;
    println!(
        "✓ Research complete, {} companies analyzed",
        state.companies().len()
    );

    let report = format.render(&state)?;
    println!("\n{}", report);

    if let Some(path) = output {
        outlet::save(&path, &report).await?;
        println!("💾 Report saved to {}", path.display());
    }

    Ok(())
}
