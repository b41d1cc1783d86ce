//! LLM客户端 - 基于rig提供LanguageModel与ChatBackend实现

use anyhow::Result;
use async_trait::async_trait;
use rig::completion::PromptError;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::crawl::CrawlService;
use crate::llm::tools::{AgentToolScrape, AgentToolSearch};
use crate::llm::{ChatBackend, LanguageModel};

mod providers;

use providers::{ProviderAgent, ProviderClient};

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端，API KEY不在本地校验
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// 通用重试逻辑，retry_attempts为1时只调用一次
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_attempts = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut attempts = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt = attempts,
                        max_attempts,
                        error = %err,
                        "Model call failed, retrying"
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 构建对话模式使用的工具型Agent
    pub fn tool_agent(
        &self,
        system_prompt: &str,
        crawler: Arc<dyn CrawlService>,
        max_turns: usize,
    ) -> ToolAgent {
        let search = AgentToolSearch::new(crawler.clone());
        let scrape = AgentToolScrape::new(crawler);
        let agent = self.client.create_agent_with_tools(
            &self.config.chat_model,
            system_prompt,
            &self.config,
            &search,
            &scrape,
        );
        ToolAgent {
            agent,
            max_turns,
            tool_names: vec![
                <AgentToolSearch as Tool>::NAME.to_string(),
                <AgentToolScrape as Tool>::NAME.to_string(),
            ],
        }
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let agent = self
            .client
            .create_agent(&self.config.model, system_prompt, &self.config);

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }

    async fn complete_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor =
            self.client
                .create_extractor::<T>(&self.config.model, system_prompt, &self.config);

        self.retry_with_backoff(|| async { extractor.extract(user_prompt).await })
            .await
    }
}

/// 挂载了搜索/抓取工具的对话Agent
pub struct ToolAgent {
    agent: ProviderAgent,
    max_turns: usize,
    tool_names: Vec<String>,
}

#[async_trait]
impl ChatBackend for ToolAgent {
    fn tool_names(&self) -> Vec<String> {
        self.tool_names.clone()
    }

    async fn respond(&self, prompt: &str) -> Result<String> {
        match self.agent.multi_turn(prompt, self.max_turns).await {
            Ok(response) => Ok(response),
            Err(PromptError::MaxDepthError { max_depth, .. }) => Err(anyhow::anyhow!(
                "agent stopped after reaching the maximum of {} tool-call turns",
                max_depth
            )),
            Err(e) => Err(e.into()),
        }
    }
}
