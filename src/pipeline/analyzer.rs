use thiserror::Error;

use crate::llm::LanguageModel;
use crate::pipeline::prompts;
use crate::types::CompanyAnalysis;
use crate::utils::text::truncate_chars;

/// 结构化分析失败的原因
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("page content is empty")]
    EmptyContent,

    #[error("model call failed: {0}")]
    Model(String),
}

/// 属性抽取器：把官网内容交给模型，约束输出为CompanyAnalysis
#[derive(Debug, Clone)]
pub struct CompanyAnalyzer {
    content_budget: usize,
}

impl CompanyAnalyzer {
    pub fn new(content_budget: usize) -> Self {
        Self { content_budget }
    }

    pub async fn analyze<M>(
        &self,
        model: &M,
        company_name: &str,
        content: &str,
    ) -> Result<CompanyAnalysis, AnalysisError>
    where
        M: LanguageModel,
    {
        if content.trim().is_empty() {
            return Err(AnalysisError::EmptyContent);
        }

        let user_prompt =
            prompts::tool_analysis_user(company_name, truncate_chars(content, self.content_budget));

        model
            .complete_structured::<CompanyAnalysis>(prompts::TOOL_ANALYSIS_SYSTEM, &user_prompt)
            .await
            .map(CompanyAnalysis::normalized)
            .map_err(|e| AnalysisError::Model(format!("{e:#}")))
    }
}
