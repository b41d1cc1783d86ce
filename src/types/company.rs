use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 默认的定价模式
pub const UNKNOWN_PRICING: &str = "Unknown";

/// 结构化分析失败时写入描述字段的哨兵值
pub const ANALYSIS_FAILED_DESCRIPTION: &str = "Analysis failed";

/// 结构化抽取的目标Schema，对应CompanyInfo中由分析得出的字段
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct CompanyAnalysis {
    /// One of "Free", "Freemium", "Paid", "Enterprise" or "Unknown"
    pub pricing_model: String,
    /// true if open source, false if proprietary, null if unclear
    pub is_open_source: Option<bool>,
    /// Programming languages, frameworks, databases, APIs or technologies supported or used
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// One-sentence description of what the tool does for developers
    pub description: String,
    /// true if a REST API, GraphQL API, SDK or other programmatic access is mentioned
    pub api_available: Option<bool>,
    /// Programming languages explicitly supported
    #[serde(default)]
    pub language_support: Vec<String>,
    /// Tools and platforms it integrates with
    #[serde(default)]
    pub integration_capabilities: Vec<String>,
}

impl CompanyAnalysis {
    /// 清理模型输出：空定价回落为Unknown，去掉列表中的空项
    pub fn normalized(mut self) -> Self {
        self.pricing_model = self.pricing_model.trim().to_string();
        if self.pricing_model.is_empty() {
            self.pricing_model = UNKNOWN_PRICING.to_string();
        }
        self.description = self.description.trim().to_string();
        for list in [
            &mut self.tech_stack,
            &mut self.language_support,
            &mut self.integration_capabilities,
        ] {
            list.retain(|item| !item.trim().is_empty());
            for item in list.iter_mut() {
                *item = item.trim().to_string();
            }
        }
        self
    }
}

/// 单个公司的分析状态
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// 仅有搜索结果，尚未分析
    #[default]
    Pending,
    /// 结构化分析成功（字段值本身仍可能是Unknown）
    Analyzed,
    /// 结构化分析失败，字段为哨兵值
    Failed { reason: String },
}

/// 一个被调研的开发者工具
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompanyInfo {
    pub name: String,
    pub description: String,
    pub website: String,
    pub pricing_model: String,
    pub is_open_source: Option<bool>,
    pub tech_stack: Vec<String>,
    /// 目前没有竞品发现逻辑，始终为空
    pub competitors: Vec<String>,
    pub api_available: Option<bool>,
    pub language_support: Vec<String>,
    pub integration_capabilities: Vec<String>,
    #[serde(default)]
    pub analysis_status: AnalysisStatus,
}

impl CompanyInfo {
    /// 基于官网搜索结果创建，分析字段保持默认值
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        website: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            website: website.into(),
            pricing_model: UNKNOWN_PRICING.to_string(),
            is_open_source: None,
            tech_stack: Vec::new(),
            competitors: Vec::new(),
            api_available: None,
            language_support: Vec::new(),
            integration_capabilities: Vec::new(),
            analysis_status: AnalysisStatus::Pending,
        }
    }

    /// 将分析结果合并到当前记录
    pub fn apply_analysis(&mut self, analysis: CompanyAnalysis) {
        self.pricing_model = analysis.pricing_model;
        self.is_open_source = analysis.is_open_source;
        self.tech_stack = analysis.tech_stack;
        self.description = analysis.description;
        self.api_available = analysis.api_available;
        self.language_support = analysis.language_support;
        self.integration_capabilities = analysis.integration_capabilities;
        self.analysis_status = AnalysisStatus::Analyzed;
    }

    /// 分析失败时写入哨兵值，并记录失败原因
    pub fn apply_analysis_failure(&mut self, reason: impl Into<String>) {
        self.pricing_model = UNKNOWN_PRICING.to_string();
        self.is_open_source = None;
        self.tech_stack.clear();
        self.description = ANALYSIS_FAILED_DESCRIPTION.to_string();
        self.api_available = None;
        self.language_support.clear();
        self.integration_capabilities.clear();
        self.analysis_status = AnalysisStatus::Failed {
            reason: reason.into(),
        };
    }

    pub fn analysis_failed(&self) -> bool {
        matches!(self.analysis_status, AnalysisStatus::Failed { .. })
    }
}
