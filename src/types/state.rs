use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::company::CompanyInfo;

/// 调研状态中可由阶段产出的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    ExtractedTools,
    Companies,
    Analysis,
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateField::ExtractedTools => write!(f, "extracted_tools"),
            StateField::Companies => write!(f, "companies"),
            StateField::Analysis => write!(f, "analysis"),
        }
    }
}

/// 单个阶段的产出
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    ExtractedTools(Vec<String>),
    Companies(Vec<CompanyInfo>),
    Analysis(String),
}

impl StageOutput {
    pub fn field(&self) -> StateField {
        match self {
            StageOutput::ExtractedTools(_) => StateField::ExtractedTools,
            StageOutput::Companies(_) => StateField::Companies,
            StageOutput::Analysis(_) => StateField::Analysis,
        }
    }

    /// 对应字段的空默认值
    pub fn empty(field: StateField) -> Self {
        match field {
            StateField::ExtractedTools => StageOutput::ExtractedTools(Vec::new()),
            StateField::Companies => StageOutput::Companies(Vec::new()),
            StateField::Analysis => StageOutput::Analysis(String::new()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("field `{0}` has already been produced")]
    AlreadyProduced(StateField),
}

/// 贯穿整个调研流程的状态，每个字段只允许写入一次
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchState {
    pub run_id: Uuid,
    pub query: String,
    extracted_tools: Option<Vec<String>>,
    companies: Option<Vec<CompanyInfo>>,
    analysis: Option<String>,
}

impl ResearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            query: query.into(),
            extracted_tools: None,
            companies: None,
            analysis: None,
        }
    }

    pub fn extracted_tools(&self) -> &[String] {
        self.extracted_tools.as_deref().unwrap_or_default()
    }

    pub fn companies(&self) -> &[CompanyInfo] {
        self.companies.as_deref().unwrap_or_default()
    }

    pub fn analysis(&self) -> &str {
        self.analysis.as_deref().unwrap_or_default()
    }

    /// 字段是否已由对应阶段产出
    pub fn has(&self, field: StateField) -> bool {
        match field {
            StateField::ExtractedTools => self.extracted_tools.is_some(),
            StateField::Companies => self.companies.is_some(),
            StateField::Analysis => self.analysis.is_some(),
        }
    }

    /// 写入阶段产出，拒绝覆盖已有字段
    pub fn apply(&mut self, output: StageOutput) -> Result<(), StateError> {
        let field = output.field();
        if self.has(field) {
            return Err(StateError::AlreadyProduced(field));
        }
        match output {
            StageOutput::ExtractedTools(tools) => self.extracted_tools = Some(tools),
            StageOutput::Companies(companies) => self.companies = Some(companies),
            StageOutput::Analysis(analysis) => self.analysis = Some(analysis),
        }
        Ok(())
    }
}
