//! 开发者工具调研流程：extract_tools → research → analyze

pub mod analyzer;
pub mod context;
pub mod orchestrator;
pub mod outlet;
pub mod prompts;
pub mod stage;
pub mod stages;
pub mod workflow;

pub use analyzer::{AnalysisError, CompanyAnalyzer};
pub use context::ResearchContext;
pub use outlet::ReportFormat;
pub use workflow::{Workflow, launch};
