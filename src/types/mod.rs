pub mod company;
pub mod state;

pub use company::{AnalysisStatus, CompanyAnalysis, CompanyInfo};
pub use state::{ResearchState, StageOutput, StateError, StateField};
