pub mod company_researcher;
pub mod recommendation_writer;
pub mod tool_extractor;

pub use company_researcher::CompanyResearcher;
pub use recommendation_writer::RecommendationWriter;
pub use tool_extractor::ToolExtractor;
