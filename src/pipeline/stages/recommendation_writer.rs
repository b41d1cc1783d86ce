use async_trait::async_trait;

use crate::llm::LanguageModel;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::prompts;
use crate::pipeline::stage::ResearchStage;
use crate::types::{CompanyInfo, ResearchState, StageOutput, StateField};
use crate::utils::text::strip_reasoning;

/// 第三阶段：基于全部公司记录生成简短推荐
#[derive(Default)]
pub struct RecommendationWriter;

/// 把公司记录序列化为交给模型的JSON文本
pub fn company_data(companies: &[CompanyInfo]) -> String {
    serde_json::to_string(companies).unwrap_or_else(|_| "[]".to_string())
}

#[async_trait]
impl<M: LanguageModel> ResearchStage<M> for RecommendationWriter {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn required_fields(&self) -> &'static [StateField] {
        &[StateField::Companies]
    }

    fn produced_field(&self) -> StateField {
        StateField::Analysis
    }

    async fn run(&self, context: &ResearchContext<M>, state: &ResearchState) -> StageOutput {
        tracing::info!("Generating recommendations");

        let user_prompt =
            prompts::recommendations_user(&state.query, &company_data(state.companies()));

        let analysis = match context
            .model
            .complete(prompts::RECOMMENDATIONS_SYSTEM, &user_prompt)
            .await
        {
            Ok(response) => strip_reasoning(&response),
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation generation failed");
                String::new()
            }
        };

        StageOutput::Analysis(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_data_is_json_array() {
        let companies = vec![CompanyInfo::new("Flask", "micro", "https://flask.palletsprojects.com")];
        let data = company_data(&companies);

        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value[0]["name"], "Flask");
        assert_eq!(value[0]["pricing_model"], "Unknown");
        assert_eq!(company_data(&[]), "[]");
    }
}
