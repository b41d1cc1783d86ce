use std::time::Instant;

use thiserror::Error;

use crate::llm::LanguageModel;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::stage::ResearchStage;
use crate::pipeline::stages::{CompanyResearcher, RecommendationWriter, ToolExtractor};
use crate::types::{ResearchState, StageOutput, StateError, StateField};

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("stage `{stage}` requires `{field}` which has not been produced")]
    MissingInput {
        stage: &'static str,
        field: StateField,
    },

    #[error("stage `{stage}` produced `{actual}` instead of `{expected}`")]
    UnexpectedOutput {
        stage: &'static str,
        expected: StateField,
        actual: StateField,
    },

    #[error(transparent)]
    State(#[from] StateError),
}

/// 调研编排器：按 extract_tools → research → analyze 的固定顺序执行阶段
#[derive(Default)]
pub struct ResearchOrchestrator;

impl ResearchOrchestrator {
    /// 执行完整流程，单个阶段出错时写入该阶段的空产出后继续
    pub async fn execute_research_pipeline<M: LanguageModel>(
        &self,
        context: &ResearchContext<M>,
        state: &mut ResearchState,
    ) {
        self.execute_stage_or_default(&ToolExtractor, context, state)
            .await;
        self.execute_stage_or_default(&CompanyResearcher, context, state)
            .await;
        self.execute_stage_or_default(&RecommendationWriter, context, state)
            .await;
    }

    async fn execute_stage_or_default<M, S>(
        &self,
        stage: &S,
        context: &ResearchContext<M>,
        state: &mut ResearchState,
    ) where
        M: LanguageModel,
        S: ResearchStage<M>,
    {
        if let Err(e) = self.execute_stage(stage, context, state).await {
            tracing::error!(stage = stage.name(), error = %e, "Stage failed");
            let field = stage.produced_field();
            if !state.has(field) {
                // 字段尚未写入，apply不会失败
                let _ = state.apply(StageOutput::empty(field));
            }
        }
    }

    /// 执行单个阶段：校验前置字段、运行、写入产出
    pub async fn execute_stage<M, S>(
        &self,
        stage: &S,
        context: &ResearchContext<M>,
        state: &mut ResearchState,
    ) -> Result<(), PipelineError>
    where
        M: LanguageModel,
        S: ResearchStage<M>,
    {
        for field in stage.required_fields() {
            if !state.has(*field) {
                return Err(PipelineError::MissingInput {
                    stage: stage.name(),
                    field: *field,
                });
            }
        }

        let started = Instant::now();
        let output = stage.run(context, state).await;

        let expected = stage.produced_field();
        if output.field() != expected {
            return Err(PipelineError::UnexpectedOutput {
                stage: stage.name(),
                expected,
                actual: output.field(),
            });
        }

        state.apply(output)?;
        tracing::info!(
            stage = stage.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage completed"
        );
        Ok(())
    }
}
