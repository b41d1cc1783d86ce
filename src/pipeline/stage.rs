use async_trait::async_trait;

use crate::llm::LanguageModel;
use crate::pipeline::context::ResearchContext;
use crate::types::{ResearchState, StageOutput, StateField};

/// 调研阶段
///
/// 每个阶段声明自己依赖的字段和产出的字段，由编排器负责校验和写入。
/// 阶段本身不修改状态，也不返回错误：失败时产出对应字段的空值。
#[async_trait]
pub trait ResearchStage<M: LanguageModel>: Send + Sync {
    /// 阶段名称，用于日志
    fn name(&self) -> &'static str;

    /// 运行前必须已产出的字段
    fn required_fields(&self) -> &'static [StateField];

    /// 本阶段产出的字段
    fn produced_field(&self) -> StateField;

    async fn run(&self, context: &ResearchContext<M>, state: &ResearchState) -> StageOutput;
}
