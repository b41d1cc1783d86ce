//! 大模型能力抽象与rig实现

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod tools;

pub use client::{LLMClient, ToolAgent};

/// 调研流程依赖的大模型能力
///
/// 流程只依赖这两个方法，具体走哪家服务商由实现决定。
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 单轮文本补全
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// 约束输出为`T`对应的JSON Schema并反序列化
    async fn complete_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static;
}

/// 对话模式下可调用工具的智能体
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// 可用工具名称，启动时展示给用户
    fn tool_names(&self) -> Vec<String>;

    async fn respond(&self, prompt: &str) -> Result<String>;
}
