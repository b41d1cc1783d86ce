use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "devscout.toml";

/// 默认的OpenAI兼容网关（Together）
pub const DEFAULT_LLM_API_BASE_URL: &str = "https://api.together.xyz/v1";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    /// OpenAI兼容网关（Together、vLLM等均走此通道）
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "together" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索/抓取服务配置
    pub firecrawl: FirecrawlConfig,

    /// 调研流程的策略参数
    pub research: ResearchConfig,

    /// 对话模式配置
    pub chat: ChatConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 调研流程使用的模型
    pub model: String,

    /// 对话模式使用的模型（需要支持tool calling）
    pub chat_model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 调研流程的温度
    pub temperature: f64,

    /// 对话模式的温度
    pub chat_temperature: f64,

    /// 调用次数上限，1表示只调用一次
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,
}

/// Firecrawl配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FirecrawlConfig {
    /// Firecrawl API KEY，缺失时启动失败
    pub api_key: String,

    /// Firecrawl API基地址
    pub api_base_url: String,

    /// 单次HTTP请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 调研流程的策略常量
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ResearchConfig {
    /// 第一阶段检索的对比文章数量
    pub article_limit: usize,

    /// 每篇文章参与工具抽取的最大字符数
    pub article_char_budget: usize,

    /// 第二阶段最多调研的候选工具数量
    pub candidate_limit: usize,

    /// 查找官网时的搜索结果数量
    pub official_site_result_limit: usize,

    /// 未抽取到候选工具时，直接检索的结果数量
    pub fallback_result_limit: usize,

    /// 官网内容参与结构化分析的最大字符数
    pub analysis_content_budget: usize,
}

/// 对话模式配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    /// 单轮用户输入的最大字符数
    pub max_input_chars: usize,

    /// 单轮对话中允许的最大工具调用轮数
    pub max_turns: usize,

    /// 退出关键词
    pub exit_keywords: Vec<String>,

    /// 拼入提示词的历史对话轮数
    pub max_history_turns: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 按优先级加载配置：显式路径 > 当前目录下的默认文件 > 内置默认值
    pub fn load(explicit_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let default_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(&default_path);
        }

        Ok(Self::default())
    }
}

impl LLMConfig {
    /// 传给provider客户端的基地址
    ///
    /// 为空，或在非OpenAI provider下仍是默认的Together网关时返回None，
    /// 由provider使用自己的官方地址。
    pub fn provider_base_url(&self) -> Option<&str> {
        let base_url = self.api_base_url.trim();
        if base_url.is_empty() {
            return None;
        }
        if self.provider != LLMProvider::OpenAI && base_url == DEFAULT_LLM_API_BASE_URL {
            return None;
        }
        Some(base_url)
    }
}

/// 读取第一个非空的环境变量
fn env_first(keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_default()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: env_first(&["DEVSCOUT_LLM_API_KEY", "TOGETHER_API_KEY"]),
            api_base_url: String::from(DEFAULT_LLM_API_BASE_URL),
            model: String::from("deepseek-ai/DeepSeek-R1-Distill-Llama-70B-free"),
            chat_model: String::from("meta-llama/Llama-3.3-70B-Instruct-Turbo-Free"),
            max_tokens: 8192,
            temperature: 0.1,
            chat_temperature: 0.0,
            retry_attempts: 1,
            retry_delay_ms: 2000,
        }
    }
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            api_key: env_first(&["FIRECRAWL_API_KEY"]),
            api_base_url: String::from("https://api.firecrawl.dev"),
            timeout_seconds: 120,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            article_limit: 4,
            article_char_budget: 1500,
            candidate_limit: 4,
            official_site_result_limit: 4,
            fallback_result_limit: 4,
            analysis_content_budget: 2500,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 10_000,
            max_turns: 10,
            exit_keywords: vec!["quit".to_string(), "exit".to_string(), "q".to_string()],
            max_history_turns: 10,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
