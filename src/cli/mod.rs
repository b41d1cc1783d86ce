use crate::config::{Config, LLMProvider};
use crate::pipeline::ReportFormat;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DevScout-RS - 由Rust与AI驱动的开发者工具调研助手
#[derive(Parser, Debug)]
#[command(name = "devscout")]
#[command(
    about = "AI-powered research assistant for developer tools. It searches the web, scrapes official sites and compares tools from a developer's perspective."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// LLM Provider (openai, deepseek, openrouter, anthropic, ollama)
    #[arg(long, global = true)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long, global = true)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long, global = true)]
    pub llm_api_base_url: Option<String>,

    /// 调研流程使用的模型
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// 对话模式使用的模型
    #[arg(long, global = true)]
    pub chat_model: Option<String>,

    /// 温度参数
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// 最大tokens数
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// Firecrawl API KEY
    #[arg(long, global = true)]
    pub firecrawl_api_key: Option<String>,

    /// Firecrawl API基地址
    #[arg(long, global = true)]
    pub firecrawl_api_base_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// 调研开发者工具并输出对比报告
    Research {
        /// 调研问题，例如 "Python web frameworks"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// 报告保存路径
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 报告格式
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
    },

    /// 交互式对话，可调用搜索/抓取工具
    Chat,
}

impl Args {
    /// 将CLI参数转换为配置，CLI参数优先级最高
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_ref())?;

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ Warning: unknown provider `{}`, keeping `{}`",
                    provider_str, config.llm.provider
                );
            }
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(chat_model) = self.chat_model {
            config.llm.chat_model = chat_model;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }

        // 覆盖Firecrawl配置
        if let Some(firecrawl_api_key) = self.firecrawl_api_key {
            config.firecrawl.api_key = firecrawl_api_key;
        }
        if let Some(firecrawl_api_base_url) = self.firecrawl_api_base_url {
            config.firecrawl.api_base_url = firecrawl_api_base_url;
        }

        if self.verbose {
            config.verbose = true;
        }

        Ok(config)
    }
}
