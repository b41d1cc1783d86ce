//! 交互式对话模式：带搜索/抓取工具的单会话助手

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::{ChatConfig, Config};
use crate::crawl::{CrawlService, FirecrawlClient};
use crate::llm::{ChatBackend, LLMClient};
use crate::utils::text::truncate_chars;

pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful assistant that can search the web, scrape websites, crawl pages and extract data using Firecrawl tools. \
Think step by step and use the appropriate tools to help the user.";

const GOODBYE: &str = "OK Bye.";
const SEPARATOR_WIDTH: usize = 100;

/// 一轮已完成的对话
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

/// 处理一行输入的结果
#[derive(Debug, PartialEq)]
pub enum TurnOutcome {
    /// 用户要求退出
    Exit,
    /// 空输入，忽略
    Skipped,
    Reply(String),
    Failed(String),
}

/// 对话会话，保存最近若干轮历史
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    config: ChatConfig,
    history: Vec<ChatTurn>,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B, config: ChatConfig) -> Self {
        Self {
            backend,
            config,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// 去掉首尾空白后按ASCII大小写不敏感匹配退出关键词
    pub fn is_exit(&self, input: &str) -> bool {
        let input = input.trim();
        self.config
            .exit_keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(input))
    }

    /// 截断过长的输入
    pub fn prepare_input<'a>(&self, input: &'a str) -> &'a str {
        truncate_chars(input.trim(), self.config.max_input_chars)
    }

    /// 把历史对话拼成文字记录，附上本轮输入
    pub fn build_prompt(&self, input: &str) -> String {
        if self.history.is_empty() {
            return input.to_string();
        }

        let mut prompt = String::from("Conversation so far:\n");
        for turn in &self.history {
            let _ = writeln!(prompt, "User: {}", turn.user);
            let _ = writeln!(prompt, "Assistant: {}", turn.assistant);
        }
        let _ = write!(prompt, "\nCurrent request:\n{}", input);
        prompt
    }

    fn remember(&mut self, user: &str, assistant: &str) {
        self.history.push(ChatTurn {
            user: user.to_string(),
            assistant: assistant.to_string(),
        });
        if self.history.len() > self.config.max_history_turns {
            let overflow = self.history.len() - self.config.max_history_turns;
            self.history.drain(..overflow);
        }
    }

    /// 处理一行用户输入
    pub async fn handle(&mut self, line: &str) -> TurnOutcome {
        if self.is_exit(line) {
            return TurnOutcome::Exit;
        }

        let input = self.prepare_input(line);
        if input.is_empty() {
            return TurnOutcome::Skipped;
        }

        let prompt = self.build_prompt(input);
        match self.backend.respond(&prompt).await {
            Ok(reply) => {
                self.remember(input, &reply);
                TurnOutcome::Reply(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat turn failed");
                TurnOutcome::Failed(format!("{e:#}"))
            }
        }
    }

    /// 读-答循环，EOF或退出关键词时结束
    pub async fn run_loop<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let tools = self.backend.tool_names().join(" ");
        writer
            .write_all(format!("Available tools - {}\n", tools).as_bytes())
            .await?;
        writer
            .write_all(format!("{}\n", "-".repeat(SEPARATOR_WIDTH)).as_bytes())
            .await?;

        let mut lines = reader.lines();
        loop {
            writer.write_all(b"\nYou: ").await?;
            writer.flush().await?;

            let Some(line) = lines.next_line().await? else {
                writer.write_all(format!("\n{}\n", GOODBYE).as_bytes()).await?;
                break;
            };

            match self.handle(&line).await {
                TurnOutcome::Exit => {
                    writer.write_all(format!("{}\n", GOODBYE).as_bytes()).await?;
                    break;
                }
                TurnOutcome::Skipped => continue,
                TurnOutcome::Reply(reply) => {
                    writer
                        .write_all(format!("\nAgent: {}\n", reply).as_bytes())
                        .await?;
                }
                TurnOutcome::Failed(message) => {
                    writer
                        .write_all(
                            format!("{}\n{}\n", "$".repeat(SEPARATOR_WIDTH), message).as_bytes(),
                        )
                        .await?;
                }
            }
        }

        writer.flush().await?;
        Ok(())
    }
}

/// 启动对话模式
pub async fn launch(config: &Config) -> Result<()> {
    let crawler: Arc<dyn CrawlService> = Arc::new(FirecrawlClient::new(&config.firecrawl)?);
    let client = LLMClient::new(config.llm.clone())?;
    let agent = client.tool_agent(CHAT_SYSTEM_PROMPT, crawler, config.chat.max_turns);

    let mut session = ChatSession::new(agent, config.chat.clone());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session.run_loop(stdin, tokio::io::stdout()).await
}
