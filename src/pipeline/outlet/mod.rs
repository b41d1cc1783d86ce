use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;

use crate::types::company::ANALYSIS_FAILED_DESCRIPTION;
use crate::types::{CompanyInfo, ResearchState};

const MAX_TECH_STACK: usize = 5;
const MAX_LANGUAGES: usize = 5;
const MAX_INTEGRATIONS: usize = 4;

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn render(&self, state: &ResearchState) -> Result<String> {
        match self {
            ReportFormat::Markdown => Ok(render_markdown(state)),
            ReportFormat::Json => render_json(state),
        }
    }
}

fn yes_no_unknown(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Unknown",
    }
}

fn join_first(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_company(out: &mut String, index: usize, company: &CompanyInfo) {
    let _ = writeln!(out, "### {}. {}\n", index + 1, company.name);
    let _ = writeln!(out, "- **Website:** {}", company.website);
    let _ = writeln!(out, "- **Pricing:** {}", company.pricing_model);
    let _ = writeln!(
        out,
        "- **Open Source:** {}",
        yes_no_unknown(company.is_open_source)
    );

    if !company.tech_stack.is_empty() {
        let _ = writeln!(
            out,
            "- **Tech Stack:** {}",
            join_first(&company.tech_stack, MAX_TECH_STACK)
        );
    }
    if !company.language_support.is_empty() {
        let _ = writeln!(
            out,
            "- **Language Support:** {}",
            join_first(&company.language_support, MAX_LANGUAGES)
        );
    }
    if let Some(api_available) = company.api_available {
        let label = if api_available {
            "Available"
        } else {
            "Not Available"
        };
        let _ = writeln!(out, "- **API:** {}", label);
    }
    if !company.integration_capabilities.is_empty() {
        let _ = writeln!(
            out,
            "- **Integrations:** {}",
            join_first(&company.integration_capabilities, MAX_INTEGRATIONS)
        );
    }

    let description = company.description.trim();
    if !description.is_empty() && description != ANALYSIS_FAILED_DESCRIPTION {
        let _ = writeln!(out, "- **Description:** {}", description);
    }
    out.push('\n');
}

/// 渲染Markdown报告
pub fn render_markdown(state: &ResearchState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Results for: {}\n", state.query);

    let companies = state.companies();
    if companies.is_empty() {
        out.push_str("No companies found.\n\n");
    } else {
        out.push_str("## Companies & Tools\n\n");
        for (index, company) in companies.iter().enumerate() {
            render_company(&mut out, index, company);
        }
    }

    let analysis = state.analysis().trim();
    if !analysis.is_empty() {
        out.push_str("## Developer Recommendations\n\n");
        out.push_str(analysis);
        out.push_str("\n\n");
    }

    let _ = writeln!(
        out,
        "---\n_Generated at {} (run {})_",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        state.run_id
    );
    out
}

/// 渲染JSON报告（完整状态）
pub fn render_json(state: &ResearchState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// 保存报告，必要时创建父目录
pub async fn save(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;
    Ok(())
}
