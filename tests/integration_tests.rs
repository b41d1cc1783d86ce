use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use devscout_rs::Workflow;
use devscout_rs::config::ResearchConfig;
use devscout_rs::crawl::{CrawlService, ScrapedPage, SearchHit};
use devscout_rs::llm::LanguageModel;
use devscout_rs::pipeline::outlet::render_markdown;
use devscout_rs::pipeline::prompts;
use devscout_rs::types::AnalysisStatus;
use devscout_rs::types::company::ANALYSIS_FAILED_DESCRIPTION;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const COMPARISON_QUERY: &str = "Python web frameworks tools comparison best alternatives";

/// 内存中的搜索/抓取服务，记录全部调用
#[derive(Default)]
struct StubCrawler {
    search_results: HashMap<String, Vec<SearchHit>>,
    pages: HashMap<String, String>,
    searches: Mutex<Vec<(String, usize)>>,
    scrapes: Mutex<Vec<String>>,
}

impl StubCrawler {
    fn search(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.search_results.insert(query.to_string(), hits);
        self
    }

    fn page(mut self, url: &str, markdown: &str) -> Self {
        self.pages.insert(url.to_string(), markdown.to_string());
        self
    }

    fn official_site(self, name: &str, url: &str, markdown: &str) -> Self {
        self.search(&format!("{name} official site"), vec![hit(url, Some(name))])
            .page(url, markdown)
    }

    fn scrape_count(&self, url: &str) -> usize {
        self.scrapes
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }
}

fn hit(url: &str, title: Option<&str>) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.map(str::to_string),
        description: None,
        markdown: Some(format!("search summary for {url}")),
    }
}

#[async_trait]
impl CrawlService for StubCrawler {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), limit));
        self.search_results
            .get(query)
            .map(|hits| hits.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    async fn scrape(&self, url: &str) -> Option<ScrapedPage> {
        self.scrapes.lock().unwrap().push(url.to_string());
        self.pages.get(url).map(|markdown| ScrapedPage {
            url: url.to_string(),
            title: None,
            markdown: markdown.clone(),
        })
    }
}

/// 按系统提示词分派的脚本化模型
#[derive(Default)]
struct ScriptedModel {
    extraction: Option<String>,
    recommendation: Option<String>,
    /// 公司名 → 分析结果，缺失表示分析失败
    analyses: HashMap<String, serde_json::Value>,
    extraction_prompts: Mutex<Vec<String>>,
    analysis_prompts: Mutex<Vec<String>>,
    recommendation_prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        if system_prompt == prompts::TOOL_EXTRACTION_SYSTEM {
            self.extraction_prompts
                .lock()
                .unwrap()
                .push(user_prompt.to_string());
            self.extraction.clone().ok_or_else(|| anyhow!("extraction unavailable"))
        } else if system_prompt == prompts::RECOMMENDATIONS_SYSTEM {
            self.recommendation_prompts
                .lock()
                .unwrap()
                .push(user_prompt.to_string());
            self.recommendation
                .clone()
                .ok_or_else(|| anyhow!("recommendation unavailable"))
        } else {
            Err(anyhow!("unexpected system prompt"))
        }
    }

    async fn complete_structured<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        assert_eq!(system_prompt, prompts::TOOL_ANALYSIS_SYSTEM);
        self.analysis_prompts
            .lock()
            .unwrap()
            .push(user_prompt.to_string());

        let name = user_prompt
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("Company/Tool: "))
            .unwrap_or_default();
        match self.analyses.get(name) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Err(anyhow!("no analysis scripted for {name}")),
        }
    }
}

fn analysis(pricing: &str, open_source: bool, description: &str) -> serde_json::Value {
    serde_json::json!({
        "pricing_model": pricing,
        "is_open_source": open_source,
        "tech_stack": ["Python"],
        "description": description,
        "api_available": true,
        "language_support": ["Python"],
        "integration_capabilities": ["Docker"]
    })
}

fn workflow(crawler: Arc<StubCrawler>, model: Arc<ScriptedModel>) -> Workflow<ScriptedModel> {
    Workflow::new(crawler, model, ResearchConfig::default())
}

fn comparison_crawler() -> StubCrawler {
    StubCrawler::default()
        .search(
            COMPARISON_QUERY,
            vec![
                hit("https://blog.example/a", Some("Top frameworks")),
                hit("https://blog.example/b", Some("Flask vs Django")),
            ],
        )
        .page("https://blog.example/a", "Flask and Django are popular.")
        .page("https://blog.example/b", "Django ships batteries included.")
}

#[tokio::test]
async fn test_end_to_end_flask_and_django() {
    let crawler = Arc::new(
        comparison_crawler()
            .official_site("Flask", "https://flask.palletsprojects.com", "# Flask docs")
            .official_site("Django", "https://www.djangoproject.com", "# Django docs"),
    );
    let model = Arc::new(ScriptedModel {
        extraction: Some("Flask\nDjango\n".to_string()),
        recommendation: Some("Pick Flask for small services.".to_string()),
        analyses: HashMap::from([
            ("Flask".to_string(), analysis("Free", true, "Micro framework")),
            ("Django".to_string(), analysis("Free", true, "Full-stack framework")),
        ]),
        ..Default::default()
    });

    let state = workflow(crawler.clone(), model.clone())
        .run("Python web frameworks")
        .await;

    assert_eq!(state.extracted_tools(), ["Flask".to_string(), "Django".to_string()]);
    let names: Vec<_> = state.companies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Flask", "Django"]);
    assert_eq!(state.companies()[0].website, "https://flask.palletsprojects.com");
    assert_eq!(state.companies()[0].pricing_model, "Free");
    assert_eq!(state.companies()[0].is_open_source, Some(true));
    assert_eq!(state.companies()[1].description, "Full-stack framework");
    assert_eq!(state.analysis(), "Pick Flask for small services.");

    let extraction_prompt = &model.extraction_prompts.lock().unwrap()[0];
    assert!(extraction_prompt.contains("Flask and Django are popular.\n\n"));
    assert!(extraction_prompt.contains("Django ships batteries included.\n\n"));

    let recommendation_prompt = &model.recommendation_prompts.lock().unwrap()[0];
    assert!(recommendation_prompt.contains("\"name\":\"Flask\""));
    assert!(recommendation_prompt.contains("\"name\":\"Django\""));

    let report = render_markdown(&state);
    assert!(report.contains("### 1. Flask"));
    assert!(report.contains("### 2. Django"));
    assert!(report.contains("Pick Flask for small services."));
}

#[tokio::test]
async fn test_no_results_anywhere() {
    let crawler = Arc::new(StubCrawler::default());
    let model = Arc::new(ScriptedModel {
        extraction: Some(String::new()),
        recommendation: Some(String::new()),
        ..Default::default()
    });

    let state = workflow(crawler.clone(), model.clone()).run("obscure tools").await;

    assert!(state.extracted_tools().is_empty());
    assert!(state.companies().is_empty());
    assert_eq!(state.analysis(), "");
    assert!(crawler.scrapes.lock().unwrap().is_empty());
    // 空公司列表时仍然生成推荐
    assert_eq!(model.recommendation_prompts.lock().unwrap().len(), 1);
    assert!(render_markdown(&state).contains("No companies found."));
}

#[tokio::test]
async fn test_candidates_are_capped_at_four() {
    let mut crawler = comparison_crawler();
    let names = ["A", "B", "C", "D", "E", "F"];
    for name in names {
        crawler = crawler.official_site(name, &format!("https://{name}.example"), "# docs");
    }
    let crawler = Arc::new(crawler);
    let model = Arc::new(ScriptedModel {
        extraction: Some(names.join("\n")),
        recommendation: Some("ok".to_string()),
        analyses: names
            .iter()
            .map(|n| (n.to_string(), analysis("Paid", false, "tool")))
            .collect(),
        ..Default::default()
    });

    let state = workflow(crawler.clone(), model.clone())
        .run("Python web frameworks")
        .await;

    assert_eq!(state.extracted_tools().len(), 6);
    let researched: Vec<_> = state.companies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(researched, vec!["A", "B", "C", "D"]);
    let searches = crawler.searches.lock().unwrap();
    assert!(!searches.iter().any(|(q, _)| q == "E official site"));
    assert!(searches.iter().any(|(q, limit)| q == "A official site" && *limit == 4));
}

#[tokio::test]
async fn test_analysis_failure_keeps_company_with_sentinel() {
    let crawler = Arc::new(
        comparison_crawler()
            .official_site("Flask", "https://flask.palletsprojects.com", "# Flask docs"),
    );
    let model = Arc::new(ScriptedModel {
        extraction: Some("Flask".to_string()),
        recommendation: Some("Use Flask.".to_string()),
        ..Default::default()
    });

    let state = workflow(crawler, model).run("Python web frameworks").await;

    assert_eq!(state.companies().len(), 1);
    let flask = &state.companies()[0];
    assert_eq!(flask.website, "https://flask.palletsprojects.com");
    assert_eq!(flask.pricing_model, "Unknown");
    assert_eq!(flask.description, ANALYSIS_FAILED_DESCRIPTION);
    assert!(matches!(
        flask.analysis_status,
        AnalysisStatus::Failed { ref reason } if reason.contains("no analysis scripted")
    ));
    assert!(!render_markdown(&state).contains(ANALYSIS_FAILED_DESCRIPTION));
}

#[tokio::test]
async fn test_article_content_is_truncated() {
    let long_article = "x".repeat(5_000);
    let crawler = Arc::new(
        StubCrawler::default()
            .search(COMPARISON_QUERY, vec![hit("https://blog.example/long", None)])
            .page("https://blog.example/long", &long_article),
    );
    let model = Arc::new(ScriptedModel::default());

    workflow(crawler, model.clone())
        .run("Python web frameworks")
        .await;

    let prompt = &model.extraction_prompts.lock().unwrap()[0];
    assert!(prompt.contains(&format!("{}\n\n", "x".repeat(1_500))));
    assert!(!prompt.contains(&"x".repeat(1_501)));
}

#[tokio::test]
async fn test_model_always_failing_still_returns_state() {
    let crawler = Arc::new(
        comparison_crawler()
            .search(
                "Python web frameworks",
                vec![hit("https://flask.palletsprojects.com", Some("Flask"))],
            )
            .official_site("Flask", "https://flask.palletsprojects.com", "# Flask docs"),
    );
    let model = Arc::new(ScriptedModel::default());

    let state = workflow(crawler, model).run("Python web frameworks").await;

    assert!(state.extracted_tools().is_empty());
    assert_eq!(state.companies().len(), 1);
    assert!(state.companies()[0].analysis_failed());
    assert_eq!(state.analysis(), "");
}

#[tokio::test]
async fn test_fallback_uses_search_titles() {
    let crawler = Arc::new(
        StubCrawler::default()
            .search(
                "static site generators",
                vec![
                    hit("https://gohugo.io", Some("Hugo")),
                    hit("https://untitled.example", None),
                ],
            )
            .official_site("Hugo", "https://gohugo.io", "# Hugo"),
    );
    let model = Arc::new(ScriptedModel {
        extraction: Some("\n  \n".to_string()),
        recommendation: Some("Use Hugo.".to_string()),
        analyses: HashMap::from([("Hugo".to_string(), analysis("Free", true, "SSG"))]),
        ..Default::default()
    });

    let state = workflow(crawler.clone(), model)
        .run("static site generators")
        .await;

    assert!(state.extracted_tools().is_empty());
    let searches = crawler.searches.lock().unwrap();
    assert!(searches.iter().any(|(q, _)| q == "Hugo official site"));
    assert!(searches.iter().any(|(q, _)| q == "Unknown official site"));
    let names: Vec<_> = state.companies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Hugo"]);
}

#[tokio::test]
async fn test_fallback_candidates_are_capped_at_four() {
    let titles: Vec<String> = (0..10).map(|i| format!("T{i}")).collect();
    let mut crawler = StubCrawler::default().search(
        "api gateways",
        titles
            .iter()
            .map(|t| hit(&format!("https://{t}.example"), Some(t.as_str())))
            .collect(),
    );
    for title in &titles {
        crawler = crawler.official_site(title, &format!("https://{title}.example"), "# docs");
    }
    let crawler = Arc::new(crawler);
    let config = ResearchConfig {
        fallback_result_limit: 10,
        ..ResearchConfig::default()
    };

    let state = Workflow::new(crawler.clone(), Arc::new(ScriptedModel::default()), config)
        .run("api gateways")
        .await;

    assert!(state.extracted_tools().is_empty());
    let names: Vec<_> = state.companies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["T0", "T1", "T2", "T3"]);
    assert!(state.companies().iter().all(|c| c.analysis_failed()));

    let searches = crawler.searches.lock().unwrap();
    assert!(searches.iter().any(|(q, limit)| q == "api gateways" && *limit == 10));
    assert!(searches.iter().any(|(q, _)| q == "T3 official site"));
    assert!(!searches.iter().any(|(q, _)| q == "T4 official site"));
}

#[tokio::test]
async fn test_unscrapable_site_is_skipped_and_scraped_once() {
    let crawler = Arc::new(
        comparison_crawler()
            .search(
                "Flask official site",
                vec![hit("https://flask.palletsprojects.com", Some("Flask"))],
            )
            .official_site("Django", "https://www.djangoproject.com", "# Django docs"),
    );
    let model = Arc::new(ScriptedModel {
        extraction: Some("Flask\nDjango".to_string()),
        recommendation: Some("Use Django.".to_string()),
        analyses: HashMap::from([("Django".to_string(), analysis("Free", true, "Full-stack"))]),
        ..Default::default()
    });

    let state = workflow(crawler.clone(), model.clone())
        .run("Python web frameworks")
        .await;

    let names: Vec<_> = state.companies().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Django"]);
    assert_eq!(crawler.scrape_count("https://flask.palletsprojects.com"), 1);
    assert_eq!(crawler.scrape_count("https://www.djangoproject.com"), 1);
    assert_eq!(model.analysis_prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_tool_names_are_preserved() {
    let crawler = Arc::new(
        comparison_crawler()
            .official_site("Flask", "https://flask.palletsprojects.com", "# Flask docs"),
    );
    let model = Arc::new(ScriptedModel {
        extraction: Some("Flask\nFlask".to_string()),
        recommendation: Some("Use Flask.".to_string()),
        analyses: HashMap::from([("Flask".to_string(), analysis("Free", true, "Micro"))]),
        ..Default::default()
    });

    let state = workflow(crawler, model).run("Python web frameworks").await;

    assert_eq!(state.extracted_tools(), ["Flask".to_string(), "Flask".to_string()]);
    assert_eq!(state.companies().len(), 2);
}

#[tokio::test]
async fn test_reasoning_blocks_are_removed() {
    let crawler = Arc::new(
        comparison_crawler()
            .official_site("Flask", "https://flask.palletsprojects.com", "# Flask docs"),
    );
    let model = Arc::new(ScriptedModel {
        extraction: Some("<think>\nConsider Bottle too\n</think>\nFlask".to_string()),
        recommendation: Some("<think>weighing</think>\nUse Flask.".to_string()),
        analyses: HashMap::from([("Flask".to_string(), analysis("Free", true, "Micro"))]),
        ..Default::default()
    });

    let state = workflow(crawler, model).run("Python web frameworks").await;

    assert_eq!(state.extracted_tools(), ["Flask".to_string()]);
    assert_eq!(state.analysis(), "Use Flask.");
}
