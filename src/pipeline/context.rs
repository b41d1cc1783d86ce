use std::sync::Arc;

use crate::config::ResearchConfig;
use crate::crawl::CrawlService;
use crate::llm::LanguageModel;
use crate::pipeline::analyzer::CompanyAnalyzer;

/// 各阶段共享的只读依赖，不持有任何单次调研的可变状态
pub struct ResearchContext<M: LanguageModel> {
    /// 搜索/抓取服务
    pub crawler: Arc<dyn CrawlService>,
    /// 大模型
    pub model: Arc<M>,
    /// 调研策略参数
    pub config: ResearchConfig,
    /// 属性抽取器
    pub analyzer: CompanyAnalyzer,
}

impl<M: LanguageModel> ResearchContext<M> {
    pub fn new(crawler: Arc<dyn CrawlService>, model: Arc<M>, config: ResearchConfig) -> Self {
        let analyzer = CompanyAnalyzer::new(config.analysis_content_budget);
        Self {
            crawler,
            model,
            config,
            analyzer,
        }
    }
}

impl<M: LanguageModel> Clone for ResearchContext<M> {
    fn clone(&self) -> Self {
        Self {
            crawler: self.crawler.clone(),
            model: self.model.clone(),
            config: self.config.clone(),
            analyzer: self.analyzer.clone(),
        }
    }
}
