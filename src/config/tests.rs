#[cfg(test)]
mod tests {
    use crate::config::{ChatConfig, Config, LLMConfig, LLMProvider, ResearchConfig};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert!(!config.verbose);
        assert_eq!(config.research, ResearchConfig::default());
        assert_eq!(config.chat, ChatConfig::default());
        assert_eq!(config.firecrawl.api_base_url, "https://api.firecrawl.dev");
        assert_eq!(config.firecrawl.timeout_seconds, 120);
    }

    #[test]
    fn test_research_policy_defaults() {
        let research = ResearchConfig::default();

        assert_eq!(research.article_limit, 4);
        assert_eq!(research.article_char_budget, 1500);
        assert_eq!(research.candidate_limit, 4);
        assert_eq!(research.official_site_result_limit, 4);
        assert_eq!(research.fallback_result_limit, 4);
        assert_eq!(research.analysis_content_budget, 2500);
    }

    #[test]
    fn test_chat_defaults() {
        let chat = ChatConfig::default();

        assert_eq!(chat.max_input_chars, 10_000);
        assert_eq!(chat.max_turns, 10);
        assert_eq!(chat.exit_keywords, vec!["quit", "exit", "q"]);
        assert_eq!(chat.max_history_turns, 10);
    }

    #[test]
    fn test_llm_config_default() {
        let llm = LLMConfig::default();

        assert_eq!(llm.provider, LLMProvider::OpenAI);
        assert_eq!(llm.api_base_url, "https://api.together.xyz/v1");
        assert!(!llm.model.is_empty());
        assert!(!llm.chat_model.is_empty());
        assert_eq!(llm.temperature, 0.1);
        assert_eq!(llm.chat_temperature, 0.0);
        assert_eq!(llm.retry_attempts, 1);
    }

    #[test]
    fn test_llm_provider_from_str() {
        assert_eq!("openai".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!("Together".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!(
            "deepseek".parse::<LLMProvider>().unwrap(),
            LLMProvider::DeepSeek
        );
        assert_eq!(
            "openrouter".parse::<LLMProvider>().unwrap(),
            LLMProvider::OpenRouter
        );
        assert_eq!(
            "ANTHROPIC".parse::<LLMProvider>().unwrap(),
            LLMProvider::Anthropic
        );
        assert_eq!("ollama".parse::<LLMProvider>().unwrap(), LLMProvider::Ollama);

        assert!("invalid".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_llm_provider_display_roundtrips() {
        for provider in [
            LLMProvider::OpenAI,
            LLMProvider::DeepSeek,
            LLMProvider::OpenRouter,
            LLMProvider::Anthropic,
            LLMProvider::Ollama,
        ] {
            let parsed: LLMProvider = provider.to_string().parse().unwrap();
            assert_eq!(parsed, provider);
        }
    }

    #[test]
    fn test_config_from_file_partial() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("devscout.toml");
        fs::write(
            &path,
            r#"
verbose = true

[llm]
provider = "anthropic"
model = "claude-test"

[research]
candidate_limit = 2
article_char_budget = 500
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert!(config.verbose);
        assert_eq!(config.llm.provider, LLMProvider::Anthropic);
        assert_eq!(config.llm.model, "claude-test");
        // 未出现的字段回落到默认值
        assert_eq!(config.llm.api_base_url, "https://api.together.xyz/v1");
        assert_eq!(config.research.candidate_limit, 2);
        assert_eq!(config.research.article_char_budget, 500);
        assert_eq!(config.research.article_limit, 4);
        assert_eq!(config.chat, ChatConfig::default());
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[llm\nprovider = ").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_config_from_missing_file() {
        let path = PathBuf::from("/nonexistent/devscout.toml");
        assert!(Config::from_file(&path).is_err());
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.research.candidate_limit = 7;
        config.chat.exit_keywords = vec!["bye".to_string()];

        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.research.candidate_limit, 7);
        assert_eq!(parsed.chat.exit_keywords, vec!["bye"]);
    }

    #[test]
    fn test_provider_base_url_keeps_gateway_for_openai() {
        let llm = LLMConfig::default();
        assert_eq!(llm.provider_base_url(), Some("https://api.together.xyz/v1"));

        let llm = LLMConfig {
            api_base_url: "  ".to_string(),
            ..LLMConfig::default()
        };
        assert_eq!(llm.provider_base_url(), None);
    }

    #[test]
    fn test_provider_base_url_drops_gateway_default_for_other_providers() {
        for provider in [
            LLMProvider::DeepSeek,
            LLMProvider::OpenRouter,
            LLMProvider::Anthropic,
            LLMProvider::Ollama,
        ] {
            let llm = LLMConfig {
                provider: provider.clone(),
                ..LLMConfig::default()
            };
            assert_eq!(llm.provider_base_url(), None, "{provider}");
        }
    }

    #[test]
    fn test_provider_base_url_applies_explicit_value() {
        let llm = LLMConfig {
            provider: LLMProvider::Ollama,
            api_base_url: "http://gpu-box:11434".to_string(),
            ..LLMConfig::default()
        };
        assert_eq!(llm.provider_base_url(), Some("http://gpu-box:11434"));

        let llm = LLMConfig {
            provider: LLMProvider::OpenRouter,
            api_base_url: "https://openrouter.example/api/v1".to_string(),
            ..LLMConfig::default()
        };
        assert_eq!(
            llm.provider_base_url(),
            Some("https://openrouter.example/api/v1")
        );
    }
}
