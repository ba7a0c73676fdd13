use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::llm::LLMProvider;

/// Configuration for Transcript Lens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM completion settings
    pub llm: LLMConfig,

    /// Transcript service settings
    pub transcript: TranscriptConfig,

    /// Video metadata service settings
    pub metadata: MetadataConfig,

    /// Web server settings
    pub server: ServerConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// LLM provider to use
    pub provider: LLMProvider,

    /// API endpoint override (required for LMStudio, optional for cloud providers)
    pub endpoint: Option<String>,

    /// API key (for cloud providers)
    pub api_key: Option<String>,

    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation
    pub temperature: f32,

    /// Request timeout in seconds; unset leaves the transport default
    pub timeout_seconds: Option<u64>,

    /// Prompt template overrides
    pub prompts: PromptConfig,
}

/// Configuration for prompt template files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Base directory for prompt files
    pub prompt_dir: PathBuf,

    /// Summary prompt file
    pub summary_file: String,

    /// Question-answer prompt file
    pub answer_file: String,

    /// Quiz generation prompt file
    pub quiz_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Caption languages in preference order
    pub languages: Vec<String>,

    /// Watch page endpoint used to discover caption tracks
    pub watch_endpoint: String,

    /// Request timeout in seconds; unset leaves the transport default
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// YouTube Data API key; without it the fallback title and thumbnail are used
    pub api_key: Option<String>,

    /// Videos endpoint of the YouTube Data API
    pub endpoint: String,

    /// Thumbnail URL template used when no metadata is available
    pub fallback_thumbnail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Log level
    pub log_level: String,

    /// File name offered for the summary download
    pub summary_filename: String,
}

impl OutputConfig {
    /// Tracing filter directive for this crate; `verbose` forces debug
    pub fn log_filter(&self, verbose: bool) -> String {
        let level = if verbose { "debug" } else { self.log_level.as_str() };
        format!("transcript_lens={},warn", level)
    }
}

impl PromptConfig {
    /// Load prompt content from a specific file
    pub async fn load_prompt(&self, filename: &str) -> Result<String> {
        let path = self.prompt_dir.join(filename);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content.trim().to_string()),
            Err(e) => Err(anyhow!("Failed to load prompt from {}: {}", path.display(), e)),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults plus environment
    pub fn load() -> Result<Self> {
        let home_config = std::env::var("HOME")
            .map(|home| format!("{}/.config/transcript-lens/config.toml", home))
            .unwrap_or_default();

        let config_paths = [
            "transcript-lens.toml",
            "config/transcript-lens.toml",
            home_config.as_str(),
        ];

        for path in config_paths.iter().filter(|p| !p.is_empty()) {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config file {}: {}", path, e))?;
        let config: Config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path);
        Ok(config.with_env_overrides())
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Result<Self> {
        Ok(Self::default().with_env_overrides())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(provider) = std::env::var("TRANSCRIPT_LENS_LLM_PROVIDER") {
            match provider.parse() {
                Ok(provider) => self.llm.provider = provider,
                Err(e) => tracing::warn!("Ignoring TRANSCRIPT_LENS_LLM_PROVIDER: {}", e),
            }
        }

        if let Ok(api_key) = std::env::var("GOOGLE_API_KEY") {
            if self.llm.provider == LLMProvider::Gemini && self.llm.api_key.is_none() {
                self.llm.api_key = Some(api_key);
            }
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if self.llm.provider == LLMProvider::OpenAI && self.llm.api_key.is_none() {
                self.llm.api_key = Some(api_key);
            }
        }

        if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
            self.metadata.api_key = Some(api_key);
        }

        if let Ok(port) = std::env::var("TRANSCRIPT_LENS_PORT") {
            self.server.port = port.parse().unwrap_or(self.server.port);
        }

        if let Ok(log_level) = std::env::var("TRANSCRIPT_LENS_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.llm.provider {
            LLMProvider::Gemini | LLMProvider::OpenAI => {
                if self.llm.api_key.is_none() {
                    return Err(anyhow!("API key required for {:?} provider", self.llm.provider));
                }
            }
            LLMProvider::LMStudio => {
                if self.llm.endpoint.is_none() {
                    return Err(anyhow!("Endpoint required for LMStudio provider"));
                }
            }
        }

        if self.transcript.languages.is_empty() {
            return Err(anyhow!("At least one transcript language is required"));
        }

        let endpoints = [
            ("transcript.watch_endpoint", &self.transcript.watch_endpoint),
            ("metadata.endpoint", &self.metadata.endpoint),
        ];
        for (name, endpoint) in endpoints {
            url::Url::parse(endpoint).map_err(|e| anyhow!("Invalid {} '{}': {}", name, endpoint, e))?;
        }

        if self.server.port == 0 {
            return Err(anyhow!("Server port must be greater than 0"));
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Transcript Lens Configuration:\n\
            - LLM Provider: {:?}\n\
            - Model: {}\n\
            - Transcript Languages: {}\n\
            - Metadata API: {}\n\
            - Listen Address: {}:{}",
            self.llm.provider,
            self.llm.model,
            self.transcript.languages.join(", "),
            if self.metadata.api_key.is_some() { "enabled" } else { "fallback only" },
            self.server.host,
            self.server.port
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMConfig {
                provider: LLMProvider::Gemini,
                endpoint: None,
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
                max_tokens: 8192,
                temperature: 0.7,
                timeout_seconds: None,
                prompts: PromptConfig {
                    prompt_dir: PathBuf::from("config/prompts"),
                    summary_file: "summary.txt".to_string(),
                    answer_file: "answer.txt".to_string(),
                    quiz_file: "quiz.txt".to_string(),
                },
            },
            transcript: TranscriptConfig {
                languages: vec!["hi".to_string(), "en".to_string()],
                watch_endpoint: "https://www.youtube.com/watch".to_string(),
                timeout_seconds: None,
            },
            metadata: MetadataConfig {
                api_key: None,
                endpoint: "https://www.googleapis.com/youtube/v3/videos".to_string(),
                fallback_thumbnail: "http://img.youtube.com/vi/{video_id}/0.jpg".to_string(),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8501,
            },
            output: OutputConfig {
                log_level: "info".to_string(),
                summary_filename: "summary.md".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_llm_provider(mut self, provider: LLMProvider) -> Self {
        self.config.llm.provider = provider;
        self
    }

    pub fn with_llm_endpoint(mut self, endpoint: String) -> Self {
        self.config.llm.endpoint = Some(endpoint);
        self
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.config.llm.model = model;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.config.transcript.languages = languages;
        self
    }

    pub fn with_watch_endpoint(mut self, endpoint: String) -> Self {
        self.config.transcript.watch_endpoint = endpoint;
        self
    }

    pub fn with_metadata_api(mut self, endpoint: String, api_key: Option<String>) -> Self {
        self.config.metadata.endpoint = endpoint;
        self.config.metadata.api_key = api_key;
        self
    }

    pub fn with_prompt_dir(mut self, dir: PathBuf) -> Self {
        self.config.llm.prompts.prompt_dir = dir;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, LLMProvider::Gemini);
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.transcript.languages, vec!["hi", "en"]);
        assert_eq!(config.output.summary_filename, "summary.md");
        assert!(config.llm.timeout_seconds.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_llm_provider(LLMProvider::LMStudio)
            .with_llm_endpoint("http://localhost:1234/v1/chat/completions".to_string())
            .with_languages(vec!["en".to_string()])
            .with_port(9000)
            .build();

        assert_eq!(config.llm.provider, LLMProvider::LMStudio);
        assert_eq!(config.transcript.languages, vec!["en"]);
        assert_eq!(config.server.port, 9000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ConfigBuilder::new().with_api_key("key".to_string()).build();
        assert!(config.validate().is_ok());

        config.llm.api_key = None;
        assert!(config.validate().is_err());

        config.llm.api_key = Some("key".to_string());
        config.transcript.languages.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_filter_follows_configured_level() {
        let mut config = Config::default();
        assert_eq!(config.output.log_filter(false), "transcript_lens=info,warn");

        config.output.log_level = "trace".to_string();
        assert_eq!(config.output.log_filter(false), "transcript_lens=trace,warn");
        assert_eq!(config.output.log_filter(true), "transcript_lens=debug,warn");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = ConfigBuilder::new().with_model("gemini-1.5-pro".to_string()).build();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.llm.model, "gemini-1.5-pro");
        assert_eq!(parsed.server.port, config.server.port);
    }
}
