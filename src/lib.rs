use anyhow::{Context, Result};

/// Security findings, fix patches, and dependency reports with sanitization
pub mod analysis;

/// HTTP route handlers and shared application state
pub mod api;

/// Content-addressed result caching
pub mod cache;

/// Service-level error types
pub mod error;

/// External reasoning-engine providers
pub mod providers;

/// Request orchestration: cache, engine dispatch, sanitization
pub mod service;

// Re-export commonly used types for convenience
pub use analysis::{
    classify_manifest, normalize_patch, sanitize_dependency_findings, sanitize_findings,
    ChangeUnit, DependencyFinding, DependencyReport, Finding, FixPatch, ManifestKind,
};
pub use cache::{content_hash, AnalysisCache};
pub use error::ServiceError;
pub use providers::{AIProvider, EngineError, ReasoningEngine, UniversalAIClient};
pub use service::AnalysisService;

/// Environment configuration with validation and type safety
#[derive(Clone)]
pub struct Config {
    /// Provider the reasoning-engine requests are routed to
    pub provider: AIProvider,
    /// Model identifier passed to the provider
    pub model: String,

    // API keys per provider; only the selected provider's key is required
    pub groq_api_key: String,
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    pub google_api_key: String,
    pub xai_api_key: String,

    // Base URLs for different providers (can be overridden)
    pub groq_base_url: String,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub google_base_url: String,
    pub xai_base_url: String,

    // Common settings with defaults
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub cache_ttl_secs: i64,
    pub cache_max_entries: usize,
}

impl Config {
    /// Create a new Config with defaults for everything but provider and model
    pub fn new(provider: AIProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),

            groq_api_key: String::new(),
            openai_api_key: String::new(),
            anthropic_api_key: String::new(),
            google_api_key: String::new(),
            xai_api_key: String::new(),

            groq_base_url: AIProvider::Groq.default_base_url().to_string(),
            openai_base_url: AIProvider::OpenAI.default_base_url().to_string(),
            anthropic_base_url: AIProvider::Anthropic.default_base_url().to_string(),
            google_base_url: AIProvider::Google.default_base_url().to_string(),
            xai_base_url: AIProvider::XAI.default_base_url().to_string(),

            max_tokens: 4000,
            temperature: 0.2,
            request_timeout_secs: 60,
            connect_timeout_secs: 30,
            cache_ttl_secs: 3600,
            cache_max_entries: 1024,
        }
    }

    /// Validate configuration and return errors if invalid
    pub fn validate(&self) -> Result<()> {
        if self.api_key_for(self.provider).is_empty() {
            return Err(anyhow::anyhow!(
                "API key missing for provider: {}",
                self.provider
            ));
        }

        if self.model.trim().is_empty() {
            return Err(anyhow::anyhow!("model cannot be empty"));
        }

        if self.max_tokens == 0 || self.max_tokens > 100_000 {
            return Err(anyhow::anyhow!("max_tokens must be between 1 and 100,000"));
        }

        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(anyhow::anyhow!("temperature must be between 0.0 and 2.0"));
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 600 {
            return Err(anyhow::anyhow!(
                "request_timeout_secs must be between 1 and 600"
            ));
        }

        if self.cache_ttl_secs <= 0 {
            return Err(anyhow::anyhow!("cache_ttl_secs must be positive"));
        }

        if self.cache_max_entries == 0 {
            return Err(anyhow::anyhow!("cache_max_entries must be positive"));
        }

        Ok(())
    }

    /// Get the appropriate API key for a given provider
    pub fn api_key_for(&self, provider: AIProvider) -> &str {
        match provider {
            AIProvider::Groq => &self.groq_api_key,
            AIProvider::OpenAI => &self.openai_api_key,
            AIProvider::Anthropic => &self.anthropic_api_key,
            AIProvider::Google => &self.google_api_key,
            AIProvider::XAI => &self.xai_api_key,
        }
    }

    /// Get the appropriate base URL for a given provider
    pub fn base_url_for(&self, provider: AIProvider) -> &str {
        match provider {
            AIProvider::Groq => &self.groq_base_url,
            AIProvider::OpenAI => &self.openai_base_url,
            AIProvider::Anthropic => &self.anthropic_base_url,
            AIProvider::Google => &self.google_base_url,
            AIProvider::XAI => &self.xai_base_url,
        }
    }

    pub fn from_env() -> Result<Self> {
        // Load .env if present; real environment variables win
        dotenvy::dotenv().ok();

        let provider_str = std::env::var("PROVIDER").unwrap_or_else(|_| "groq".to_string());
        let provider = provider_str.parse::<AIProvider>().with_context(|| {
            format!(
                "Invalid PROVIDER: {}. Supported: groq, openai, anthropic, google, xai",
                provider_str
            )
        })?;

        let model =
            std::env::var("MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());

        // Parse and validate configurable values with proper bounds
        let max_tokens = std::env::var("MAX_TOKENS")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<u32>()
            .unwrap_or(4000)
            .clamp(100, 100_000);

        let temperature = std::env::var("TEMPERATURE")
            .unwrap_or_else(|_| "0.2".to_string())
            .parse::<f32>()
            .unwrap_or(0.2)
            .clamp(0.0, 2.0);

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .unwrap_or(60)
            .clamp(10, 600);

        let connect_timeout_secs = std::env::var("CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .unwrap_or(30)
            .clamp(5, 120);

        let cache_ttl_secs = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<i64>()
            .unwrap_or(3600)
            .clamp(60, 86_400);

        let cache_max_entries = std::env::var("CACHE_MAX_ENTRIES")
            .unwrap_or_else(|_| "1024".to_string())
            .parse::<usize>()
            .unwrap_or(1024)
            .clamp(16, 1_000_000);

        let config = Config {
            provider,
            model,

            groq_api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            google_api_key: std::env::var("GOOGLE_API_KEY").unwrap_or_default(),
            xai_api_key: std::env::var("XAI_API_KEY").unwrap_or_default(),

            groq_base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| AIProvider::Groq.default_base_url().to_string()),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| AIProvider::OpenAI.default_base_url().to_string()),
            anthropic_base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| AIProvider::Anthropic.default_base_url().to_string()),
            google_base_url: std::env::var("GOOGLE_BASE_URL")
                .unwrap_or_else(|_| AIProvider::Google.default_base_url().to_string()),
            xai_base_url: std::env::var("XAI_BASE_URL")
                .unwrap_or_else(|_| AIProvider::XAI.default_base_url().to_string()),

            max_tokens,
            temperature,
            request_timeout_secs,
            connect_timeout_secs,
            cache_ttl_secs,
            cache_max_entries,
        };

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }
}
