use std::path::PathBuf;
use std::time::Duration;

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Public base URL of the site, used for the sitemap.
    pub site_url: String,
    /// Chat relay settings.
    pub llm: LlmConfig,
}

/// Which slot a provider occupies in the relay's priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSlot {
    Primary,
    Fallback,
}

impl ProviderSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderSlot::Primary => "primary",
            ProviderSlot::Fallback => "fallback",
        }
    }
}

/// Connection settings for one OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub slot: ProviderSlot,
    /// Human-readable provider name for logs and status ("groq", "openai").
    pub name: String,
    /// API root, e.g. `https://api.openai.com/v1`. `/chat/completions` is appended.
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl ProviderConfig {
    /// A provider is available iff it has a non-empty API key.
    pub fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Settings for the chat relay.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub primary: ProviderConfig,
    pub fallback: ProviderConfig,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on a single upstream round trip.
    pub timeout_ms: u64,
    /// Optional JSON file overriding the built-in persona.
    pub persona_file: Option<PathBuf>,
}

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

impl LlmConfig {
    /// Providers in priority order, regardless of availability.
    pub fn providers(&self) -> [&ProviderConfig; 2] {
        [&self.primary, &self.fallback]
    }

    /// First provider with a key configured.
    pub fn active_provider(&self) -> Option<&ProviderConfig> {
        self.providers().into_iter().find(|p| p.is_available())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn from_env() -> Self {
        LlmConfig {
            primary: ProviderConfig {
                slot: ProviderSlot::Primary,
                name: "groq".to_string(),
                base_url: env_or("GROQ_BASE_URL", "https://api.groq.com/openai/v1"),
                api_key: env_key("GROQ_API_KEY"),
                model: env_or("GROQ_MODEL", "llama3-8b-8192"),
            },
            fallback: ProviderConfig {
                slot: ProviderSlot::Fallback,
                name: "openai".to_string(),
                base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                api_key: env_key("OPENAI_API_KEY"),
                model: env_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            },
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_ms: std::env::var("CHAT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            persona_file: std::env::var("PERSONA_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            primary: ProviderConfig {
                slot: ProviderSlot::Primary,
                name: "groq".to_string(),
                base_url: "https://api.groq.com/openai/v1".to_string(),
                api_key: None,
                model: "llama3-8b-8192".to_string(),
            },
            fallback: ProviderConfig {
                slot: ProviderSlot::Fallback,
                name: "openai".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: None,
                model: "gpt-3.5-turbo".to_string(),
            },
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            persona_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        AppConfig {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            host: env_or("HOST", "0.0.0.0"),
            site_url: env_or("SITE_URL", "https://example.dev"),
            llm: LlmConfig::from_env(),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 8080,
            host: "0.0.0.0".to_string(),
            site_url: "https://example.dev".to_string(),
            llm: LlmConfig::default(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_key(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
