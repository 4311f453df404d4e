// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, path::Path, path::PathBuf};

pub const ENV_AI_CONFIG_PATH: &str = "DEAL_AI_CONFIG_PATH";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "DEAL_SCANNER_MODEL";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-5-nano";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    120
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Only "openai" is supported (case-insensitive).
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Never print the key itself.
impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("key_len", &self.api_key.len())
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AiConfig = serde_json::from_str(&data)?;

        cfg.provider = cfg.provider.to_lowercase();
        if cfg.provider != "openai" {
            anyhow::bail!("Unsupported provider in config: {}", cfg.provider);
        }

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = env::var(ENV_OPENAI_API_KEY)
                .map_err(|_| anyhow::anyhow!("Missing {ENV_OPENAI_API_KEY} env var"))?;
        }

        cfg.base_url = cfg.base_url.trim_end_matches('/').to_string();
        if cfg.timeout_secs == 0 {
            cfg.timeout_secs = default_timeout_secs();
        }
        Ok(cfg)
    }

    /// Build from environment only. A missing key is left empty and reported
    /// by the model client at call time.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.api_key = env::var(ENV_OPENAI_API_KEY).unwrap_or_default();
        if let Ok(model) = env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                cfg.model = model.trim().to_string();
            }
        }
        if let Ok(url) = env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                cfg.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        cfg
    }

    /// 1) $DEAL_AI_CONFIG_PATH  2) config/ai.json  3) environment only
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_AI_CONFIG_PATH) {
            return Self::load_from_file(PathBuf::from(p));
        }
        let json_p = PathBuf::from("config/ai.json");
        if json_p.exists() {
            return Self::load_from_file(json_p);
        }
        Ok(Self::from_env())
    }
}
