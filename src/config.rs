use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// Upstream data sources the researchers know how to talk to.
///
/// Configuration refers to providers by [`ProviderKind::config_key`], not by variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    DexScreener,
    LunarCrush,
    Twitter,
    Weather,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::DexScreener,
        ProviderKind::LunarCrush,
        ProviderKind::Twitter,
        ProviderKind::Weather,
    ];

    /// Key under which the provider's API key is stored in [`SdkConfig::api_keys`].
    pub fn config_key(self) -> &'static str {
        match self {
            ProviderKind::DexScreener => "dexscreener",
            ProviderKind::LunarCrush => "lunarCrush",
            ProviderKind::Twitter => "twitter",
            ProviderKind::Weather => "weather",
        }
    }

    /// Environment variable read by [`SdkConfig::from_env`].
    pub fn env_var(self) -> &'static str {
        match self {
            ProviderKind::DexScreener => "DEXSCREENER_API_KEY",
            ProviderKind::LunarCrush => "LUNAR_CRUSH_API_KEY",
            ProviderKind::Twitter => "TWITTER_API_KEY",
            ProviderKind::Weather => "WEATHER_API_KEY",
        }
    }
}

/// SDK-wide configuration: the owning agent and one API key per provider.
///
/// Keys that are not recognized are kept but never read. A provider whose key is
/// missing receives an empty string and is expected to fail on its first request.
///
/// # Examples
///
/// ```
/// use waifu_sdk::config::{ProviderKind, SdkConfig};
///
/// let config: SdkConfig = serde_json::from_str(
///     r#"{"agentId": "agent-1", "apiKeys": {"lunarCrush": "lc-key"}}"#,
/// )
/// .unwrap();
/// assert_eq!(config.api_key(ProviderKind::LunarCrush), "lc-key");
/// assert_eq!(config.api_key(ProviderKind::Twitter), "");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    pub agent_id: String,
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

impl SdkConfig {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            api_keys: HashMap::new(),
        }
    }

    pub fn with_api_key(mut self, provider: ProviderKind, key: impl Into<String>) -> Self {
        self.api_keys
            .insert(provider.config_key().to_string(), key.into());
        self
    }

    /// Reads every provider key from its environment variable.
    ///
    /// Unset or blank variables are skipped, which leaves the key empty.
    pub fn from_env(agent_id: impl Into<String>) -> Self {
        let mut config = Self::new(agent_id);
        for provider in ProviderKind::ALL {
            if let Some(key) = load_env_var(provider.env_var()) {
                config = config.with_api_key(provider, key);
            }
        }
        config
    }

    /// Returns the provider's API key, or `""` when none was configured.
    pub fn api_key(&self, provider: ProviderKind) -> &str {
        self.api_keys
            .get(provider.config_key())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Settings for [`crate::transformer::OpenAiTransformer`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerConfig {
    pub api_key: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// OpenAI-compatible endpoint, `https://api.openai.com` when unset.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl TransformerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds a config from `OPENAI_API_KEY` and the optional `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, SdkError> {
        let api_key = load_env_var("OPENAI_API_KEY")
            .ok_or_else(|| SdkError::invalid_config("OPENAI_API_KEY", "variable is not set"))?;
        let mut config = Self::new(api_key);
        config.base_url = load_env_var("OPENAI_BASE_URL");
        Ok(config)
    }

    pub fn resolved_temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn resolved_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

fn load_env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
