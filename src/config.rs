use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::NexusError;

/// Optional config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "campus-nexus.toml";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub gemini: GeminiConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: Url,
    /// Fallback order, preferred model first.
    pub model_list: Vec<String>,
    /// Upper bound on a server-suggested wait before the single retry.
    pub max_retry_delay_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Url>,
    /// Retries for connection-level send failures only.
    pub connect_retries: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Url::parse(DEFAULT_GEMINI_BASE_URL).expect("default base url is valid"),
            model_list: vec![
                "gemini-2.5-pro".to_string(),
                "gemini-2.5-flash".to_string(),
            ],
            max_retry_delay_secs: 35.0,
            proxy: None,
            connect_retries: 2,
        }
    }
}

impl GeminiConfig {
    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.max_retry_delay_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub scholarships_path: PathBuf,
    pub housing_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            scholarships_path: PathBuf::from("../data/scholarships.csv"),
            housing_path: PathBuf::from("../data/housing.csv"),
        }
    }
}

impl Config {
    /// Layering: defaults, then `campus-nexus.toml`, then `NEXUS_*` env vars
    /// (`__` separates sections), then the bare `GEMINI_API_KEY`.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("NEXUS_").split("__"))
            .merge(
                Env::raw()
                    .only(&["GEMINI_API_KEY"])
                    .map(|_| "gemini.api_key".into()),
            )
    }

    pub fn load() -> Result<Self, NexusError> {
        let cfg: Config = Self::figment().extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), NexusError> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(NexusError::MissingApiKey);
        }
        if self.gemini.model_list.is_empty() {
            return Err(NexusError::InvalidConfig(
                "gemini.model_list must name at least one model".to_string(),
            ));
        }
        let cap = self.gemini.max_retry_delay_secs;
        Duration::try_from_secs_f64(cap).map_err(|e| {
            NexusError::InvalidConfig(format!(
                "gemini.max_retry_delay_secs must be a non-negative duration, got {cap}: {e}"
            ))
        })?;
        Ok(())
    }
}
