//! Process configuration, read from `.env` and the environment.

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8788";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: String,
    pub llm_timeout: Duration,
    pub search_timeout: Duration,
    pub verify_concurrency: usize,
    pub addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: DEFAULT_MODEL.to_string(),
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(DEFAULT_SEARCH_TIMEOUT_SECS),
            verify_concurrency: 1,
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let api_key = lookup("OPENAI_API_KEY").filter(|k| valid_api_key(k));
        let api_base = lookup("OPENAI_API_BASE").filter(|b| !b.trim().is_empty());
        let model = lookup("OPENAI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.model);

        let llm_timeout = match lookup("TRUTHLINE_LLM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_num("TRUTHLINE_LLM_TIMEOUT_SECS", &raw)?),
            None => defaults.llm_timeout,
        };
        let search_timeout = match lookup("TRUTHLINE_SEARCH_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_num("TRUTHLINE_SEARCH_TIMEOUT_SECS", &raw)?),
            None => defaults.search_timeout,
        };
        let verify_concurrency = match lookup("TRUTHLINE_VERIFY_CONCURRENCY") {
            Some(raw) => parse_num::<usize>("TRUTHLINE_VERIFY_CONCURRENCY", &raw)?.max(1),
            None => defaults.verify_concurrency,
        };
        let addr = lookup("TRUTHLINE_ADDR").unwrap_or(defaults.addr);

        Ok(Self {
            api_key,
            api_base,
            model,
            llm_timeout,
            search_timeout,
            verify_concurrency,
            addr,
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

/// Rejects empty keys and the `sk-...` style placeholders left in sample env files.
pub fn valid_api_key(key: &str) -> bool {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.contains("...") {
        return false;
    }
    true
}

fn parse_num<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
