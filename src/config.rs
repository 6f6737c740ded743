// src/config.rs
use log::warn;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_NEWS_COUNT: usize = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HF_MODEL: &str = "ahmedrachid/FinancialBERT-Sentiment-Analysis";
pub const DEFAULT_HF_API_URL: &str = "https://router.huggingface.co/hf-inference/models";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBackend {
    HuggingFace,
    Lexicon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HuggingFaceConfig {
    pub api_url: String,
    pub model: String,
    pub api_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub yahoo_base_url: String,
    pub news_count: usize,
    pub http_timeout: Duration,
    pub backend: SentimentBackend,
    /// Only populated when the Hugging Face backend is selected.
    pub hugging_face: Option<HuggingFaceConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Read the configuration from the process environment.
    /// Call `dotenv().ok()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::new(format!("PORT must be a number, got '{}'", raw)))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let news_count = match get("NEWS_COUNT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::new(format!(
                        "NEWS_COUNT must be a positive number, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_NEWS_COUNT,
        };

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::new(format!("HTTP_TIMEOUT_SECS must be a number, got '{}'", raw))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let api_token = get("HF_API_TOKEN");
        let backend = match get("SENTIMENT_BACKEND").map(|b| b.to_ascii_lowercase()) {
            Some(b) if b == "huggingface" || b == "hf" => SentimentBackend::HuggingFace,
            Some(b) if b == "lexicon" => SentimentBackend::Lexicon,
            Some(other) => {
                return Err(ConfigError::new(format!(
                    "SENTIMENT_BACKEND must be 'huggingface' or 'lexicon', got '{}'",
                    other
                )))
            }
            None if api_token.is_some() => SentimentBackend::HuggingFace,
            None => SentimentBackend::Lexicon,
        };

        let hugging_face = match backend {
            SentimentBackend::HuggingFace => {
                let api_token = api_token.ok_or_else(|| {
                    ConfigError::new("HF_API_TOKEN must be set for the huggingface backend")
                })?;
                Some(HuggingFaceConfig {
                    api_url: get("HF_API_URL")
                        .unwrap_or_else(|| DEFAULT_HF_API_URL.to_string())
                        .trim_end_matches('/')
                        .to_string(),
                    model: get("HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
                    api_token,
                })
            }
            SentimentBackend::Lexicon => None,
        };

        Ok(AppConfig {
            port,
            yahoo_base_url: get("YAHOO_BASE_URL")
                .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            news_count,
            http_timeout: Duration::from_secs(timeout_secs),
            backend,
            hugging_face,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_use_lexicon_without_token() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.yahoo_base_url, DEFAULT_YAHOO_BASE_URL);
        assert_eq!(config.news_count, DEFAULT_NEWS_COUNT);
        assert_eq!(config.http_timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
        assert_eq!(config.backend, SentimentBackend::Lexicon);
        assert!(config.hugging_face.is_none());
    }

    #[test]
    fn token_selects_hugging_face() {
        let config = config_from(&[("HF_API_TOKEN", "hf_secret"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.backend, SentimentBackend::HuggingFace);
        let hf = config.hugging_face.unwrap();
        assert_eq!(hf.api_token, "hf_secret");
        assert_eq!(hf.model, DEFAULT_HF_MODEL);
        assert_eq!(hf.api_url, DEFAULT_HF_API_URL);
    }

    #[test]
    fn explicit_lexicon_ignores_token() {
        let vars = [("HF_API_TOKEN", "hf_secret"), ("SENTIMENT_BACKEND", "Lexicon")];
        let config = config_from(&vars).unwrap();
        assert_eq!(config.backend, SentimentBackend::Lexicon);
        assert!(config.hugging_face.is_none());
    }

    #[test]
    fn hugging_face_without_token_is_an_error() {
        let err = config_from(&[("SENTIMENT_BACKEND", "huggingface")]).unwrap_err();
        assert!(err.message.contains("HF_API_TOKEN"));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("NEWS_COUNT", "0")]).is_err());
        assert!(config_from(&[("HTTP_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config_from(&[("SENTIMENT_BACKEND", "bert")]).is_err());
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = config_from(&[("YAHOO_BASE_URL", "http://localhost:9000/")]).unwrap();
        assert_eq!(config.yahoo_base_url, "http://localhost:9000");
    }
}
