//! Resolves Gemini settings from explicit overrides, then the environment, then defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use super::retry::RetryPolicy;
use super::LlmError;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Upper bounds for values that can arrive in request bodies.
pub const MAX_OVERRIDE_RETRIES: u32 = 5;
pub const MAX_OVERRIDE_TIMEOUT_MS: u64 = 120_000;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "GEMINI_MODEL";
pub const TIMEOUT_ENV: &str = "GEMINI_TIMEOUT_MS";
pub const RETRIES_ENV: &str = "GEMINI_RETRIES";
pub const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";

/// Per-call settings. Unset fields fall back to the environment or defaults.
/// `api_key` and `endpoint` are never taken from request bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmOverrides {
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(skip)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub retries: Option<u32>,
}

#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl LlmConfig {
    pub fn from_env(overrides: &LlmOverrides) -> Result<Self, LlmError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Fails with a config error when no API key can be found.
    pub fn resolve<F>(overrides: &LlmOverrides, env: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty(&overrides.api_key)
            .or_else(|| lookup(API_KEY_ENV))
            .ok_or_else(|| LlmError::Config(format!("Missing {API_KEY_ENV}.")))?;

        let model = non_empty(&overrides.model)
            .or_else(|| lookup(MODEL_ENV))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let endpoint = non_empty(&overrides.endpoint)
            .or_else(|| lookup(ENDPOINT_ENV))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let timeout_ms = match overrides.capped_timeout_ms() {
            Some(ms) => ms,
            None => parse_env(lookup(TIMEOUT_ENV), TIMEOUT_ENV)?.unwrap_or(DEFAULT_TIMEOUT_MS),
        };

        let mut retry = RetryPolicy::default();
        retry.retries = match overrides.capped_retries() {
            Some(n) => n,
            None => parse_env(lookup(RETRIES_ENV), RETRIES_ENV)?.unwrap_or(retry.retries),
        };

        Ok(Self {
            api_key,
            model,
            endpoint,
            timeout: Duration::from_millis(timeout_ms),
            retry,
        })
    }

    /// Applies only the explicitly set override fields to a copy of this config.
    pub fn with_overrides(&self, overrides: &LlmOverrides) -> Self {
        let mut config = self.clone();
        if let Some(api_key) = non_empty(&overrides.api_key) {
            config.api_key = api_key;
        }
        if let Some(model) = non_empty(&overrides.model) {
            config.model = model;
        }
        if let Some(endpoint) = non_empty(&overrides.endpoint) {
            config.endpoint = endpoint;
        }
        if let Some(ms) = overrides.capped_timeout_ms() {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = overrides.capped_retries() {
            config.retry.retries = retries;
        }
        config
    }

    /// `<endpoint>/<model>:generateContent`, with the model escaped as a single path segment.
    pub fn generate_url(&self) -> Result<Url, LlmError> {
        let mut url = Url::parse(self.endpoint.trim_end_matches('/'))
            .map_err(|e| LlmError::Config(format!("Invalid {ENDPOINT_ENV}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| LlmError::Config(format!("Invalid {ENDPOINT_ENV}: not a base URL")))?
            .pop_if_empty()
            .push(&format!("{}:generateContent", self.model));
        Ok(url)
    }
}

impl LlmOverrides {
    fn capped_timeout_ms(&self) -> Option<u64> {
        self.timeout_ms.map(|ms| ms.min(MAX_OVERRIDE_TIMEOUT_MS))
    }

    fn capped_retries(&self) -> Option<u32> {
        self.retries.map(|n| n.min(MAX_OVERRIDE_RETRIES))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_env<T: FromStr>(value: Option<String>, key: &str) -> Result<Option<T>, LlmError> {
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| LlmError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = LlmConfig::resolve(&LlmOverrides::default(), env(&[])).unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
        assert_eq!(err.to_string(), "Missing GEMINI_API_KEY.");
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let err = LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "   ")]))
            .unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_env_values_used() {
        let config = LlmConfig::resolve(
            &LlmOverrides::default(),
            env(&[
                (API_KEY_ENV, "k"),
                (MODEL_ENV, "gemini-2.0-pro"),
                (TIMEOUT_ENV, "5000"),
                (RETRIES_ENV, "4"),
            ]),
        )
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.retry.retries, 4);
    }

    #[test]
    fn test_explicit_overrides_win_over_env() {
        let overrides = LlmOverrides {
            api_key: Some("explicit".to_string()),
            model: Some("custom-model".to_string()),
            timeout_ms: Some(1000),
            retries: Some(0),
            ..LlmOverrides::default()
        };
        let config = LlmConfig::resolve(
            &overrides,
            env(&[(API_KEY_ENV, "from-env"), (MODEL_ENV, "env-model"), (RETRIES_ENV, "5")]),
        )
        .unwrap();
        assert_eq!(config.api_key, "explicit");
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.timeout, Duration::from_millis(1000));
        assert_eq!(config.retry.retries, 0);
    }

    #[test]
    fn test_invalid_numeric_env_is_config_error() {
        let err = LlmConfig::resolve(
            &LlmOverrides::default(),
            env(&[(API_KEY_ENV, "k"), (TIMEOUT_ENV, "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_with_overrides_only_touches_set_fields() {
        let base = LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "k")])).unwrap();
        let derived = base.with_overrides(&LlmOverrides {
            retries: Some(5),
            ..LlmOverrides::default()
        });
        assert_eq!(derived.retry.retries, 5);
        assert_eq!(derived.model, base.model);
        assert_eq!(derived.api_key, base.api_key);
    }

    #[test]
    fn test_overrides_deserialize_without_secrets() {
        let overrides: LlmOverrides =
            serde_json::from_str(r#"{"model": "m", "api_key": "nope", "retries": 1}"#).unwrap();
        assert_eq!(overrides.model.as_deref(), Some("m"));
        assert!(overrides.api_key.is_none());
        assert_eq!(overrides.retries, Some(1));
    }

    #[test]
    fn test_generate_url() {
        let mut config =
            LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "k")])).unwrap();
        config.endpoint = "http://localhost:9000/models/".to_string();
        assert_eq!(
            config.generate_url().unwrap().as_str(),
            "http://localhost:9000/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_generate_url_keeps_model_in_one_segment() {
        let mut config =
            LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "k")])).unwrap();
        config.endpoint = "http://localhost:9000/v1beta/models".to_string();
        config.model = "../../admin/x?steal=1#".to_string();

        let url = config.generate_url().unwrap();
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(&segments[..2], &["v1beta", "models"]);
        assert!(segments[2].ends_with(":generateContent"));
        assert!(!segments[2].contains('/'));
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_generate_url_on_bare_host() {
        let mut config =
            LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "k")])).unwrap();
        config.endpoint = "http://localhost:9000".to_string();
        assert_eq!(
            config.generate_url().unwrap().as_str(),
            "http://localhost:9000/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let mut config =
            LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "k")])).unwrap();
        config.endpoint = "not a url".to_string();
        assert!(matches!(config.generate_url(), Err(LlmError::Config(_))));
    }

    #[test]
    fn test_request_overrides_are_capped() {
        let base = LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "k")])).unwrap();
        let overrides = LlmOverrides {
            retries: Some(4_000_000_000),
            timeout_ms: Some(u64::MAX),
            ..LlmOverrides::default()
        };

        let derived = base.with_overrides(&overrides);
        assert_eq!(derived.retry.retries, MAX_OVERRIDE_RETRIES);
        assert_eq!(derived.timeout, Duration::from_millis(MAX_OVERRIDE_TIMEOUT_MS));

        let resolved = LlmConfig::resolve(&overrides, env(&[(API_KEY_ENV, "k")])).unwrap();
        assert_eq!(resolved.retry.retries, MAX_OVERRIDE_RETRIES);
        assert_eq!(resolved.timeout, Duration::from_millis(MAX_OVERRIDE_TIMEOUT_MS));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            LlmConfig::resolve(&LlmOverrides::default(), env(&[(API_KEY_ENV, "secret-key")]))
                .unwrap();
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
