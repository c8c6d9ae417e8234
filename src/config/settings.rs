//! Service configuration, loaded once at startup from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_address: SocketAddr,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub default_model: String,
    pub llm_timeout: Duration,
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub stt_model: String,
    pub qr_base_url: String,
    pub max_upload_bytes: usize,
    pub voice_session_ttl: Duration,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// `.env` is skipped under `cfg(test)` so unit tests stay hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let bind_address = or_default("BIND_ADDRESS", "0.0.0.0:8080");
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let mongodb_uri =
            get("MONGODB_URI").ok_or_else(|| ConfigError::MissingVar("MONGODB_URI".to_string()))?;

        let llm_timeout = parse_number::<u64>(&get, "LLM_TIMEOUT_SECS", 60)?;
        if llm_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "LLM_TIMEOUT_SECS".to_string(),
                "timeout must be at least one second".to_string(),
            ));
        }

        let max_upload_bytes = parse_number::<usize>(&get, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        let voice_session_ttl = parse_number::<u64>(&get, "VOICE_SESSION_TTL_SECS", 900)?;
        if voice_session_ttl == 0 {
            return Err(ConfigError::InvalidValue(
                "VOICE_SESSION_TTL_SECS".to_string(),
                "ttl must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            mongodb_uri,
            mongodb_database: or_default("MONGODB_DATABASE", "proofchain"),
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_base_url: or_default("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1"),
            default_model: or_default("DEFAULT_MODEL", "xiaomi/mimo-v2-flash:free"),
            llm_timeout: Duration::from_secs(llm_timeout),
            groq_api_key: get("GROQ_API_KEY"),
            groq_base_url: or_default("GROQ_BASE_URL", "https://api.groq.com/openai/v1"),
            stt_model: or_default("STT_MODEL", "whisper-large-v3-turbo"),
            qr_base_url: or_default("QR_BASE_URL", "https://api.qrserver.com/v1/create-qr-code/"),
            max_upload_bytes,
            voice_session_ttl: Duration::from_secs(voice_session_ttl),
        })
    }
}

fn parse_number<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_mongodb_uri_is_set() {
        let settings = Settings::from_lookup(lookup(&[("MONGODB_URI", "mongodb://localhost:27017")])).unwrap();

        assert_eq!(settings.bind_address.port(), 8080);
        assert_eq!(settings.mongodb_database, "proofchain");
        assert_eq!(settings.default_model, "xiaomi/mimo-v2-flash:free");
        assert_eq!(settings.llm_timeout, Duration::from_secs(60));
        assert_eq!(settings.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.voice_session_ttl, Duration::from_secs(900));
        assert!(settings.openrouter_api_key.is_none());
        assert!(settings.groq_api_key.is_none());
    }

    #[test]
    fn missing_mongodb_uri_is_reported() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("MONGODB_URI".to_string()));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let settings = Settings::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("OPENROUTER_API_KEY", "   "),
        ]))
        .unwrap();

        assert!(settings.openrouter_api_key.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Settings::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("BIND_ADDRESS", "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "BIND_ADDRESS"));

        let err = Settings::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "LLM_TIMEOUT_SECS"));

        let err = Settings::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("VOICE_SESSION_TTL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "VOICE_SESSION_TTL_SECS"));
    }
}
