use std::env;
use thiserror::Error;

const MIN_SECRET_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Colorcor REST API, without trailing slash.
    pub api_base_url: String,
    pub port: u16,
    pub api_timeout_secs: u64,
    /// Max-age of the session cookies.
    pub session_hours: i64,
    /// Master key for signing the session cookies, at least 64 bytes.
    pub session_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = env::var("API_BASE_URL")
            .map_err(|_| ConfigError::Missing("API_BASE_URL"))?
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_base_url,
            port: parse_var("PORT", 3000)?,
            api_timeout_secs: parse_var("API_TIMEOUT_SECS", 15)?,
            session_hours: parse_var("SESSION_HOURS", 24)?,
            session_secret: secret_var("SESSION_SECRET")?,
        })
    }
}

/// Cookie signing keys need 64 bytes of material. The value is never echoed.
fn secret_var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.len() < MIN_SECRET_LEN => Err(ConfigError::Invalid {
            name,
            value: format!("{} bytes, se requieren {}", value.len(), MIN_SECRET_LEN),
        }),
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let port: u16 = parse_var("COLORCOR_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("COLORCOR_TEST_BAD_TIMEOUT", "quince");
        let result: Result<u64, _> = parse_var("COLORCOR_TEST_BAD_TIMEOUT", 15);
        assert!(matches!(result, Err(ConfigError::Invalid { name: "COLORCOR_TEST_BAD_TIMEOUT", .. })));
    }

    #[test]
    fn test_short_session_secret_is_rejected_without_echoing_it() {
        env::set_var("COLORCOR_TEST_SHORT_SECRET", "corto");
        match secret_var("COLORCOR_TEST_SHORT_SECRET") {
            Err(ConfigError::Invalid { value, .. }) => assert!(!value.contains("corto")),
            other => panic!("unexpected {:?}", other),
        }

        env::set_var("COLORCOR_TEST_LONG_SECRET", "k".repeat(64));
        assert_eq!(secret_var("COLORCOR_TEST_LONG_SECRET").unwrap().map(|s| s.len()), Some(64));
        assert_eq!(secret_var("COLORCOR_TEST_UNSET_SECRET").unwrap(), None);
    }
}
