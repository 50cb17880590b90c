use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

use crate::error::{PortalError, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub tick_interval: Duration,

    // Session + logs
    pub token_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:5000/api".to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?; // 10 s
        let tick_interval_ms: u64 = parse_or(&lookup, "TICK_INTERVAL_MS", 1000)?; // 1 tick per second

        if tick_interval_ms == 0 {
            return Err(PortalError::Config(
                "TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            tick_interval: Duration::from_millis(tick_interval_ms),
            token_file: lookup("TOKEN_FILE")
                .unwrap_or_else(|| ".hrm-portal-token".to_string())
                .into(),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()).into(),
        })
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| PortalError::Config(format!("{key} must be a whole number, got {raw:?}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.token_file, PathBuf::from(".hrm-portal-token"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let config =
            Config::from_lookup(lookup_from(&[("API_BASE_URL", "https://hr.example.com/api/")]))
                .unwrap();
        assert_eq!(config.api_base_url, "https://hr.example.com/api");
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "ten")])).unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let err = Config::from_lookup(lookup_from(&[("TICK_INTERVAL_MS", "0")])).unwrap_err();
        assert!(matches!(err, PortalError::Config(_)));
    }
}
