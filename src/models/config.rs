//! Configuration module for SithWash
//!
//! All tunables come from environment variables with defaults taken from
//! `utils::constants`. Parsing goes through a lookup function so tests do not
//! touch the process environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS, DEFAULT_FRAUD_RATE, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_SAMPLE_COUNT, ENV_CACHE_MAX_ENTRIES, ENV_CACHE_TTL_SECS,
    ENV_FRAUD_RATE, ENV_HOST, ENV_MODEL_PATH, ENV_PORT, ENV_PORT_FALLBACK, ENV_SAMPLE_COUNT,
    ENV_STRICT_SCHEMA, MAX_SAMPLE_COUNT,
};

/// Runtime configuration shared by the CLI and the API server
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Alternate model schema; the built-in schema is used when `None`
    pub model_path: Option<PathBuf>,
    /// Reject misaligned schemas instead of warning
    pub strict_schema: bool,
    /// API bind host
    pub host: String,
    /// API bind port
    pub port: u16,
    /// Default synthetic batch size
    pub sample_count: usize,
    /// Share of synthetic transactions generated with fraudulent ranges
    pub fraud_rate: f64,
    /// Lifetime of cached generated transactions
    pub cache_ttl: Duration,
    /// Most transactions kept retrievable by id at once
    pub cache_max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            strict_schema: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sample_count: DEFAULT_SAMPLE_COUNT,
            fraud_rate: DEFAULT_FRAUD_RATE,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl AppConfig {
    /// Build from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model_path = get(ENV_MODEL_PATH).map(PathBuf::from);

        let strict_schema = match get(ENV_STRICT_SCHEMA) {
            Some(raw) => parse_bool(ENV_STRICT_SCHEMA, &raw)?,
            None => defaults.strict_schema,
        };

        let host = get(ENV_HOST).unwrap_or(defaults.host);

        // Hosting platforms set PORT; SITHWASH_PORT is for local runs
        let port_var = get(ENV_PORT)
            .map(|v| (ENV_PORT, v))
            .or_else(|| get(ENV_PORT_FALLBACK).map(|v| (ENV_PORT_FALLBACK, v)));
        let port = match port_var {
            Some((key, raw)) => parse_value::<u16>(key, &raw)?,
            None => defaults.port,
        };

        let sample_count = match get(ENV_SAMPLE_COUNT) {
            Some(raw) => {
                let count = parse_value::<usize>(ENV_SAMPLE_COUNT, &raw)?;
                if count == 0 || count > MAX_SAMPLE_COUNT {
                    return Err(AppError::invalid_config(ENV_SAMPLE_COUNT, &raw));
                }
                count
            }
            None => defaults.sample_count,
        };

        let fraud_rate = match get(ENV_FRAUD_RATE) {
            Some(raw) => {
                let rate = parse_value::<f64>(ENV_FRAUD_RATE, &raw)?;
                if !(0.0..=1.0).contains(&rate) {
                    return Err(AppError::invalid_config(ENV_FRAUD_RATE, &raw));
                }
                rate
            }
            None => defaults.fraud_rate,
        };

        let cache_ttl = match get(ENV_CACHE_TTL_SECS) {
            Some(raw) => Duration::from_secs(parse_value::<u64>(ENV_CACHE_TTL_SECS, &raw)?),
            None => defaults.cache_ttl,
        };

        let cache_max_entries = match get(ENV_CACHE_MAX_ENTRIES) {
            Some(raw) => {
                let max = parse_value::<usize>(ENV_CACHE_MAX_ENTRIES, &raw)?;
                if max == 0 {
                    return Err(AppError::invalid_config(ENV_CACHE_MAX_ENTRIES, &raw));
                }
                max
            }
            None => defaults.cache_max_entries,
        };

        Ok(Self {
            model_path,
            strict_schema,
            host,
            port,
            sample_count,
            fraud_rate,
            cache_ttl,
            cache_max_entries,
        })
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::invalid_config(key, raw))
}

fn parse_bool(key: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::invalid_config(key, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SITHWASH_MODEL_PATH", "/tmp/model.json"),
            ("SITHWASH_STRICT_SCHEMA", "true"),
            ("SITHWASH_PORT", "9000"),
            ("SITHWASH_SAMPLE_COUNT", "50"),
            ("SITHWASH_FRAUD_RATE", "0.5"),
            ("SITHWASH_CACHE_TTL_SECS", "60"),
            ("SITHWASH_CACHE_MAX_ENTRIES", "2000"),
        ]))
        .unwrap();

        assert_eq!(config.model_path, Some(PathBuf::from("/tmp/model.json")));
        assert!(config.strict_schema);
        assert_eq!(config.port, 9000);
        assert_eq!(config.sample_count, 50);
        assert_eq!(config.fraud_rate, 0.5);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.cache_max_entries, 2000);
    }

    #[test]
    fn test_platform_port_wins() {
        let config =
            AppConfig::from_lookup(lookup(&[("PORT", "3000"), ("SITHWASH_PORT", "9000")])).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("SITHWASH_PORT", "not-a-port"),
            ("SITHWASH_FRAUD_RATE", "1.5"),
            ("SITHWASH_SAMPLE_COUNT", "0"),
            ("SITHWASH_SAMPLE_COUNT", "100000"),
            ("SITHWASH_STRICT_SCHEMA", "maybe"),
            ("SITHWASH_CACHE_MAX_ENTRIES", "0"),
        ] {
            let err = AppConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert_eq!(err.code, ErrorCode::ConfigInvalidValue, "{}={}", key, value);
        }
    }
}
