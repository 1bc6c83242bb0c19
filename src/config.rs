//! Service configuration.
//!
//! Values come from the environment (a `.env` file is loaded first when
//! present).  Every variable has a default except `PLANT_ID_API_KEY`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::classifier::adapter::DEFAULT_TOP_K;
use crate::identify::{IdentifyConfig, DEFAULT_PLANT_ID_URL};

/// Longest side an upload is scaled down to.
pub const DEFAULT_MAX_DIMENSION: u32 = 800;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub upload_dir: PathBuf,
    pub max_dimension: u32,
    pub top_k: usize,
    pub summary_policy_path: Option<PathBuf>,
    pub identify: IdentifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_owned(),
            port: 5000,
            model_path: PathBuf::from("models/plant_classifier.json"),
            upload_dir: PathBuf::from("uploads"),
            max_dimension: DEFAULT_MAX_DIMENSION,
            top_k: DEFAULT_TOP_K,
            summary_policy_path: None,
            identify: IdentifyConfig::default(),
        }
    }
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_secs: u64 = parse_or(&get, "PLANT_ID_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Zero { name: "PLANT_ID_TIMEOUT_SECS" });
        }
        let max_dimension: u32 = parse_or(&get, "MAX_IMAGE_DIMENSION", defaults.max_dimension)?;
        if max_dimension == 0 {
            return Err(ConfigError::Zero { name: "MAX_IMAGE_DIMENSION" });
        }
        let top_k: usize = parse_or(&get, "TOP_K", defaults.top_k)?;
        if top_k == 0 {
            return Err(ConfigError::Zero { name: "TOP_K" });
        }

        Ok(Config {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            model_path: get("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path),
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            max_dimension,
            top_k,
            summary_policy_path: get("SUMMARY_POLICY_PATH").map(PathBuf::from),
            identify: IdentifyConfig {
                url: get("PLANT_ID_URL").unwrap_or_else(|| DEFAULT_PLANT_ID_URL.to_owned()),
                api_key: get("PLANT_ID_API_KEY"),
                language: get("PLANT_LANGUAGE").unwrap_or_else(|| "en".to_owned()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.max_dimension, 800);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.identify.timeout, Duration::from_secs(30));
        assert!(config.identify.api_key.is_none());
        assert!(config.summary_policy_path.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("PLANT_ID_API_KEY", "secret"),
            ("PLANT_LANGUAGE", "pt"),
            ("PLANT_ID_TIMEOUT_SECS", "5"),
            ("UPLOAD_DIR", "/tmp/up"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.identify.api_key.as_deref(), Some("secret"));
        assert_eq!(config.identify.language, "pt");
        assert_eq!(config.identify.timeout, Duration::from_secs(5));
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/up"));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = Config::from_lookup(lookup(&[("MAX_IMAGE_DIMENSION", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Zero { name: "MAX_IMAGE_DIMENSION" }));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("PLANT_ID_API_KEY", "  ")])).unwrap();
        assert!(config.identify.api_key.is_none());
    }
}
