use std::env;
use std::net::IpAddr;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

const DEFAULT_DB_NAME: &str = "tracker";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,https://devaseesh.netlify.app";
const DEFAULT_PLACEHOLDER_IP: &str = "8.8.8.8";

/// Where visitor records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    /// Process-local, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be `mongodb` or `memory`, got `{other}`"),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Required for the MongoDB backend only
    pub mongo_url: Option<String>,
    pub mongo_db_name: String,
    pub bind_address: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Stored in place of loopback client addresses
    pub placeholder_ip: IpAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store_backend = match var("STORE_BACKEND") {
            Some(raw) => raw.parse::<StoreBackend>()?,
            None => StoreBackend::MongoDb,
        };

        let mongo_url = var("MONGO_URL");
        if store_backend == StoreBackend::MongoDb && mongo_url.is_none() {
            bail!("MONGO_URL not set");
        }

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let placeholder_raw =
            var("PLACEHOLDER_IP").unwrap_or_else(|| DEFAULT_PLACEHOLDER_IP.to_string());
        let placeholder_ip = placeholder_raw
            .trim()
            .parse::<IpAddr>()
            .with_context(|| format!("PLACEHOLDER_IP is not an IP address: {placeholder_raw}"))?;

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            store_backend,
            mongo_url,
            mongo_db_name: var("MONGO_DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            cors_origins,
            placeholder_ip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_mongo_url_is_set() {
        let config = Config::from_lookup(lookup_from(&[("MONGO_URL", "mongodb://db:27017")]))
            .unwrap();

        assert_eq!(config.store_backend, StoreBackend::MongoDb);
        assert_eq!(config.mongo_url.as_deref(), Some("mongodb://db:27017"));
        assert_eq!(config.mongo_db_name, "tracker");
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.placeholder_ip.to_string(), "8.8.8.8");
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "https://devaseesh.netlify.app"]
        );
    }

    #[test]
    fn missing_mongo_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap_err();
        assert!(err.to_string().contains("MONGO_URL"));
    }

    #[test]
    fn memory_backend_needs_no_mongo_url() {
        let config = Config::from_lookup(lookup_from(&[("STORE_BACKEND", "Memory")])).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.mongo_url, None);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "redis"),
            ("MONGO_URL", "mongodb://localhost"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("STORE_BACKEND"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGO_URL", "mongodb://localhost"),
            ("MONGO_DB_NAME", "visits"),
            ("PORT", "8080"),
            ("CORS_ORIGINS", " https://a.example , ,https://b.example"),
            ("PLACEHOLDER_IP", "203.0.113.7"),
        ]))
        .unwrap();

        assert_eq!(config.mongo_db_name, "visits");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.placeholder_ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn invalid_port_and_placeholder_are_rejected() {
        assert!(
            Config::from_lookup(lookup_from(&[("MONGO_URL", "m"), ("PORT", "http")])).is_err()
        );
        assert!(
            Config::from_lookup(lookup_from(&[("MONGO_URL", "m"), ("PLACEHOLDER_IP", "x")]))
                .is_err()
        );
    }
}
