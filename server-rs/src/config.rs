use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

const DEFAULT_CORS_ORIGINS: &str = "http://127.0.0.1:5173,http://localhost:5173";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted backend reached through its REST table interface.
    Postgrest,
    /// Direct connection to the backing Postgres database.
    Postgres,
    /// In-process tables, nothing survives a restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgrest" => Ok(Self::Postgrest),
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub backend: StoreBackend,
    pub postgrest: Option<PostgrestConfig>,
    pub db: Option<DbConfig>,
}

#[derive(Clone, Debug)]
pub struct PostgrestConfig {
    pub url: String,
    pub service_key: String,
}

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub url: String,
    pub pool_max: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let backend = match get("STORE_BACKEND") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: raw,
            })?,
            None => StoreBackend::Postgrest,
        };

        let postgrest = match backend {
            StoreBackend::Postgrest => Some(PostgrestConfig {
                url: require("SUPABASE_URL")?,
                service_key: require("SUPABASE_SERVICE_KEY")?,
            }),
            _ => None,
        };

        let db = match backend {
            StoreBackend::Postgres => Some(DbConfig {
                url: require("DATABASE_URL")?,
                pool_max: parse_or(get("DB_POOL_MAX"), "DB_POOL_MAX", 5)?,
            }),
            _ => None,
        };

        Ok(Self {
            host: parse_or(get("HOST"), "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(get("PORT"), "PORT", 8000)?,
            cors_origins: get("CORS_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            backend,
            postgrest,
            db,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
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
    fn postgrest_is_the_default_backend() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "service-key"),
        ]))
        .unwrap();

        assert_eq!(config.backend, StoreBackend::Postgrest);
        let rest = config.postgrest.unwrap();
        assert_eq!(rest.url, "https://example.supabase.co");
        assert_eq!(rest.service_key, "service-key");
        assert!(config.db.is_none());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let err = Config::from_lookup(lookup(&[("SUPABASE_URL", "https://example.supabase.co")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_SERVICE_KEY"));

        let err = Config::from_lookup(lookup(&[("SUPABASE_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));
    }

    #[test]
    fn postgres_backend_needs_database_url() {
        let err = Config::from_lookup(lookup(&[("STORE_BACKEND", "postgres")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/roster"),
            ("DB_POOL_MAX", "12"),
        ]))
        .unwrap();
        assert_eq!(config.backend, StoreBackend::Postgres);
        assert_eq!(config.db.unwrap().pool_max, 12);
    }

    #[test]
    fn memory_backend_needs_nothing() {
        let config = Config::from_lookup(lookup(&[("STORE_BACKEND", "memory")])).unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(
            config.cors_origins,
            vec!["http://127.0.0.1:5173", "http://localhost:5173"]
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        for backend in ["mongo", "pg", "supabase"] {
            let err = Config::from_lookup(lookup(&[("STORE_BACKEND", backend)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "STORE_BACKEND", .. }));
        }

        let err = Config::from_lookup(lookup(&[("STORE_BACKEND", "memory"), ("PORT", "http")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "http".into()
            }
        );
    }

    #[test]
    fn cors_origins_can_be_overridden() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("CORS_ORIGINS", "https://roster.example.com, ,http://localhost:3000"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["https://roster.example.com", "http://localhost:3000"]
        );
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9000");
    }
}
