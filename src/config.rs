use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

use crate::utils::password::DEFAULT_ITERATIONS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo { uri: String, db_name: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub cors_origin: String,
    pub store: StoreBackend,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub password_hash_iterations: u32,
}

impl Config {
    /// Reads configuration from the process environment (and `.env`, if present).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match try_load::<String, _>(&lookup, "STORE_BACKEND", "mongo")?.as_str() {
            "mongo" => StoreBackend::Mongo {
                uri: try_load(&lookup, "MONGO_URI", "mongodb://localhost:27017")?,
                db_name: try_load(&lookup, "DB_NAME", "polling_app")?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected \"mongo\" or \"memory\"".to_string(),
                })
            }
        };

        let session_secret = lookup("SESSION_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;

        let session_ttl_hours: i64 = try_load(&lookup, "SESSION_TTL_HOURS", "720")?;
        if session_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            server_addr: try_load(&lookup, "SERVER_ADDR", "0.0.0.0:8000")?,
            cors_origin: try_load(&lookup, "CORS_ORIGIN", "http://localhost:5173")?,
            store,
            session_secret,
            session_ttl_hours,
            password_hash_iterations: try_load(
                &lookup,
                "PASSWORD_HASH_ITERATIONS",
                &DEFAULT_ITERATIONS.to_string(),
            )?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[("SESSION_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.session_ttl_hours, 720);
        assert_eq!(config.password_hash_iterations, DEFAULT_ITERATIONS);
        assert_eq!(
            config.store,
            StoreBackend::Mongo {
                uri: "mongodb://localhost:27017".to_string(),
                db_name: "polling_app".to_string(),
            }
        );
    }

    #[test]
    fn session_secret_is_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SESSION_SECRET")));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("SESSION_SECRET", "s"),
            ("STORE_BACKEND", "redis"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STORE_BACKEND", .. }));
    }

    #[test]
    fn bad_address_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("SESSION_SECRET", "s"),
            ("SERVER_ADDR", "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SERVER_ADDR", .. }));
    }

    #[test]
    fn memory_backend_needs_no_mongo_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("SESSION_SECRET", "s"),
            ("STORE_BACKEND", "memory"),
        ]))
        .unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
    }
}
