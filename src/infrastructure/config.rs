use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{warn, Level};

use super::logging::LoggingConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_dir: String,
    pub log_to_file: bool,
}

impl AppConfig {
    /// Loads `.env` if present, then reads overrides from the environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("BANKING_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid BANKING_PORT '{}', using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(raw) if Level::from_str(&raw).is_ok() => raw.to_lowercase(),
            Some(raw) => {
                warn!("Ignoring invalid LOG_LEVEL '{}', using {}", raw, defaults.log_level);
                defaults.log_level.clone()
            }
            None => defaults.log_level.clone(),
        };

        let log_to_file = match lookup("LOG_TO_FILE").as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") | None => false,
            Some(other) => {
                warn!("Ignoring invalid LOG_TO_FILE '{}'", other);
                defaults.log_to_file
            }
        };

        Self {
            host: lookup("BANKING_HOST").unwrap_or(defaults.host),
            port,
            log_level,
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
            log_to_file,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            log_dir: self.log_dir.clone(),
            enable_console: true,
            enable_file: self.log_to_file,
            log_level: Level::from_str(&self.log_level).unwrap_or(Level::INFO),
            ..LoggingConfig::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            log_to_file: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert!(!config.log_to_file);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BANKING_HOST", "0.0.0.0"),
            ("BANKING_PORT", "3000"),
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_DIR", "/tmp/banking"),
            ("LOG_TO_FILE", "yes"),
        ]);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_to_file);

        let logging = config.logging();
        assert_eq!(logging.log_level, Level::DEBUG);
        assert!(logging.enable_file);
        assert_eq!(logging.log_dir, "/tmp/banking");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("BANKING_PORT", "not-a-port"),
            ("LOG_LEVEL", "loud"),
            ("LOG_TO_FILE", "maybe"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert!(!config.log_to_file);
    }

    #[test]
    fn test_bad_host_is_an_error() {
        let config = config_from(&[("BANKING_HOST", "not a host")]);
        assert!(config.socket_addr().is_err());
    }
}
