//! Configuration schema. YAML loading and CLI parsing are external
//! collaborators; this struct only fixes the recognized keys and a
//! `Config::from_env` convenience loader, plus a constructor a YAML (or
//! other) loader can hand a pre-parsed value to.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Empty = all registered adapters.
    #[serde(default)]
    pub enabled_parsers: Vec<String>,
    #[serde(with = "duration_secs", default = "default_interval")]
    pub interval: Duration,
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub bookmakers: HashMap<String, BookmakerConfig>,
    /// name -> base URL; non-empty enables orchestrator mode.
    #[serde(default)]
    pub bookmaker_services: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmakerConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub mirror_url: Option<String>,
    #[serde(default)]
    pub proxy_list: Vec<String>,
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    pub port: u16,
    #[serde(with = "duration_secs")]
    pub read_header_timeout: Duration,
    #[serde(with = "opt_duration_secs", default)]
    pub async_parsing_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueCalculatorConfig {
    #[serde(default)]
    pub sports: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub parser: ParserConfig,
    pub health: HealthConfig,
    #[serde(default)]
    pub value_calculator: ValueCalculatorConfig,
}

impl Config {
    /// Validate the fatal-at-startup invariants: missing
    /// `health.port`/`health.read_header_timeout` is a construction error
    /// (here: `health.port == 0` stands in for "missing" since the field
    /// itself is required by the deserializer).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.health.port == 0 {
            return Err(ConfigError::MissingKey("health.port"));
        }
        if self.health.read_header_timeout.is_zero() {
            return Err(ConfigError::MissingKey("health.read_header_timeout"));
        }
        Ok(())
    }

    pub fn orchestrator_mode(&self) -> bool {
        !self.parser.bookmaker_services.is_empty()
    }

    /// Loader for the thin binary. Real deployments load this struct from
    /// YAML (external collaborator); this path exists so the crate is
    /// runnable standalone.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = env::var("HEALTH_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or(ConfigError::MissingKey("health.port"))?;

        let read_header_timeout_ms: u64 = env::var("HEALTH_READ_HEADER_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5_000);

        let interval_secs: u64 = env::var("PARSER_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(120);
        let timeout_secs: u64 = env::var("PARSER_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10);

        let enabled_parsers = env::var("PARSER_ENABLED")
            .ok()
            .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let config = Config {
            parser: ParserConfig {
                enabled_parsers,
                interval: Duration::from_secs(interval_secs),
                timeout: Duration::from_secs(timeout_secs),
                user_agent: default_user_agent(),
                headers: HashMap::new(),
                bookmakers: HashMap::new(),
                bookmaker_services: HashMap::new(),
            },
            health: HealthConfig {
                port,
                read_header_timeout: Duration::from_millis(read_header_timeout_ms),
                async_parsing_timeout: Some(Duration::from_secs(60)),
            },
            value_calculator: ValueCalculatorConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }
}

fn default_interval() -> Duration {
    Duration::from_secs(120)
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    "odds-engine/1.0".to_string()
}

mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

mod opt_duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs: Option<u64> = Option::deserialize(d)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_missing_health_port() {
        let config = Config {
            parser: ParserConfig {
                enabled_parsers: vec![],
                interval: default_interval(),
                timeout: default_timeout(),
                user_agent: default_user_agent(),
                headers: HashMap::new(),
                bookmakers: HashMap::new(),
                bookmaker_services: HashMap::new(),
            },
            health: HealthConfig {
                port: 0,
                read_header_timeout: Duration::from_secs(5),
                async_parsing_timeout: None,
            },
            value_calculator: ValueCalculatorConfig::default(),
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingKey("health.port"))));
    }

    #[test]
    fn orchestrator_mode_follows_bookmaker_services() {
        let mut config = Config {
            parser: ParserConfig {
                enabled_parsers: vec![],
                interval: default_interval(),
                timeout: default_timeout(),
                user_agent: default_user_agent(),
                headers: HashMap::new(),
                bookmakers: HashMap::new(),
                bookmaker_services: HashMap::new(),
            },
            health: HealthConfig {
                port: 8080,
                read_header_timeout: Duration::from_secs(5),
                async_parsing_timeout: None,
            },
            value_calculator: ValueCalculatorConfig::default(),
        };
        assert!(!config.orchestrator_mode());
        config.parser.bookmaker_services.insert("fonbet".into(), "http://localhost:9001".into());
        assert!(config.orchestrator_mode());
    }
}
