//! Orchestrator process configuration — the `parser.bookmaker_services` and
//! `health.*` keys, as consumed by a pure orchestrator binary.

use std::env;
use std::time::Duration;

use crate::orchestrator::RemoteService;

pub struct Config {
    pub health_port: u16,
    pub services: Vec<RemoteService>,
    pub aggregate_timeout: Duration,
}

impl Config {
    /// `BOOKMAKER_SERVICES` is a comma-separated `name=url` list, mirroring
    /// the `parser.bookmaker_services` config key.
    pub fn from_env() -> Result<Self, String> {
        let health_port: u16 = env::var("HEALTH_PORT").ok().and_then(|v| v.parse().ok()).ok_or("HEALTH_PORT must be set")?;

        let services = env::var("BOOKMAKER_SERVICES").unwrap_or_default();
        let services = parse_services(&services)?;

        let timeout_secs: u64 = env::var("AGGREGATE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10);

        Ok(Self { health_port, services, aggregate_timeout: Duration::from_secs(timeout_secs) })
    }
}

fn parse_services(raw: &str) -> Result<Vec<RemoteService>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (name, url) = entry.split_once('=').ok_or_else(|| format!("malformed service entry: {entry}"))?;
            Ok(RemoteService { name: name.to_string(), base_url: url.to_string() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_name_url_pairs() {
        let services = parse_services("fonbet=http://localhost:9001,pinnacle=http://localhost:9002").unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "fonbet");
        assert_eq!(services[1].base_url, "http://localhost:9002");
    }

    #[test]
    fn empty_string_yields_no_services() {
        assert!(parse_services("").unwrap().is_empty());
    }

    #[test]
    fn malformed_entry_is_rejected() {
        assert!(parse_services("fonbet").is_err());
    }
}
