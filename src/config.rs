use chrono::{DateTime, Utc};
use log::info;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_SNAPSHOT: &str = "polls.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} is not a valid RFC 3339 timestamp: {source}")]
    InvalidTimestamp {
        key: &'static str,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub snapshot_path: PathBuf,
    pub poll_id: Option<String>,
    // Fixed evaluation instant; the wall clock is used when unset
    pub now: Option<DateTime<Utc>>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = lookup("POLL_SNAPSHOT")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| {
                info!("POLL_SNAPSHOT not set, using default: {}", DEFAULT_SNAPSHOT);
                DEFAULT_SNAPSHOT.to_string()
            });

        let poll_id = lookup("POLL_ID").filter(|value| !value.trim().is_empty());

        let now = match lookup("ANALYTICS_NOW") {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw.trim())
                    .map_err(|source| ConfigError::InvalidTimestamp {
                        key: "ANALYTICS_NOW",
                        source,
                    })?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(Self {
            snapshot_path: PathBuf::from(snapshot_path),
            poll_id,
            now,
        })
    }

    pub fn evaluation_time(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("polls.json"));
        assert_eq!(config.poll_id, None);
        assert_eq!(config.now, None);
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            ("POLL_SNAPSHOT", "/tmp/room.json"),
            ("POLL_ID", "abc"),
            ("ANALYTICS_NOW", "2024-03-01T10:00:00+02:00"),
        ]))
        .unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/room.json"));
        assert_eq!(config.poll_id.as_deref(), Some("abc"));
        assert_eq!(config.evaluation_time(), Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let err = Config::from_lookup(lookup(&[("ANALYTICS_NOW", "yesterday")])).unwrap_err();
        assert!(err.to_string().starts_with("ANALYTICS_NOW"));
    }
}
