//! Demo configuration read from the environment.

use std::time::Duration;

use crate::error::DemoError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Connection settings for the backing database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection before giving up.
    pub acquire_timeout: Duration,
}

impl DemoConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::Config` if `DATABASE_URL` is unset or a numeric
    /// setting does not parse.
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DemoError> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            DemoError::Config("DATABASE_URL environment variable must be set".to_owned())
        })?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                DemoError::Config(format!("DATABASE_MAX_CONNECTIONS must be a valid u32: {e}"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let acquire_timeout_secs = match lookup("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                DemoError::Config(format!(
                    "DATABASE_ACQUIRE_TIMEOUT_SECS must be a valid u64: {e}"
                ))
            })?,
            None => DEFAULT_ACQUIRE_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_url_is_set() {
        let config =
            DemoConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/inbox")]))
                .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/inbox");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let result = DemoConfig::from_lookup(lookup_from(&[]));

        assert!(matches!(result, Err(DemoError::Config(_))));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/inbox"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = DemoConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/inbox"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ]));

        match result {
            Err(DemoError::Config(message)) => {
                assert!(message.contains("DATABASE_MAX_CONNECTIONS"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
