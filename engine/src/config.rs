//! Contest configuration.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use contest_storeapi::StoreConfig;

use crate::deadline::Deadline;
use crate::error::ConfigError;

pub const ENV_DEADLINE: &str = "CONTEST_DEADLINE";
pub const ENV_STORE_TIMEOUT_MS: &str = "CONTEST_STORE_TIMEOUT_MS";
pub const ENV_SUBMISSION_SCAN: &str = "CONTEST_SUBMISSION_SCAN";
pub const ENV_REGISTRATION_SCAN: &str = "CONTEST_REGISTRATION_SCAN";
pub const ENV_ADMIN_LIMIT: &str = "CONTEST_ADMIN_LIMIT";

/// Knobs for the contest flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestConfig {
    /// Submission cut-off. Default: none.
    pub deadline: Deadline,

    /// Client-side store limits.
    pub store: StoreConfig,

    /// How many recent submissions "find my submission" scans.
    pub submission_scan_window: usize,

    /// How many recent registrations "find my id" scans.
    pub registration_scan_window: usize,

    /// Rows per admin listing.
    pub admin_recent_limit: usize,

    /// Registration ids tried before giving up on collisions.
    pub registration_id_attempts: u32,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            deadline: Deadline::none(),
            store: StoreConfig::default(),
            submission_scan_window: 1000,
            registration_scan_window: 800,
            admin_recent_limit: 25,
            registration_id_attempts: 2,
        }
    }
}

impl ContestConfig {
    /// Load from the process environment; panics on a malformed value.
    pub fn from_env() -> Self {
        Self::try_from_env().expect("Environment misconfigured!")
    }

    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup. Unset keys fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let deadline = match lookup(ENV_DEADLINE) {
            Some(raw) => Deadline::parse(&raw).map_err(|e| invalid(ENV_DEADLINE, raw, e))?,
            None => {
                info!("{ENV_DEADLINE} not set, submissions stay open");
                defaults.deadline
            }
        };
        let timeout_ms = try_load(
            &lookup,
            ENV_STORE_TIMEOUT_MS,
            defaults.store.call_timeout.as_millis() as u64,
        )?;
        if timeout_ms == 0 {
            return Err(invalid(
                ENV_STORE_TIMEOUT_MS,
                timeout_ms.to_string(),
                "must be greater than zero",
            ));
        }

        Ok(Self {
            deadline,
            store: StoreConfig {
                call_timeout: Duration::from_millis(timeout_ms),
            },
            submission_scan_window: try_load(
                &lookup,
                ENV_SUBMISSION_SCAN,
                defaults.submission_scan_window,
            )?,
            registration_scan_window: try_load(
                &lookup,
                ENV_REGISTRATION_SCAN,
                defaults.registration_scan_window,
            )?,
            admin_recent_limit: try_load(&lookup, ENV_ADMIN_LIMIT, defaults.admin_recent_limit)?,
            registration_id_attempts: defaults.registration_id_attempts,
        })
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| invalid(key, raw, e)),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn invalid(key: &'static str, value: String, reason: impl Display) -> ConfigError {
    warn!("Invalid {key} value: {reason}");
    ConfigError::Invalid {
        key,
        value,
        reason: reason.to_string(),
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ContestConfig::default();
        assert_eq!(config.deadline, Deadline::none());
        assert_eq!(config.submission_scan_window, 1000);
        assert_eq!(config.registration_scan_window, 800);
        assert_eq!(config.admin_recent_limit, 25);
        assert_eq!(config.registration_id_attempts, 2);
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = ContestConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ContestConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ContestConfig::from_lookup(lookup(&[
            (ENV_DEADLINE, "2026-03-10T23:59:59+05:30"),
            (ENV_STORE_TIMEOUT_MS, "2500"),
            (ENV_ADMIN_LIMIT, " 50 "),
        ]))
        .unwrap();
        assert!(config.deadline.instant().is_some());
        assert_eq!(config.store.call_timeout, Duration::from_millis(2500));
        assert_eq!(config.admin_recent_limit, 50);
        assert_eq!(config.submission_scan_window, 1000);
    }

    #[test]
    fn test_bad_values_rejected() {
        let err = ContestConfig::from_lookup(lookup(&[(ENV_SUBMISSION_SCAN, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_SUBMISSION_SCAN, .. }));

        let err = ContestConfig::from_lookup(lookup(&[(ENV_DEADLINE, "tomorrow")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_DEADLINE, .. }));
    }

    #[test]
    fn test_zero_store_timeout_rejected() {
        let err = ContestConfig::from_lookup(lookup(&[(ENV_STORE_TIMEOUT_MS, " 0 ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_STORE_TIMEOUT_MS, .. }));

        let config = ContestConfig::from_lookup(lookup(&[(ENV_STORE_TIMEOUT_MS, "1")])).unwrap();
        assert_eq!(config.store.call_timeout, Duration::from_millis(1));
    }
}
