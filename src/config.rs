//! Runtime configuration
//!
//! Everything is read from environment variables once at startup. Relative
//! paths are resolved against the current working directory.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::event_store::{EventStoreConfig, DEFAULT_FILE_NAME};

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("login delay minimum ({min_ms} ms) exceeds maximum ({max_ms} ms)")]
    InvalidDelayRange { min_ms: u64, max_ms: u64 },
}

/// Bounds for the artificial delay before acknowledging a login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginDelay {
    pub min: Duration,
    pub max: Duration,
}

impl LoginDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Uniformly random duration within the bounds
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

impl Default for LoginDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(3000))
    }
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Environment name ("development", "production", ...)
    pub environment: String,
    /// Attempt log file
    pub attempts_file: PathBuf,
    /// Directory served for `/` and static assets
    pub public_dir: PathBuf,
    /// Shared secret for `/admin/logs`
    pub admin_key: String,
    /// Acknowledgement delay for `/login`
    pub login_delay: LoginDelay,
    /// Take the client address from the nearest proxy hop
    pub trust_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            attempts_file: PathBuf::from(DEFAULT_FILE_NAME),
            public_dir: PathBuf::from("public"),
            admin_key: "admin123".to_string(),
            login_delay: LoginDelay::default(),
            trust_proxy: true,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_lookup(&current_dir, |name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => defaults.port,
        };

        let min_ms = match var("LOGIN_DELAY_MIN_MS") {
            Some(raw) => parse_number("LOGIN_DELAY_MIN_MS", &raw)?,
            None => defaults.login_delay.min.as_millis() as u64,
        };
        let max_ms = match var("LOGIN_DELAY_MAX_MS") {
            Some(raw) => parse_number("LOGIN_DELAY_MAX_MS", &raw)?,
            None => defaults.login_delay.max.as_millis() as u64,
        };
        if min_ms > max_ms {
            return Err(ConfigError::InvalidDelayRange { min_ms, max_ms });
        }

        let trust_proxy = var("TRUST_PROXY")
            .map(|raw| {
                let raw = raw.trim().to_ascii_lowercase();
                !matches!(raw.as_str(), "0" | "false" | "no" | "off")
            })
            .unwrap_or(defaults.trust_proxy);

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            environment: var("APP_ENV")
                .or_else(|| var("NODE_ENV"))
                .unwrap_or(defaults.environment),
            attempts_file: resolve_path(
                base_dir,
                var("ATTEMPTS_FILE_PATH").map(PathBuf::from).unwrap_or(defaults.attempts_file),
            ),
            public_dir: resolve_path(
                base_dir,
                var("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.public_dir),
            ),
            admin_key: var("ADMIN_KEY").unwrap_or(defaults.admin_key),
            login_delay: LoginDelay::new(
                Duration::from_millis(min_ms),
                Duration::from_millis(max_ms),
            ),
            trust_proxy,
        })
    }

    /// Whether verbose, human-oriented logging should be used
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Event store settings derived from this config
    pub fn store_config(&self) -> EventStoreConfig {
        EventStoreConfig::new(&self.attempts_file)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

fn resolve_path(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(Path::new("/srv/app"), |name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.attempts_file, PathBuf::from("/srv/app/login_attempts.json"));
        assert_eq!(config.public_dir, PathBuf::from("/srv/app/public"));
        assert_eq!(config.admin_key, "admin123");
        assert_eq!(config.login_delay, LoginDelay::default());
        assert!(config.trust_proxy);
        assert!(config.is_development());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("NODE_ENV", "production"),
            ("ATTEMPTS_FILE_PATH", "/var/lib/attempts.json"),
            ("ADMIN_KEY", "s3cret"),
            ("LOGIN_DELAY_MIN_MS", "0"),
            ("LOGIN_DELAY_MAX_MS", "10"),
            ("TRUST_PROXY", "false"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "production");
        assert!(!config.is_development());
        assert_eq!(config.attempts_file, PathBuf::from("/var/lib/attempts.json"));
        assert_eq!(config.admin_key, "s3cret");
        assert_eq!(config.login_delay.max, Duration::from_millis(10));
        assert!(!config.trust_proxy);
    }

    #[test]
    fn test_app_env_wins_over_node_env() {
        let config = load(&[("APP_ENV", "staging"), ("NODE_ENV", "production")]).unwrap();
        assert_eq!(config.environment, "staging");
    }

    #[test]
    fn test_development_match_ignores_case() {
        let config = load(&[("APP_ENV", "Development")]).unwrap();
        assert!(config.is_development());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "PORT", .. }));
    }

    #[test]
    fn test_inverted_delay_range() {
        let err =
            load(&[("LOGIN_DELAY_MIN_MS", "500"), ("LOGIN_DELAY_MAX_MS", "100")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDelayRange { min_ms: 500, max_ms: 100 }
        ));
    }

    #[test]
    fn test_delay_sample_within_bounds() {
        let delay = LoginDelay::default();
        for _ in 0..100 {
            let sample = delay.sample();
            assert!(sample >= delay.min && sample <= delay.max);
        }
        assert_eq!(LoginDelay::none().sample(), Duration::ZERO);
    }
}
