//! Engine Configuration
//!
//! Features:
//! - Environment presets (dev/prod)
//! - Environment variable overrides
//! - Configuration validation
//! - Sensible defaults (20 processes, 20 resource types)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default upper bound on processes and resource types.
pub const DEFAULT_MAX_DIMENSION: usize = 20;

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(Error::ConfigError(format!("Invalid environment: {}", s))),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Environment type
    pub environment: Environment,

    /// Input size limits
    pub limits: Limits,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Number of recent runs kept by the metrics collector
    pub history_size: usize,
}

/// Dimension bounds enforced by validation. This is policy of the embedding
/// application; the algorithms themselves work for any size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_processes: usize,
    pub max_resources: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_processes: DEFAULT_MAX_DIMENSION,
            max_resources: DEFAULT_MAX_DIMENSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let env = std::env::var("DEADLOCK_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .parse()?;

        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Development configuration
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            limits: Limits::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
            history_size: 50,
        }
    }

    /// Production configuration
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            limits: Limits::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            history_size: 1000,
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("DEADLOCK_MAX_PROCESSES") {
            self.limits.max_processes = value
                .parse()
                .map_err(|_| Error::ConfigError("Invalid DEADLOCK_MAX_PROCESSES".to_string()))?;
        }
        if let Ok(value) = std::env::var("DEADLOCK_MAX_RESOURCES") {
            self.limits.max_resources = value
                .parse()
                .map_err(|_| Error::ConfigError("Invalid DEADLOCK_MAX_RESOURCES".to_string()))?;
        }
        if let Ok(level) = std::env::var("DEADLOCK_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_processes == 0 || self.limits.max_resources == 0 {
            return Err(Error::ConfigError(
                "Process and resource limits must be at least 1".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(Error::ConfigError(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(Error::ConfigError(format!(
                "Invalid log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Configuration builder for programmatic setup
pub struct ConfigBuilder {
    config: EngineConfig,
}

impl ConfigBuilder {
    pub fn new(env: Environment) -> Self {
        let config = match env {
            Environment::Development => EngineConfig::development(),
            Environment::Production => EngineConfig::production(),
        };

        Self { config }
    }

    pub fn with_max_processes(mut self, max: usize) -> Self {
        self.config.limits.max_processes = max;
        self
    }

    pub fn with_max_resources(mut self, max: usize) -> Self {
        self.config.limits.max_resources = max;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_history_size(mut self, size: usize) -> Self {
        self.config.history_size = size;
        self
    }

    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
