use crate::{Result, error::error::SettingsSnafu};
use config::{Config, ConfigError, File};
use maritime_core::SyntheticGenerationConfig;
use serde::Deserialize;
use snafu::ResultExt;
use std::time::Duration;
use strum::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log_level: LogLevel,
    pub environment: Environment,
    pub scenario: SyntheticGenerationConfig,
    pub seed: u64,
    pub density_resolution: u8,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub capacity: usize,
    #[serde(default, with = "humantime_serde")]
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    Local,
    Test,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 32,
            ttl: Some(Duration::from_secs(3_600)),
        }
    }
}

impl LogLevel {
    pub fn level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl Settings {
    /// Reads `config/{environment}.yaml`, where the environment comes from `APP_ENVIRONMENT` and
    /// defaults to local, then overlays `MARITIME_ENGINE__*` variables.
    pub fn new() -> Result<Self> {
        Self::load().context(SettingsSnafu)
    }

    fn load() -> std::result::Result<Self, ConfigError> {
        let environment = match std::env::var("APP_ENVIRONMENT") {
            Ok(value) => value.parse::<Environment>().map_err(|e| {
                ConfigError::Message(format!("invalid APP_ENVIRONMENT '{value}': {e}"))
            })?,
            Err(_) => Environment::Local,
        };

        Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.as_ref().to_lowercase()))
                    .required(true),
            )
            .add_source(config::Environment::with_prefix("MARITIME_ENGINE").separator("__"))
            .set_override("environment", environment.as_ref())?
            .build()?
            .try_deserialize()
    }
}
