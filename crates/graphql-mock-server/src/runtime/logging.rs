//! Logging config and utilities
//!
//! This module is only used by the main binary and provides logging config structures and setup
//! helper functions

mod log_rotation_kind;

use std::path::{Path, PathBuf};

use log_rotation_kind::LogRotationKind;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use tracing::Level;
use tracing_appender::{non_blocking::WorkerGuard, rolling::RollingFileAppender};
use tracing_subscriber::{
    EnvFilter, fmt::writer::BoxMakeWriter, layer::SubscriberExt as _,
    util::SubscriberInitExt as _,
};

/// Dependencies that are too chatty at the info level
const NOISY_TARGETS: &[&str] = &["async_graphql", "hyper", "hyper_util", "tower_http"];

/// Logging related options
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Logging {
    /// The log level to use for tracing
    #[serde(default = "default_level", deserialize_with = "deserialize_level")]
    #[schemars(schema_with = "super::schemas::level")]
    pub level: Level,

    /// The output directory for log files; logs go to stderr when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Log file rotation period to use when log file path provided
    /// [default: Hourly]
    #[serde(default)]
    pub rotation: LogRotationKind,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
            path: None,
            rotation: LogRotationKind::default(),
        }
    }
}

const fn default_level() -> Level {
    Level::INFO
}

fn deserialize_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
    String::deserialize(deserializer)?
        .parse()
        .map_err(serde::de::Error::custom)
}

impl Logging {
    pub fn env_filter(&self) -> Result<EnvFilter, anyhow::Error> {
        let mut env_filter = EnvFilter::from_default_env().add_directive(self.level.into());

        if self.level == Level::INFO {
            for target in NOISY_TARGETS {
                env_filter = env_filter.add_directive(format!("{target}=warn").parse()?);
            }
        }
        Ok(env_filter)
    }

    /// Install the global subscriber, writing to rolling files when a path is
    /// configured and falling back to stderr otherwise
    pub fn setup(&self) -> Result<Option<WorkerGuard>, anyhow::Error> {
        let env_filter = self.env_filter()?;

        let (writer, guard, with_ansi) = match self
            .path
            .as_deref()
            .and_then(|path| self.file_appender(path))
        {
            Some(appender) => {
                let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);
                (BoxMakeWriter::new(non_blocking_appender), Some(guard), false)
            }
            None => (BoxMakeWriter::new(std::io::stderr), None, true),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(with_ansi)
                    .with_target(false),
            )
            .try_init()?;

        Ok(guard)
    }

    fn file_appender(&self, path: &Path) -> Option<RollingFileAppender> {
        macro_rules! log_error {
            () => {
                |e| eprintln!("Failed to setup logging: {e:?}")
            };
        }

        let appender = std::fs::create_dir_all(path)
            .inspect_err(log_error!())
            .ok()
            .and_then(|_| {
                RollingFileAppender::builder()
                    .rotation(self.rotation.into())
                    .filename_prefix("graphql_mock_server")
                    .filename_suffix("log")
                    .build(path)
                    .inspect_err(log_error!())
                    .ok()
            });
        if appender.is_none() {
            eprintln!("Log file setup failed - falling back to stderr");
        }
        appender
    }
}
