//! Configuration for the naming runtime.
//!
//! A [`NamingConfig`] is usually read from a TOML file:
//!
//! ```toml
//! [logging]
//! level = "naming=debug"
//!
//! [process]
//! type = "app-client"
//!
//! [provider]
//! copy_local_values = true
//! max_message_bytes = 1048576
//!
//! [remote]
//! enabled = true
//! ```

use naming_core::ProcessType;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub logging: LoggingConfig,
    pub process: ProcessConfig,
    pub provider: ProviderConfig,
    pub remote: RemoteConfig,
}

impl NamingConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: NamingConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            target = "naming.config",
            path = %path.display(),
            process = ?config.process.process_type,
            "loaded naming config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.provider.max_message_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "provider.max_message_bytes",
                message: "must be greater than zero".to_owned(),
            });
        }
        let directives = LoggingConfig::normalize_level_directives(&self.logging.level);
        if let Err(err) = EnvFilter::try_new(&directives) {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                message: err.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to this file as well. If it cannot be opened, the other sinks stay active.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    /// The effective filter: the configured level, with `RUST_LOG` merged in when set.
    pub fn env_filter(&self) -> EnvFilter {
        self.filter_with(std::env::var("RUST_LOG").ok().as_deref())
    }

    /// Tries the configured level merged with `rust_log`, then `rust_log` alone, then the
    /// configured level alone. Falls back to `info` when none of them parse.
    fn filter_with(&self, rust_log: Option<&str>) -> EnvFilter {
        let level = Self::normalize_level_directives(&self.level);
        let candidates = match rust_log.map(str::trim).filter(|d| !d.is_empty()) {
            Some(overrides) => vec![format!("{level},{overrides}"), overrides.to_owned(), level],
            None => vec![level],
        };
        candidates
            .into_iter()
            .find_map(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessConfig {
    #[serde(rename = "type")]
    pub process_type: ProcessType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Deep-copy values on bind and lookup through the local provider. When disabled, callers
    /// share the bound instance.
    #[serde(default = "ProviderConfig::default_copy_local_values")]
    pub copy_local_values: bool,

    /// Upper bound for one encoded remote request or response, and for deep-copy payloads.
    #[serde(default = "ProviderConfig::default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl ProviderConfig {
    fn default_copy_local_values() -> bool {
        true
    }

    fn default_max_message_bytes() -> usize {
        16 * 1024 * 1024
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            copy_local_values: Self::default_copy_local_values(),
            max_message_bytes: Self::default_max_message_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Initialize the remote provider as soon as an ORB is available.
    pub enabled: bool,
}

struct FileMakeWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter {
            guard: self.file.lock(),
        }
    }
}

struct FileWriter<'a> {
    guard: parking_lot::MutexGuard<'a, std::fs::File>,
}

impl Write for FileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber.
///
/// Safe to call more than once; only the first call has an effect, and a subscriber installed by
/// someone else is left alone.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        let file_open_failed = config.file.is_some() && file.is_none();

        let mut make_writer = BoxMakeWriter::new(io::sink);
        if config.stderr {
            // `TestWriter` goes through `eprint!`, which `cargo test` captures.
            if cfg!(debug_assertions) {
                make_writer = BoxMakeWriter::new(
                    make_writer.and(tracing_subscriber::fmt::writer::TestWriter::with_stderr),
                );
            } else {
                make_writer = BoxMakeWriter::new(make_writer.and(io::stderr));
            }
        }
        if let Some(file) = file {
            make_writer = BoxMakeWriter::new(make_writer.and(FileMakeWriter {
                file: Arc::new(Mutex::new(file)),
            }));
        }

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_open_failed {
            if let Some(path) = config.file.as_ref() {
                tracing::warn!(
                    target: "naming.config",
                    path = %path.display(),
                    "failed to open log file; file logging disabled"
                );
            }
        }
    });
}
