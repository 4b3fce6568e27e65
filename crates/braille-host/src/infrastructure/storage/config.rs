//! TOML-based configuration for the Braille host.
//!
//! Reads and writes [`HostConfig`] at the platform-appropriate path:
//! - Windows:  `%APPDATA%\BrailleHost\config.toml`
//! - Linux:    `~/.config/braille-host/config.toml` (or `$XDG_CONFIG_HOME`)
//! - macOS:    `~/Library/Application Support/BrailleHost/config.toml`
//!
//! Every command also accepts `--config <path>` to read another file.
//!
//! # Example file
//!
//! ```toml
//! [host]
//! log_level = "debug"
//! person_id = "alice"
//!
//! [translation]
//! default_table = "ueb_grade2"
//! table_dir = "/usr/share/braille-host/tables"
//!
//! [output]
//! workers = 2
//! queue_capacity = 64
//!
//! [[devices]]
//! id = "usb:0x05f3:0x0007"
//! transport = "usb"
//! vid = "0x05f3"
//! pid = "0x0007"
//! name = "Focus 40"
//! ```
//!
//! # Serde default values
//!
//! Every section and every field has a default, so a missing file, a
//! missing section, or a config written by an older version all load into a
//! working configuration.

use std::path::{Path, PathBuf};

use braille_core::domain::device::DRIVER_KEY_CAPABILITY;
use braille_core::{DeviceInfo, TableLoader, Transport};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::envelopes::EnvelopeSource;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub host: HostSection,
    #[serde(default)]
    pub translation: TranslationSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSection {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Person the `braille.input` envelopes are attributed to.
    #[serde(default = "default_person_id")]
    pub person_id: String,
    /// `source` field of every envelope.
    #[serde(default = "default_source")]
    pub source: String,
}

/// Translation table selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationSection {
    #[serde(default = "default_table")]
    pub default_table: String,
    /// Directory searched for `<name>.yaml` before the bundled tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_dir: Option<PathBuf>,
}

/// Output dispatcher sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSection {
    /// Frames written concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Frames queued before new ones are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// A device attached at start-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceEntry {
    pub id: String,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit driver key; overrides the known-device table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_key: Option<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_person_id() -> String {
    "local-user".to_string()
}
fn default_source() -> String {
    "braille-host".to_string()
}
fn default_table() -> String {
    braille_core::table::DEFAULT_TABLE_NAME.to_string()
}
fn default_workers() -> usize {
    2
}
fn default_queue_capacity() -> usize {
    64
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            person_id: default_person_id(),
            source: default_source(),
        }
    }
}

impl Default for TranslationSection {
    fn default() -> Self {
        Self {
            default_table: default_table(),
            table_dir: None,
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl HostConfig {
    /// Table loader honouring `translation.table_dir`.
    pub fn table_loader(&self) -> TableLoader {
        match &self.translation.table_dir {
            Some(dir) => TableLoader::with_table_dir(dir),
            None => TableLoader::new(),
        }
    }

    /// Envelope attribution from the `[host]` section.
    pub fn envelope_source(&self) -> EnvelopeSource {
        EnvelopeSource::new(self.host.source.clone(), Some(self.host.person_id.clone()))
    }
}

impl DeviceEntry {
    /// Builds the record discovery would have produced for this entry.
    ///
    /// USB entries with both ids pick up the known-device driver hint; an
    /// explicit `driver_key` wins over it.
    pub fn to_device_info(&self) -> DeviceInfo {
        let mut device = match (&self.transport, &self.vid, &self.pid) {
            (Transport::Usb, Some(vid), Some(pid)) => {
                let mut device = DeviceInfo::usb(vid, pid, self.name.as_deref());
                device.id = self.id.clone();
                device
            }
            _ => {
                let mut device = DeviceInfo::new(self.id.clone(), self.transport);
                device.vid = self.vid.clone();
                device.pid = self.pid.clone();
                device.name = self.name.clone();
                device
            }
        };
        if let Some(key) = &self.driver_key {
            device = device.with_capability(DRIVER_KEY_CAPABILITY, key.as_str());
        }
        device
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from the default path.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<HostConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config from `path`, returning `HostConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<HostConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to the default path.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &HostConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path()?)
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &HostConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `BrailleHost` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("BrailleHost"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("braille-host"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("BrailleHost")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
