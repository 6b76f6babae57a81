//! TOML-based configuration persistence for the peer process.
//!
//! Reads and writes `PeerConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Inkboard\config.toml`
//! - Linux:    `~/.config/inkboard/config.toml`
//! - macOS:    `~/Library/Application Support/Inkboard/config.toml`
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file, so the peer
//! works on first run and when upgrading from an older config file that is
//! missing newer fields.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

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

/// Top-level peer configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerConfig {
    #[serde(default)]
    pub peer: PeerSettings,
    #[serde(default)]
    pub board: BoardSettings,
}

/// Identity and behaviour of this peer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerSettings {
    /// Unique identity announced with every published event. Must not
    /// contain `:`. A fresh random identity is generated when absent.
    #[serde(default = "default_identity")]
    pub identity: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Settings shared with the rest of the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardSettings {
    /// Topic the board's events are published under.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Address of the relay broker, `host:port`.
    #[serde(default = "default_broker_addr")]
    pub broker_addr: String,
    /// Render ticks per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Whether local pan changes are broadcast as viewport events.
    /// Receiving peers record them but never apply them to geometry.
    #[serde(default)]
    pub share_viewport: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_identity() -> String {
    Uuid::new_v4().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_topic() -> String {
    "T".to_string()
}
fn default_broker_addr() -> String {
    "127.0.0.1:5556".to_string()
}
fn default_frame_rate() -> u32 {
    30
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            peer: PeerSettings::default(),
            board: BoardSettings::default(),
        }
    }
}

impl Default for PeerSettings {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            log_level: default_log_level(),
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            broker_addr: default_broker_addr(),
            frame_rate: default_frame_rate(),
            share_viewport: false,
        }
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

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `PeerConfig` from `path`, returning `PeerConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &PathBuf) -> Result<PeerConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: PeerConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PeerConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.clone(),
            source: e,
        }),
    }
}

/// Loads `PeerConfig` from the platform config location.
pub fn load_config() -> Result<PeerConfig, ConfigError> {
    let path = config_file_path()?;
    load_config_from(&path)
}

/// Persists `config` to disk, creating the config directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &PeerConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Inkboard"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("inkboard"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Inkboard")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
