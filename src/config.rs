//! Site configuration loaded from YAML.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{palette::ElevationScale, scene::SceneSettings};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Region table to load instead of the builtin one.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds before an untouched visitor session is dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl ServerConfig {
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

fn default_typing_delay_ms() -> u64 {
    1_000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

impl ChatConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_scene_seed")]
    pub seed: u64,
    #[serde(default = "default_base_offset")]
    pub base_offset: f32,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,
    #[serde(default = "default_tree_count")]
    pub tree_count: usize,
}

fn default_scene_seed() -> u64 {
    7
}

fn default_base_offset() -> f32 {
    ElevationScale::default().base_offset
}

fn default_scale_factor() -> f32 {
    ElevationScale::default().scale_factor
}

fn default_tree_count() -> usize {
    40
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: default_scene_seed(),
            base_offset: default_base_offset(),
            scale_factor: default_scale_factor(),
            tree_count: default_tree_count(),
        }
    }
}

impl SceneConfig {
    pub fn settings(&self) -> SceneSettings {
        SceneSettings {
            seed: self.seed,
            elevation: ElevationScale {
                base_offset: self.base_offset,
                scale_factor: self.scale_factor,
            },
            tree_count: self.tree_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("elevation scale factor must be positive, got {0}")]
    NonPositiveScale(f32),
    #[error("elevation base offset must be finite")]
    InvalidBaseOffset,
    #[error("server host must not be empty")]
    EmptyHost,
    #[error("session idle timeout must be at least one second")]
    ZeroSessionIdle,
}

impl SiteConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// A positive scale keeps elevation strictly increasing with water access.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scene.scale_factor > 0.0 && self.scene.scale_factor.is_finite()) {
            return Err(ConfigError::NonPositiveScale(self.scene.scale_factor));
        }
        if !self.scene.base_offset.is_finite() {
            return Err(ConfigError::InvalidBaseOffset);
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.server.session_idle_secs == 0 {
            return Err(ConfigError::ZeroSessionIdle);
        }
        Ok(())
    }
}
