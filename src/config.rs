// Global configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to the ffmpeg executable
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// Path to the ffprobe executable
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Target output size in megabytes when --size is not given
    #[serde(default = "default_target_size_mb")]
    pub target_size_mb: f64,

    /// Cap on output height; width follows to keep the aspect ratio
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Video codec passed to -c:v
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Encoder speed/quality preset
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant-quality parameter
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// Audio codec passed to -c:a
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate in kbps
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: u32,

    /// Audio channel count
    #[serde(default = "default_audio_channels")]
    pub audio_channels: u32,

    /// Additional ffmpeg arguments appended before the output path.
    /// Parsed shell-style, so quoted values may contain spaces.
    #[serde(default)]
    pub extra_args: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_target_size_mb() -> f64 {
    4.0
}

fn default_max_height() -> u32 {
    720
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_preset() -> String {
    "slower".to_string()
}

fn default_crf() -> u32 {
    23
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_bitrate() -> u32 {
    64
}

fn default_audio_channels() -> u32 {
    1
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            target_size_mb: default_target_size_mb(),
            max_height: default_max_height(),
            video_codec: default_video_codec(),
            preset: default_preset(),
            crf: default_crf(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            audio_channels: default_audio_channels(),
            extra_args: String::new(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("ffshrink")
        } else {
            // Linux, Windows and others
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("ffshrink")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from disk, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            let config: Config = toml::from_str(&contents).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?;

            Ok(config)
        } else {
            let config = Config::default();

            // Try to save the default config, but don't fail if we can't
            // (e.g., if the directory isn't writable)
            if let Err(e) = config.save() {
                eprintln!("Warning: Could not create default config file: {}", e);
                eprintln!(
                    "Using built-in defaults. Run 'ffshrink init-config' to create a config file."
                );
            }

            Ok(config)
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Create a default config file if it doesn't exist
    pub fn ensure_default() -> Result<()> {
        if !Self::exists() {
            let config = Config::default();
            config.save()?;
        }
        Ok(())
    }
}
