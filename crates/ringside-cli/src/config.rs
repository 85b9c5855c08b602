//! Configuration management for Ringside CLI
//!
//! Stores API key, persona presets, and default settings in ~/.config/ringside/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "ringside";
const CONFIG_FILE: &str = "config.toml";

/// Named persona shortcut
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message: Option<String>,
}

impl Preset {
    /// Fields set in `overrides` win
    pub fn merged_with(&self, overrides: &Preset) -> Preset {
        Preset {
            name: overrides.name.clone().or_else(|| self.name.clone()),
            description: overrides
                .description
                .clone()
                .or_else(|| self.description.clone()),
            voice_id: overrides.voice_id.clone().or_else(|| self.voice_id.clone()),
            first_message: overrides
                .first_message
                .clone()
                .or_else(|| self.first_message.clone()),
        }
    }
}

/// CLI Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_preset: Option<String>,
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_preset: None,
            presets: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    pub fn add_preset(&mut self, name: String, preset: Preset) {
        self.presets.insert(name, preset);
    }

    /// Remove a preset, clearing the default if it pointed there
    pub fn remove_preset(&mut self, name: &str) -> bool {
        let removed = self.presets.remove(name).is_some();
        if removed && self.default_preset.as_deref() == Some(name) {
            self.default_preset = None;
        }
        removed
    }

    pub fn set_default_preset(&mut self, name: String) -> bool {
        if self.presets.contains_key(&name) {
            self.default_preset = Some(name);
            true
        } else {
            false
        }
    }

    /// The named preset, else the default one, else none
    pub fn preset(&self, name: Option<&str>) -> Result<Option<&Preset>> {
        match name {
            Some(name) => self
                .presets
                .get(name)
                .map(Some)
                .with_context(|| format!("Preset '{}' not found", name)),
            None => Ok(self
                .default_preset
                .as_deref()
                .and_then(|n| self.presets.get(n))),
        }
    }
}
