//! Planner configuration loaded from JSON.

use crate::grid::{Grid, GridError};
use crate::placement::EntityKind;
use crate::session::Command;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),
    #[error("Key binding for {0} is empty")]
    EmptyBinding(&'static str),
    #[error("Key {0:?} is bound to more than one command")]
    DuplicateBinding(String),
}

/// How the zoom level approaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomSmoothing {
    /// One fixed smoothing step per rendered frame.
    #[default]
    PerFrame,
    /// Smoothing scaled by elapsed frame time.
    TimeScaled,
}

/// Key identifiers for each command.
///
/// Single characters match case-insensitively; named keys such as `Escape`
/// must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub store: String,
    pub track: String,
    pub cancel: String,
    pub reset_view: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            store: "s".to_string(),
            track: "t".to_string(),
            cancel: "Escape".to_string(),
            reset_view: "r".to_string(),
        }
    }
}

impl KeyBindings {
    fn entries(&self) -> [(&'static str, &str, Command); 4] {
        [
            ("store", self.store.as_str(), Command::SelectTool(EntityKind::Store)),
            ("track", self.track.as_str(), Command::SelectTool(EntityKind::Track)),
            ("cancel", self.cancel.as_str(), Command::Cancel),
            ("reset_view", self.reset_view.as_str(), Command::ResetView),
        ]
    }

    /// Resolve a pressed key to its command.
    pub fn resolve(&self, key: &str) -> Option<Command> {
        self.entries()
            .into_iter()
            .find(|(_, binding, _)| key_matches(binding, key))
            .map(|(_, _, command)| command)
    }

    /// Check that every command has a distinct, non-empty key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self.entries();
        for (i, (name, binding, _)) in entries.iter().enumerate() {
            if binding.trim().is_empty() {
                return Err(ConfigError::EmptyBinding(*name));
            }
            if entries[..i].iter().any(|(_, other, _)| key_matches(other, binding)) {
                return Err(ConfigError::DuplicateBinding(binding.to_string()));
            }
        }
        Ok(())
    }
}

fn key_matches(binding: &str, key: &str) -> bool {
    if binding.chars().count() == 1 {
        binding.eq_ignore_ascii_case(key)
    } else {
        binding == key
    }
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub cell_size: f64,
    pub zoom_smoothing: ZoomSmoothing,
    pub keys: KeyBindings,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            grid_rows: 30,
            grid_cols: 30,
            cell_size: 50.0,
            zoom_smoothing: ZoomSmoothing::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid()?;
        self.keys.validate()
    }

    /// Build the grid described by this config.
    pub fn grid(&self) -> Result<Grid, GridError> {
        Grid::new(self.grid_rows, self.grid_cols, self.cell_size)
    }
}
