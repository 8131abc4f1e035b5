//! Editing behaviour settings
//!
//! Stored as TOML. Missing keys take their default values, so older settings
//! files keep loading after new options are added.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from reading or writing settings files
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings that shape how edits are recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum number of undo steps kept; 0 keeps everything
    pub undo_limit: usize,
    /// Fold the paints of one brush stroke into a single undo step
    pub merge_paint_strokes: bool,
    /// Run the auto-map passes after every paint, as part of the same undo step
    pub automap_while_drawing: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            undo_limit: 0,
            merge_paint_strokes: true,
            automap_while_drawing: false,
        }
    }
}

impl EditorSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
