//! Tilesets referenced by cells

use crate::Properties;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tileset. Only identity and size matter to the editing engine; image data
/// lives with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    /// Number of tiles in this tileset
    pub tile_count: u32,
    #[serde(default)]
    pub properties: Properties,
}

impl Tileset {
    pub fn new(name: impl Into<String>, tile_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tile_count,
            properties: Properties::new(),
        }
    }

    /// Check whether `index` is a valid tile index in this tileset
    pub fn contains_tile(&self, index: u32) -> bool {
        index < self.tile_count
    }
}
