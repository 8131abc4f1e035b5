//! The map: layers, tilesets and their extent

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Layer, LayerId, LayerData, Properties, Rect, TileGrid, Tileset};

/// A complete tile map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: Uuid,
    pub name: String,
    /// Width in tiles
    pub width: i32,
    /// Height in tiles
    pub height: i32,
    /// Infinite maps have no fixed extent; their tile layers grow as they are painted
    #[serde(default)]
    pub infinite: bool,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
    #[serde(default)]
    pub properties: Properties,
}

impl Map {
    pub fn new(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width,
            height,
            infinite: false,
            layers: Vec::new(),
            tilesets: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Create an infinite map. `width` and `height` only describe the initial view.
    pub fn new_infinite(name: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            infinite: true,
            ..Self::new(name, width, height)
        }
    }

    /// The nominal map rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Append an empty tile layer covering the map and return its handle
    pub fn add_tile_layer(&mut self, name: impl Into<String>) -> LayerId {
        let mut grid = TileGrid::new(0, 0, self.width, self.height);
        if self.infinite {
            grid = grid.into_growable();
        }
        self.add_layer(Layer::with_data(name, LayerData::Tiles(grid)))
    }

    /// Append an empty object layer and return its handle
    pub fn add_object_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.add_layer(Layer::new_object_layer(name))
    }

    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// The cell grid of a tile layer
    pub fn tile_layer(&self, id: LayerId) -> Option<&TileGrid> {
        self.layer(id).and_then(Layer::tiles)
    }

    pub fn tileset(&self, id: Uuid) -> Option<&Tileset> {
        self.tilesets.iter().find(|t| t.id == id)
    }

    pub fn has_tileset(&self, id: Uuid) -> bool {
        self.tileset(id).is_some()
    }

    /// Check whether any tile layer references the tileset
    pub fn is_tileset_used(&self, id: Uuid) -> bool {
        self.layers
            .iter()
            .filter_map(Layer::tiles)
            .any(|grid| grid.uses_tileset(id))
    }
}
