//! Layer types for tile and object layers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MapObject, Properties, TileGrid};

/// Stable handle to a layer, resolved through the [`Map`](crate::Map) when used.
///
/// Handles survive reordering and removal of other layers; a handle whose layer
/// is gone simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A layer (tiles or objects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    #[serde(default)]
    pub properties: Properties,
    pub data: LayerData,
}

impl Layer {
    /// Create a new, empty tile layer covering `width` x `height` cells at `(x, y)`
    pub fn new_tile_layer(name: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::with_data(name, LayerData::Tiles(TileGrid::new(x, y, width, height)))
    }

    /// Create a new object layer
    pub fn new_object_layer(name: impl Into<String>) -> Self {
        Self::with_data(name, LayerData::Objects(Vec::new()))
    }

    pub fn with_data(name: impl Into<String>, data: LayerData) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            visible: true,
            properties: Properties::new(),
            data,
        }
    }

    /// Get the type of this layer
    pub fn layer_type(&self) -> LayerType {
        match &self.data {
            LayerData::Tiles(_) => LayerType::Tiles,
            LayerData::Objects(_) => LayerType::Objects,
        }
    }

    pub fn tiles(&self) -> Option<&TileGrid> {
        match &self.data {
            LayerData::Tiles(grid) => Some(grid),
            LayerData::Objects(_) => None,
        }
    }

    pub fn tiles_mut(&mut self) -> Option<&mut TileGrid> {
        match &mut self.data {
            LayerData::Tiles(grid) => Some(grid),
            LayerData::Objects(_) => None,
        }
    }

    pub fn objects(&self) -> Option<&[MapObject]> {
        match &self.data {
            LayerData::Tiles(_) => None,
            LayerData::Objects(objects) => Some(objects),
        }
    }

    pub fn objects_mut(&mut self) -> Option<&mut Vec<MapObject>> {
        match &mut self.data {
            LayerData::Tiles(_) => None,
            LayerData::Objects(objects) => Some(objects),
        }
    }

    /// A tile layer without tiles or an object layer without objects
    pub fn is_empty(&self) -> bool {
        match &self.data {
            LayerData::Tiles(grid) => grid.is_empty(),
            LayerData::Objects(objects) => objects.is_empty(),
        }
    }
}

/// The type of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Tiles,
    Objects,
}

/// The data contained in a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerData {
    Tiles(TileGrid),
    Objects(Vec<MapObject>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    #[test]
    fn test_new_tile_layer() {
        let layer = Layer::new_tile_layer("Ground", 0, 0, 10, 10);

        assert_eq!(layer.name, "Ground");
        assert!(layer.visible);
        assert_eq!(layer.layer_type(), LayerType::Tiles);
        assert!(layer.is_empty());

        let grid = layer.tiles().expect("tile layer");
        assert_eq!((grid.width(), grid.height()), (10, 10));
        assert!(layer.objects().is_none());
    }

    #[test]
    fn test_new_object_layer() {
        let mut layer = Layer::new_object_layer("Entities");

        assert_eq!(layer.layer_type(), LayerType::Objects);
        assert!(layer.tiles().is_none());
        assert!(layer.is_empty());

        layer
            .objects_mut()
            .expect("object layer")
            .push(MapObject::new("Chest", [16.0, 32.0]));
        assert!(!layer.is_empty());
    }

    #[test]
    fn test_tile_layer_not_empty_after_write() {
        let mut layer = Layer::new_tile_layer("Ground", 0, 0, 2, 2);
        layer
            .tiles_mut()
            .expect("tile layer")
            .set_cell(1, 1, Cell::new(Uuid::nil(), 4));
        assert!(!layer.is_empty());
    }

    #[test]
    fn test_layer_ids_are_unique() {
        assert_ne!(LayerId::new(), LayerId::new());
    }
}
