//! The live, observable editing target
//!
//! [`MapDocument`] owns the [`Map`] being edited. Every mutation that undo/redo
//! performs goes through a method here (or through [`TilePainter`](crate::TilePainter)),
//! which marks the document modified and records a [`MapChange`] for observers
//! such as renderers and minimaps.

use tracing::warn;
use uuid::Uuid;

use crate::{Layer, LayerId, Map, MapObject, Properties, Region, TileGrid, Tileset};

/// A change notification recorded by the document
#[derive(Debug, Clone, PartialEq)]
pub enum MapChange {
    /// Cells of a tile layer were written; `region` is in the map frame
    TilesChanged { layer: LayerId, region: Region },
    LayerAdded { layer: LayerId, index: usize },
    LayerRemoved { layer: LayerId, index: usize },
    PropertiesChanged { layer: LayerId },
    ObjectsAdded { layer: LayerId, objects: Vec<Uuid> },
    ObjectsRemoved { layer: LayerId, objects: Vec<Uuid> },
    TilesetAdded { tileset: Uuid },
    TilesetRemoved { tileset: Uuid },
}

/// A map open for editing
#[derive(Debug, Clone)]
pub struct MapDocument {
    id: Uuid,
    map: Map,
    modified: bool,
    changes: Vec<MapChange>,
}

impl MapDocument {
    pub fn new(map: Map) -> Self {
        Self {
            id: Uuid::new_v4(),
            map,
            modified: false,
            changes: Vec::new(),
        }
    }

    /// Session identity. Transactions only merge within the same document.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Mark the document as saved
    pub fn mark_clean(&mut self) {
        self.modified = false;
    }

    /// Pending change notifications, oldest first
    pub fn changes(&self) -> &[MapChange] {
        &self.changes
    }

    /// Drain pending change notifications
    pub fn take_changes(&mut self) -> Vec<MapChange> {
        std::mem::take(&mut self.changes)
    }

    pub(crate) fn notify(&mut self, change: MapChange) {
        self.modified = true;
        self.changes.push(change);
    }

    pub(crate) fn tile_grid_mut(&mut self, layer: LayerId) -> Option<&mut TileGrid> {
        self.map.layer_mut(layer).and_then(Layer::tiles_mut)
    }

    /// Insert a layer at `index` (clamped to the layer count). Returns the index used.
    pub fn insert_layer(&mut self, index: usize, layer: Layer) -> usize {
        let index = index.min(self.map.layers.len());
        let id = layer.id;
        self.map.layers.insert(index, layer);
        self.notify(MapChange::LayerAdded { layer: id, index });
        index
    }

    /// Remove a layer, returning its former index and the layer itself
    pub fn remove_layer(&mut self, id: LayerId) -> Option<(usize, Layer)> {
        let index = self.map.layer_index(id)?;
        let layer = self.map.layers.remove(index);
        self.notify(MapChange::LayerRemoved { layer: id, index });
        Some((index, layer))
    }

    /// Replace a layer's properties, returning the previous ones
    pub fn set_layer_properties(&mut self, id: LayerId, properties: Properties) -> Option<Properties> {
        let Some(layer) = self.map.layer_mut(id) else {
            warn!("set_layer_properties: layer {} not found", id);
            return None;
        };
        let old = std::mem::replace(&mut layer.properties, properties);
        self.notify(MapChange::PropertiesChanged { layer: id });
        Some(old)
    }

    /// Append an object to an object layer
    pub fn add_object(&mut self, layer: LayerId, object: MapObject) -> bool {
        let len = self
            .map
            .layer(layer)
            .and_then(Layer::objects)
            .map(<[MapObject]>::len)
            .unwrap_or(0);
        self.insert_object(layer, len, object)
    }

    /// Insert an object at `index` (clamped) in an object layer
    pub fn insert_object(&mut self, layer: LayerId, index: usize, object: MapObject) -> bool {
        let Some(objects) = self.map.layer_mut(layer).and_then(Layer::objects_mut) else {
            warn!("insert_object: object layer {} not found", layer);
            return false;
        };
        let object_id = object.id;
        objects.insert(index.min(objects.len()), object);
        self.notify(MapChange::ObjectsAdded {
            layer,
            objects: vec![object_id],
        });
        true
    }

    /// Remove an object, returning its former index and the object
    pub fn remove_object(&mut self, layer: LayerId, object_id: Uuid) -> Option<(usize, MapObject)> {
        let objects = self.map.layer_mut(layer).and_then(Layer::objects_mut)?;
        let index = objects.iter().position(|o| o.id == object_id)?;
        let object = objects.remove(index);
        self.notify(MapChange::ObjectsRemoved {
            layer,
            objects: vec![object_id],
        });
        Some((index, object))
    }

    /// Add a tileset unless the map already has one with the same id
    pub fn add_tileset(&mut self, tileset: Tileset) -> bool {
        if self.map.has_tileset(tileset.id) {
            return false;
        }
        let id = tileset.id;
        self.map.tilesets.push(tileset);
        self.notify(MapChange::TilesetAdded { tileset: id });
        true
    }

    pub fn remove_tileset(&mut self, id: Uuid) -> Option<Tileset> {
        let index = self.map.tilesets.iter().position(|t| t.id == id)?;
        let tileset = self.map.tilesets.remove(index);
        self.notify(MapChange::TilesetRemoved { tileset: id });
        Some(tileset)
    }
}
