//! Working state shared by the passes of one auto-map run

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tilepaint_core::{
    Cell, Layer, LayerId, Map, MapObject, Properties, PropertyValue, TileGrid, Tileset,
};
use tracing::warn;
use uuid::Uuid;

/// Ephemeral state of one auto-map run.
///
/// Holds working copies of the map's tile layers (created the first time a pass
/// asks for one) and accumulates the structural side effects the passes produce.
/// The map itself is only read.
#[derive(Debug, Clone)]
pub struct AutoMapContext<'m> {
    map: &'m Map,
    /// Original layer -> working copy
    output_layers: BTreeMap<LayerId, TileGrid>,
    /// Names of the layers touched by the interactive edit that triggered this run
    pub touched_layers: Vec<String>,
    /// Layers created by passes, in creation order
    pub new_layers: Vec<Layer>,
    /// Tilesets the passes may have introduced
    pub new_tilesets: Vec<Tileset>,
    /// Objects to place, with the layer receiving each one
    pub new_objects: Vec<(LayerId, MapObject)>,
    /// Existing objects scheduled for removal
    pub objects_to_remove: Vec<(LayerId, Uuid)>,
    /// Full replacement property maps for existing layers
    pub changed_properties: BTreeMap<LayerId, Properties>,
}

impl<'m> AutoMapContext<'m> {
    pub fn new(map: &'m Map) -> Self {
        Self {
            map,
            output_layers: BTreeMap::new(),
            touched_layers: Vec::new(),
            new_layers: Vec::new(),
            new_tilesets: Vec::new(),
            new_objects: Vec::new(),
            objects_to_remove: Vec::new(),
            changed_properties: BTreeMap::new(),
        }
    }

    /// The map being auto-mapped, as it was before the run
    pub fn map(&self) -> &'m Map {
        self.map
    }

    /// Working copy of a tile layer, if a pass has created one
    pub fn output_layer(&self, layer: LayerId) -> Option<&TileGrid> {
        self.output_layers.get(&layer)
    }

    /// Working copy of a tile layer, cloned from the map on first access.
    /// Returns `None` for unknown layers and object layers.
    pub fn output_layer_mut(&mut self, layer: LayerId) -> Option<&mut TileGrid> {
        let map = self.map;
        match self.output_layers.entry(layer) {
            Entry::Occupied(entry) => Some(entry.into_mut()),
            Entry::Vacant(entry) => {
                let grid = map.tile_layer(layer)?.clone();
                Some(entry.insert(grid))
            }
        }
    }

    /// All (original layer, working copy) pairs
    pub fn output_layers(&self) -> impl Iterator<Item = (LayerId, &TileGrid)> + '_ {
        self.output_layers.iter().map(|(id, grid)| (*id, grid))
    }

    /// Read a cell in the layer's local frame, preferring the working copy
    pub fn cell_at(&self, layer: LayerId, x: i32, y: i32) -> Cell {
        self.output_layers
            .get(&layer)
            .or_else(|| self.map.tile_layer(layer))
            .map(|grid| grid.cell_at(x, y))
            .unwrap_or(Cell::EMPTY)
    }

    /// Read a cell at map coordinates, preferring the working copy
    pub fn cell_at_map(&self, layer: LayerId, x: i32, y: i32) -> Cell {
        self.output_layers
            .get(&layer)
            .or_else(|| self.map.tile_layer(layer))
            .map(|grid| grid.cell_at(x - grid.x(), y - grid.y()))
            .unwrap_or(Cell::EMPTY)
    }

    /// Write a cell at map coordinates into the layer's working copy.
    /// Returns `false` for unknown layers and object layers.
    pub fn set_cell_map(&mut self, layer: LayerId, x: i32, y: i32, cell: Cell) -> bool {
        let Some(grid) = self.output_layer_mut(layer) else {
            return false;
        };
        let (gx, gy) = grid.position();
        grid.set_cell(x - gx, y - gy, cell);
        true
    }

    /// Whether `name` is one of the touched layers
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched_layers.iter().any(|n| n == name)
    }

    /// Queue a new layer, returning its handle
    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id;
        self.new_layers.push(layer);
        id
    }

    pub fn new_layer_mut(&mut self, layer: LayerId) -> Option<&mut Layer> {
        self.new_layers.iter_mut().find(|l| l.id == layer)
    }

    /// Queue a tileset. Tilesets already in the map or already queued are ignored.
    pub fn add_tileset(&mut self, tileset: Tileset) {
        if self.map.has_tileset(tileset.id) || self.new_tilesets.iter().any(|t| t.id == tileset.id) {
            return;
        }
        self.new_tilesets.push(tileset);
    }

    /// Queue an object for placement on an existing or new object layer
    pub fn place_object(&mut self, layer: LayerId, object: MapObject) {
        self.new_objects.push((layer, object));
    }

    /// Schedule an existing object for removal. Repeated requests are ignored.
    pub fn remove_object(&mut self, layer: LayerId, object_id: Uuid) {
        if !self.objects_to_remove.contains(&(layer, object_id)) {
            self.objects_to_remove.push((layer, object_id));
        }
    }

    /// Set a property on an existing layer. The first change to a layer starts
    /// from its current properties. Returns `false` if the layer does not exist.
    pub fn set_layer_property(
        &mut self,
        layer: LayerId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> bool {
        let map = self.map;
        let properties = match self.changed_properties.entry(layer) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let Some(existing) = map.layer(layer) else {
                    warn!("set_layer_property: layer {} not found", layer);
                    return false;
                };
                entry.insert(existing.properties.clone())
            }
        };
        properties.insert(key.into(), value.into());
        true
    }

    /// Whether the result of this run references the tileset, either in a
    /// working copy, a new tile layer, or an untouched layer of the map.
    pub fn is_tileset_used(&self, tileset_id: Uuid) -> bool {
        let in_outputs = self.output_layers.values().any(|g| g.uses_tileset(tileset_id));
        let in_new_layers = self
            .new_layers
            .iter()
            .filter_map(Layer::tiles)
            .any(|g| g.uses_tileset(tileset_id));
        let in_map = self
            .map
            .layers
            .iter()
            .filter(|l| !self.output_layers.contains_key(&l.id))
            .filter_map(Layer::tiles)
            .any(|g| g.uses_tileset(tileset_id));
        in_outputs || in_new_layers || in_map
    }
}
