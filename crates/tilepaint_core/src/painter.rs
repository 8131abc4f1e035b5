//! Writing cells into live layers

use tracing::{trace, warn};

use crate::{Cell, LayerId, MapChange, MapDocument, Region, TileGrid};

/// Applies cells to one live tile layer of a [`MapDocument`].
///
/// This is the only way the editing engine writes into a layer that belongs to
/// the document: besides copying the cells, it keeps the document's modified
/// flag and change log up to date. Coordinates are in the map frame.
pub struct TilePainter<'a> {
    document: &'a mut MapDocument,
    layer: LayerId,
}

impl<'a> TilePainter<'a> {
    pub fn new(document: &'a mut MapDocument, layer: LayerId) -> Self {
        Self { document, layer }
    }

    /// Cell of the layer at map coordinates `(x, y)`
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        self.document
            .map()
            .tile_layer(self.layer)
            .map(|grid| grid.cell_at(x - grid.x(), y - grid.y()))
            .unwrap_or(Cell::EMPTY)
    }

    /// The part of `region` that can be painted. On bounded maps this is the
    /// intersection with the layer bounds; infinite maps accept any region.
    pub fn paintable_region(&self, region: &Region) -> Region {
        let map = self.document.map();
        match map.tile_layer(self.layer) {
            Some(_) if map.infinite => region.clone(),
            Some(grid) => region.intersected(&Region::from_rect(grid.bounds())),
            None => Region::new(),
        }
    }

    /// Copy `source` into the layer over `region`, reading `source` at
    /// `(cx - x, cy - y)` for map cell `(cx, cy)`.
    ///
    /// Returns the region actually written.
    pub fn set_cells(&mut self, x: i32, y: i32, source: &TileGrid, region: &Region) -> Region {
        let paintable = self.paintable_region(region);
        if paintable.is_empty() {
            return paintable;
        }

        let layer = self.layer;
        let Some(grid) = self.document.tile_grid_mut(layer) else {
            warn!("TilePainter: tile layer {} not found", layer);
            return Region::new();
        };
        let (lx, ly) = grid.position();
        grid.set_cells(x - lx, y - ly, source, &paintable.translated(-lx, -ly));

        trace!("painted {} cells on layer {}", paintable.cell_count(), layer);
        self.document.notify(MapChange::TilesChanged {
            layer,
            region: paintable.clone(),
        });
        paintable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Layer, Map, Rect};
    use uuid::Uuid;

    fn tile(id: u32) -> Cell {
        Cell::new(Uuid::nil(), id)
    }

    #[test]
    fn test_set_cells_translates_into_layer_frame() {
        let mut map = Map::new("test", 8, 8);
        let layer = map.add_layer(Layer::new_tile_layer("Offset", 2, 2, 4, 4));
        let mut doc = MapDocument::new(map);

        let stamp = TileGrid::filled(0, 0, 2, 2, tile(7));
        let written = TilePainter::new(&mut doc, layer).set_cells(
            3,
            3,
            &stamp,
            &Region::from_rect(Rect::new(3, 3, 2, 2)),
        );

        assert_eq!(written.cell_count(), 4);
        let grid = doc.map().tile_layer(layer).expect("tile layer");
        assert_eq!(grid.cell_at(1, 1), tile(7));
        assert_eq!(grid.cell_at(2, 2), tile(7));
        assert_eq!(grid.cell_at(0, 0), Cell::EMPTY);
        assert_eq!(TilePainter::new(&mut doc, layer).cell_at(4, 4), tile(7));
    }

    #[test]
    fn test_set_cells_clips_and_notifies() {
        let mut map = Map::new("test", 4, 4);
        let layer = map.add_tile_layer("Ground");
        let mut doc = MapDocument::new(map);

        let stamp = TileGrid::filled(0, 0, 4, 4, tile(1));
        let written = TilePainter::new(&mut doc, layer).set_cells(
            2,
            2,
            &stamp,
            &Region::from_rect(Rect::new(2, 2, 4, 4)),
        );

        let expected = Region::from_rect(Rect::new(2, 2, 2, 2));
        assert_eq!(written, expected);
        assert!(doc.is_modified());
        assert_eq!(
            doc.take_changes(),
            vec![MapChange::TilesChanged {
                layer,
                region: expected
            }]
        );
    }

    #[test]
    fn test_region_outside_layer_is_noop() {
        let mut map = Map::new("test", 4, 4);
        let layer = map.add_tile_layer("Ground");
        let mut doc = MapDocument::new(map);

        let stamp = TileGrid::filled(0, 0, 1, 1, tile(1));
        let written = TilePainter::new(&mut doc, layer).set_cells(
            10,
            10,
            &stamp,
            &Region::from_rect(Rect::new(10, 10, 1, 1)),
        );
        assert!(written.is_empty());
        assert!(!doc.is_modified());
        assert!(doc.changes().is_empty());
    }

    #[test]
    fn test_infinite_map_accepts_any_region() {
        let mut map = Map::new_infinite("endless", 4, 4);
        let layer = map.add_tile_layer("Ground");
        let mut doc = MapDocument::new(map);

        let stamp = TileGrid::filled(0, 0, 1, 1, tile(5));
        TilePainter::new(&mut doc, layer).set_cells(
            -20,
            30,
            &stamp,
            &Region::from_rect(Rect::new(-20, 30, 1, 1)),
        );
        assert_eq!(TilePainter::new(&mut doc, layer).cell_at(-20, 30), tile(5));
    }

    #[test]
    fn test_missing_layer_is_noop() {
        let mut doc = MapDocument::new(Map::new("test", 4, 4));
        let stamp = TileGrid::filled(0, 0, 1, 1, tile(5));
        let written = TilePainter::new(&mut doc, LayerId::new()).set_cells(
            0,
            0,
            &stamp,
            &Region::from_rect(Rect::new(0, 0, 1, 1)),
        );
        assert!(written.is_empty());
        assert!(!doc.is_modified());
    }
}
