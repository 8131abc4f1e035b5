//! Turning an auto-map run into a single undoable transaction

use std::collections::BTreeSet;

use tilepaint_automap::{run_passes, AutoMapPass};
use tilepaint_core::{Layer, LayerData, LayerId, MapDocument, Region};
use tracing::debug;

use super::{EditOp, PaintTransaction};

/// Run `passes` over `region` of the document's map and collect the result as a
/// transaction that has not been applied yet.
///
/// Only cells that differ between a layer and its working copy are painted.
/// Structural results become children: tilesets the result actually uses,
/// property changes, non-empty new layers, placed objects and removals.
pub fn compose_automap(
    document: &MapDocument,
    passes: &[&dyn AutoMapPass],
    region: &Region,
    touched_layer: Option<LayerId>,
) -> PaintTransaction {
    let map = document.map();
    let run = run_passes(map, passes, region, touched_layer);
    let context = run.context;

    let mut transaction = PaintTransaction::new(document.id());
    transaction.set_description("Automap");

    for (layer, working) in context.output_layers() {
        let Some(original) = map.tile_layer(layer) else {
            continue;
        };
        let (ox, oy) = original.position();
        // Working copies of growable layers may extend past the original storage.
        let grown = working
            .region()
            .subtracted(&Region::from_rect(original.bounds()));
        let diff = original
            .compute_diff_region(working)
            .translated(ox, oy)
            .united(&grown);
        if diff.is_empty() {
            continue;
        }
        debug!("automap changed {} cells on layer {}", diff.cell_count(), layer);
        transaction.paint(document, layer, ox, oy, working.clone(), &diff);
    }

    for tileset in &context.new_tilesets {
        if context.is_tileset_used(tileset.id) {
            transaction.push_child(EditOp::add_tileset(tileset.clone()));
        }
    }

    for (&layer, properties) in &context.changed_properties {
        let unchanged = map.layer(layer).is_some_and(|l| &l.properties == properties);
        if unchanged {
            continue;
        }
        if let Some(op) = EditOp::change_properties(map, layer, properties.clone()) {
            transaction.push_child(op);
        }
    }

    let receives_objects: BTreeSet<LayerId> =
        context.new_objects.iter().map(|(layer, _)| *layer).collect();
    let mut added_layers = BTreeSet::new();
    let mut index = map.layers.len();
    for layer in &context.new_layers {
        if !keep_new_layer(layer, &receives_objects) {
            debug!("dropping empty new layer '{}'", layer.name);
            continue;
        }
        added_layers.insert(layer.id);
        transaction.push_child(EditOp::add_layer(index, layer.clone()));
        index += 1;
    }

    let placed: Vec<_> = context
        .new_objects
        .iter()
        .filter(|(layer, _)| map.layer(*layer).is_some() || added_layers.contains(layer))
        .cloned()
        .collect();
    if !placed.is_empty() {
        transaction.push_child(EditOp::add_objects(placed));
    }

    if !context.objects_to_remove.is_empty() {
        transaction.push_child(EditOp::remove_objects(context.objects_to_remove.clone()));
    }

    transaction
}

fn keep_new_layer(layer: &Layer, receives_objects: &BTreeSet<LayerId>) -> bool {
    match &layer.data {
        LayerData::Tiles(grid) => !grid.is_empty(),
        LayerData::Objects(objects) => !objects.is_empty() || receives_objects.contains(&layer.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepaint_automap::{AutoMapContext, PassOutput};
    use tilepaint_core::{Cell, Map, MapObject, PropertyValue, Rect, TileGrid, Tileset};
    use uuid::Uuid;

    fn tile(id: u32) -> Cell {
        Cell::new(Uuid::nil(), id)
    }

    /// Puts tile 99 on `Walls` wherever `Ground` has a tile.
    struct WallPass {
        ground: LayerId,
        walls: LayerId,
    }

    impl AutoMapPass for WallPass {
        fn name(&self) -> &str {
            "walls"
        }

        fn rule_layer_name_used(&self, layer_name: &str) -> bool {
            layer_name == "Ground"
        }

        fn auto_map<'m>(
            &self,
            mut context: AutoMapContext<'m>,
            region: &Region,
            track_applied: bool,
        ) -> PassOutput<'m> {
            let mut applied = Vec::new();
            for (x, y) in region.cells() {
                if context.cell_at_map(self.ground, x, y).is_empty() {
                    continue;
                }
                if context.set_cell_map(self.walls, x, y, tile(99)) {
                    applied.push(Rect::new(x, y, 1, 1));
                }
            }
            PassOutput {
                context,
                applied: track_applied.then(|| Region::from_rects(applied)),
            }
        }
    }

    /// Produces structural side effects only.
    struct DecoratePass {
        ground: LayerId,
        objects: LayerId,
        stale_object: Option<Uuid>,
        used: Tileset,
        unused: Tileset,
    }

    impl AutoMapPass for DecoratePass {
        fn name(&self) -> &str {
            "decorate"
        }

        fn rule_layer_name_used(&self, _layer_name: &str) -> bool {
            true
        }

        fn auto_map<'m>(
            &self,
            mut context: AutoMapContext<'m>,
            _region: &Region,
            _track_applied: bool,
        ) -> PassOutput<'m> {
            context.add_tileset(self.used.clone());
            context.add_tileset(self.unused.clone());

            let mut detail = Layer::new_tile_layer("Detail", 0, 0, 4, 4);
            if let Some(grid) = detail.tiles_mut() {
                grid.set_cell(0, 0, Cell::new(self.used.id, 1));
            }
            context.add_layer(detail);
            context.add_layer(Layer::new_tile_layer("Unused", 0, 0, 4, 4));
            context.add_layer(Layer::new_object_layer("Empty objects"));
            let spawns = context.add_layer(Layer::new_object_layer("Spawns"));
            context.place_object(spawns, MapObject::new("Spawn", [0.0, 0.0]));
            context.place_object(self.objects, MapObject::new("Chest", [8.0, 8.0]));

            context.set_layer_property(self.ground, "decorated", true);
            if let Some(id) = self.stale_object {
                context.remove_object(self.objects, id);
            }
            PassOutput::unchanged(context)
        }
    }

    fn document() -> (MapDocument, LayerId, LayerId, LayerId) {
        let mut map = Map::new("test", 4, 4);
        let ground = map.add_tile_layer("Ground");
        let walls = map.add_tile_layer("Walls");
        let objects = map.add_object_layer("Objects");
        if let Some(grid) = map.layer_mut(ground).and_then(Layer::tiles_mut) {
            grid.set_cell(1, 1, tile(1));
            grid.set_cell(2, 1, tile(1));
        }
        if let Some(grid) = map.layer_mut(walls).and_then(Layer::tiles_mut) {
            grid.set_cell(2, 1, tile(99));
        }
        (MapDocument::new(map), ground, walls, objects)
    }

    fn snapshot(doc: &MapDocument) -> Map {
        doc.map().clone()
    }

    #[test]
    fn test_only_changed_cells_are_painted() {
        let (mut doc, ground, walls, _) = document();
        let before = snapshot(&doc);
        let pass = WallPass { ground, walls };

        let mut tx = compose_automap(&doc, &[&pass], &Region::from_rect(Rect::new(0, 0, 4, 4)), None);
        assert_eq!(tx.description(), "Automap");
        assert_eq!(
            tx.painted_region(walls),
            Some(&Region::from_rect(Rect::new(1, 1, 1, 1)))
        );
        assert!(tx.painted_region(ground).is_none());
        assert_eq!(snapshot(&doc), before, "composition does not apply anything");

        tx.redo(&mut doc);
        let painted = doc.map().tile_layer(walls).map(|g| g.cell_at(1, 1));
        assert_eq!(painted, Some(tile(99)));

        tx.undo(&mut doc);
        assert_eq!(snapshot(&doc), before);
    }

    #[test]
    fn test_offset_layer_is_painted_in_map_frame() {
        let mut map = Map::new("offset", 8, 8);
        let ground = map.add_tile_layer("Ground");
        let walls = map.add_layer(Layer::new_tile_layer("Walls", 2, 1, 4, 4));
        if let Some(grid) = map.layer_mut(ground).and_then(Layer::tiles_mut) {
            grid.set_cell(0, 0, tile(1));
            grid.set_cell(3, 2, tile(1));
        }
        let mut doc = MapDocument::new(map);
        let before = snapshot(&doc);
        let pass = WallPass { ground, walls };

        // (0, 0) lies outside the walls layer and is dropped.
        let mut tx = compose_automap(&doc, &[&pass], &Region::from_rect(Rect::new(0, 0, 8, 8)), None);
        assert_eq!(
            tx.painted_region(walls),
            Some(&Region::from_rect(Rect::new(3, 2, 1, 1)))
        );

        tx.redo(&mut doc);
        let grid = doc.map().tile_layer(walls).expect("walls layer");
        assert_eq!(grid.cell_at(1, 1), tile(99));
        assert_eq!(grid.region(), Region::from_rect(Rect::new(3, 2, 1, 1)));

        tx.undo(&mut doc);
        assert_eq!(snapshot(&doc), before);
    }

    #[test]
    fn test_no_changes_give_empty_transaction() {
        let (doc, ground, walls, _) = document();
        let pass = WallPass { ground, walls };
        let tx = compose_automap(&doc, &[&pass], &Region::from_rect(Rect::new(2, 1, 1, 1)), None);
        assert!(tx.is_empty());
    }

    #[test]
    fn test_skipped_pass_when_touched_layer_is_not_an_input() {
        let (doc, ground, walls, _) = document();
        let pass = WallPass { ground, walls };
        let tx = compose_automap(&doc, &[&pass], &Region::from_rect(Rect::new(0, 0, 4, 4)), Some(walls));
        assert!(tx.is_empty());
    }

    #[test]
    fn test_structural_results_become_children() {
        let (mut doc, ground, _, objects) = document();
        let stale = MapObject::new("Stale", [0.0, 0.0]);
        let stale_id = stale.id;
        EditOp::add_objects(vec![(objects, stale)]).redo(&mut doc);
        let before = snapshot(&doc);

        let pass = DecoratePass {
            ground,
            objects,
            stale_object: Some(stale_id),
            used: Tileset::new("used", 4),
            unused: Tileset::new("unused", 4),
        };
        let used_id = pass.used.id;
        let mut tx = compose_automap(&doc, &[&pass], &Region::from_rect(Rect::new(0, 0, 4, 4)), None);

        let kinds: Vec<_> = tx.children().iter().map(EditOp::kind).collect();
        assert_eq!(
            kinds,
            vec![
                crate::commands::EditOpKind::AddTileset,
                crate::commands::EditOpKind::ChangeProperties,
                crate::commands::EditOpKind::AddLayer,
                crate::commands::EditOpKind::AddLayer,
                crate::commands::EditOpKind::AddObjects,
                crate::commands::EditOpKind::RemoveObjects,
            ]
        );

        tx.redo(&mut doc);
        let map = doc.map();
        let names: Vec<&str> = map.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Ground", "Walls", "Objects", "Detail", "Spawns"]);
        assert!(map.has_tileset(used_id));
        assert_eq!(map.tilesets.len(), 1);
        assert_eq!(
            map.layer(ground).and_then(|l| l.properties.get("decorated")),
            Some(&PropertyValue::Bool(true))
        );
        let object_names: Vec<&str> = map
            .layer(objects)
            .and_then(Layer::objects)
            .map(|o| o.iter().map(|o| o.type_name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(object_names, vec!["Chest"]);
        let spawns = map.layer_by_name("Spawns").and_then(Layer::objects).map(<[MapObject]>::len);
        assert_eq!(spawns, Some(1));

        tx.undo(&mut doc);
        assert_eq!(snapshot(&doc), before);
    }

    #[test]
    fn test_growable_working_copy_paints_outside_original_storage() {
        let mut map = Map::new_infinite("endless", 2, 2);
        let ground = map.add_tile_layer("Ground");
        let walls = map.add_tile_layer("Walls");
        if let Some(grid) = map.layer_mut(ground).and_then(Layer::tiles_mut) {
            grid.set_cell(5, 5, tile(1));
        }
        let mut doc = MapDocument::new(map);
        let pass = WallPass { ground, walls };

        let mut tx = compose_automap(&doc, &[&pass], &Region::from_rect(Rect::new(5, 5, 1, 1)), None);
        assert_eq!(
            tx.painted_region(walls),
            Some(&Region::from_rect(Rect::new(5, 5, 1, 1)))
        );
        tx.redo(&mut doc);
        let cell = doc.map().tile_layer(walls).map(|g: &TileGrid| g.cell_at(5, 5));
        assert_eq!(cell, Some(tile(99)));
    }
}
