//! Undoable tile paints
//!
//! A [`PaintTransaction`] records, per target layer, the cells it paints and the
//! cells it overwrote. Painting the same layer again inside one transaction
//! overwrites the recorded paint but only extends the recorded originals, so undo
//! always returns to the state from before the transaction's first paint.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tilepaint_core::{LayerId, MapDocument, Region, TileGrid, TilePainter};
use tracing::warn;
use uuid::Uuid;

use super::EditOp;

/// What a transaction knows about one target layer
#[derive(Debug, Clone)]
pub struct LayerRecord {
    /// Accumulated painted cells; map cell `(cx, cy)` reads from `(cx - x, cy - y)`
    source: TileGrid,
    /// Original cells, in the map frame
    erased: TileGrid,
    /// Every cell this record has painted, in the map frame
    painted_region: Region,
    x: i32,
    y: i32,
}

impl LayerRecord {
    pub fn source(&self) -> &TileGrid {
        &self.source
    }

    pub fn erased(&self) -> &TileGrid {
        &self.erased
    }

    pub fn painted_region(&self) -> &Region {
        &self.painted_region
    }

    /// Offset of the source grid in the map frame
    pub fn offset(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Fold a later record for the same layer into this one
    fn merge(&mut self, other: &LayerRecord) {
        let combined = self.painted_region.united(&other.painted_region);
        let added = combined.subtracted(&self.painted_region);
        self.painted_region = combined;

        self.source.set_cells(
            other.x - self.x,
            other.y - self.y,
            &other.source,
            &other.painted_region.translated(-self.x, -self.y),
        );

        for (x, y) in added.cells() {
            self.erased.set_cell(x, y, other.erased.cell_at(x, y));
        }
    }
}

/// An undoable edit made of tile paints and child operations.
///
/// On redo the transaction paints first and then applies its children in order;
/// on undo the children are undone in reverse before the original cells are
/// restored. Nothing is written to the document until `redo` is called.
#[derive(Debug, Clone)]
pub struct PaintTransaction {
    document_id: Uuid,
    mergeable: bool,
    description: String,
    layers: BTreeMap<LayerId, LayerRecord>,
    children: Vec<EditOp>,
}

impl PaintTransaction {
    /// Create an empty transaction for the document with the given id
    pub fn new(document_id: Uuid) -> Self {
        Self {
            document_id,
            mergeable: false,
            description: "Paint".to_string(),
            layers: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Paint the non-empty cells of `stamp` with its top-left corner at `(x, y)`
    pub fn from_stamp(document: &MapDocument, target: LayerId, x: i32, y: i32, stamp: &TileGrid) -> Self {
        let (sx, sy) = stamp.position();
        let region = stamp.region().translated(x - sx, y - sy);
        Self::from_stamp_region(document, target, x, y, stamp, &region)
    }

    /// Paint `stamp` at `(x, y)`, restricted to `region` (map frame)
    pub fn from_stamp_region(
        document: &MapDocument,
        target: LayerId,
        x: i32,
        y: i32,
        stamp: &TileGrid,
        region: &Region,
    ) -> Self {
        let mut transaction = Self::new(document.id());
        transaction.paint(document, target, x, y, stamp.clone(), region);
        transaction
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Whether this transaction may be folded into the one before it
    pub fn is_mergeable(&self) -> bool {
        self.mergeable
    }

    pub fn set_mergeable(&mut self, mergeable: bool) {
        self.mergeable = mergeable;
    }

    pub fn with_mergeable(mut self, mergeable: bool) -> Self {
        self.mergeable = mergeable;
        self
    }

    /// A transaction with no paints and no children has no effect
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.children.is_empty()
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    pub fn record(&self, layer: LayerId) -> Option<&LayerRecord> {
        self.layers.get(&layer)
    }

    pub fn painted_region(&self, layer: LayerId) -> Option<&Region> {
        self.layers.get(&layer).map(LayerRecord::painted_region)
    }

    pub fn erased(&self, layer: LayerId) -> Option<&TileGrid> {
        self.layers.get(&layer).map(LayerRecord::erased)
    }

    pub fn source(&self, layer: LayerId) -> Option<&TileGrid> {
        self.layers.get(&layer).map(LayerRecord::source)
    }

    pub fn children(&self) -> &[EditOp] {
        &self.children
    }

    /// Append a child operation, applied after this transaction's paints
    pub fn push_child(&mut self, child: EditOp) {
        self.children.push(child);
    }

    /// Record painting `source` onto `target` over `region` (map frame), with
    /// map cell `(cx, cy)` taking `source`'s cell at `(cx - x, cy - y)`.
    ///
    /// On bounded maps the region is clipped to the layer. A region that misses
    /// the layer entirely, or a target that is not a tile layer, records nothing.
    pub fn paint(
        &mut self,
        document: &MapDocument,
        target: LayerId,
        x: i32,
        y: i32,
        source: TileGrid,
        region: &Region,
    ) {
        let map = document.map();
        let Some(grid) = map.tile_layer(target) else {
            warn!("paint: tile layer {} not found", target);
            return;
        };
        let region = if map.infinite {
            region.clone()
        } else {
            region.intersected(&Region::from_rect(grid.bounds()))
        };
        if region.is_empty() {
            return;
        }
        let (tx, ty) = grid.position();

        match self.layers.entry(target) {
            Entry::Vacant(entry) => {
                let mut erased = TileGrid::buffer();
                erased.set_cells(tx, ty, grid, &region);
                entry.insert(LayerRecord {
                    source: source.into_growable(),
                    erased,
                    painted_region: region,
                    x,
                    y,
                });
            }
            Entry::Occupied(entry) => {
                let record = entry.into_mut();
                let combined = record.painted_region.united(&region);
                let added = combined.subtracted(&record.painted_region);
                record.painted_region = combined;

                record.source.set_cells(
                    x - record.x,
                    y - record.y,
                    &source,
                    &region.translated(-record.x, -record.y),
                );
                // Cells painted before keep the originals captured the first time.
                record.erased.set_cells(tx, ty, grid, &added);
            }
        }
    }

    /// Restore the original cells, after undoing the children in reverse order
    pub fn undo(&mut self, document: &mut MapDocument) {
        for child in self.children.iter_mut().rev() {
            child.undo(document);
        }
        for (&layer, record) in &self.layers {
            TilePainter::new(document, layer).set_cells(0, 0, &record.erased, &record.painted_region);
        }
    }

    /// Apply the painted cells, then the children in order
    pub fn redo(&mut self, document: &mut MapDocument) {
        for (&layer, record) in &self.layers {
            TilePainter::new(document, layer).set_cells(
                record.x,
                record.y,
                &record.source,
                &record.painted_region,
            );
        }
        for child in &mut self.children {
            child.redo(document);
        }
    }

    /// Fold `other`, the transaction recorded right after this one, into this
    /// one. Returns `false` and leaves `self` untouched when `other` belongs to
    /// another document, is not mergeable, or has incompatible children.
    pub fn merge_with(&mut self, other: &PaintTransaction) -> bool {
        if self.document_id != other.document_id || !other.mergeable {
            return false;
        }
        if !self.can_merge_children(other) {
            return false;
        }
        self.merge_unchecked(other);
        true
    }

    /// Children are compatible when `other` has none, or when both lists have
    /// the same shape and every pair can merge.
    pub(crate) fn can_merge_children(&self, other: &PaintTransaction) -> bool {
        other.children.is_empty()
            || (self.children.len() == other.children.len()
                && self
                    .children
                    .iter()
                    .zip(&other.children)
                    .all(|(mine, theirs)| mine.can_merge(theirs)))
    }

    pub(crate) fn merge_unchecked(&mut self, other: &PaintTransaction) {
        for (&layer, record) in &other.layers {
            match self.layers.entry(layer) {
                Entry::Vacant(entry) => {
                    entry.insert(record.clone());
                }
                Entry::Occupied(entry) => entry.into_mut().merge(record),
            }
        }
        if !other.children.is_empty() {
            for (mine, theirs) in self.children.iter_mut().zip(&other.children) {
                mine.merge(theirs);
            }
        }
    }
}
