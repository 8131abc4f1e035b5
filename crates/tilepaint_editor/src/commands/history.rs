use tilepaint_core::MapDocument;
use tracing::{debug, trace};

use super::PaintTransaction;
use crate::EditorSettings;

/// Undo and redo stacks of paint transactions
#[derive(Debug, Default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct UndoHistory {
    /// Transactions that have been applied
    undo_stack: Vec<PaintTransaction>,
    /// Transactions that have been undone
    redo_stack: Vec<PaintTransaction>,
    /// Maximum undo depth; 0 is unlimited
    limit: usize,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self::with_limit(settings.undo_limit)
    }

    /// Apply a transaction and add it to history
    pub fn push(&mut self, mut transaction: PaintTransaction, document: &mut MapDocument) {
        transaction.redo(document);
        self.push_applied(transaction);
    }

    /// Record a transaction whose changes have already been applied (e.g. while
    /// painting). A mergeable transaction is folded into the previous entry
    /// when possible. Empty transactions are dropped.
    pub fn push_applied(&mut self, transaction: PaintTransaction) {
        if transaction.is_empty() {
            return;
        }
        self.redo_stack.clear();

        if let Some(top) = self.undo_stack.last_mut() {
            if top.merge_with(&transaction) {
                trace!("merged '{}' into previous undo step", transaction.description());
                return;
            }
        }
        self.undo_stack.push(transaction);
        self.enforce_limit();
    }

    /// Undo the last transaction
    pub fn undo(&mut self, document: &mut MapDocument) -> bool {
        let Some(mut transaction) = self.undo_stack.pop() else {
            return false;
        };
        transaction.undo(document);
        self.redo_stack.push(transaction);
        true
    }

    /// Redo the last undone transaction
    pub fn redo(&mut self, document: &mut MapDocument) -> bool {
        let Some(mut transaction) = self.redo_stack.pop() else {
            return false;
        };
        transaction.redo(document);
        self.undo_stack.push(transaction);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of transaction to undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|t| t.description())
    }

    /// Get description of transaction to redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|t| t.description())
    }

    /// Number of undo steps
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        if self.limit == 0 || self.undo_stack.len() <= self.limit {
            return;
        }
        let excess = self.undo_stack.len() - self.limit;
        self.undo_stack.drain(..excess);
        debug!("dropped {} oldest undo steps", excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepaint_core::{Cell, LayerId, Map, Rect, Region, TileGrid};
    use uuid::Uuid;

    fn tile(id: u32) -> Cell {
        Cell::new(Uuid::nil(), id)
    }

    fn document() -> (MapDocument, LayerId) {
        let mut map = Map::new("test", 4, 4);
        let ground = map.add_tile_layer("Ground");
        (MapDocument::new(map), ground)
    }

    fn paint(doc: &MapDocument, layer: LayerId, x: i32, id: u32, mergeable: bool) -> PaintTransaction {
        let stamp = TileGrid::filled(0, 0, 1, 1, tile(id));
        PaintTransaction::from_stamp(doc, layer, x, 0, &stamp).with_mergeable(mergeable)
    }

    fn cell(doc: &MapDocument, layer: LayerId, x: i32) -> Cell {
        doc.map()
            .tile_layer(layer)
            .map(|g| g.cell_at(x, 0))
            .unwrap_or(Cell::EMPTY)
    }

    #[test]
    fn test_push_undo_redo() {
        let (mut doc, ground) = document();
        let mut history = UndoHistory::new();
        assert!(!history.can_undo());

        let tx = paint(&doc, ground, 0, 1, false);
        history.push(tx, &mut doc);
        assert_eq!(cell(&doc, ground, 0), tile(1));
        assert_eq!(history.undo_description(), Some("Paint"));

        assert!(history.undo(&mut doc));
        assert_eq!(cell(&doc, ground, 0), Cell::EMPTY);
        assert!(history.can_redo());
        assert_eq!(history.redo_description(), Some("Paint"));

        assert!(history.redo(&mut doc));
        assert_eq!(cell(&doc, ground, 0), tile(1));
        assert!(!history.redo(&mut doc));
    }

    #[test]
    fn test_new_push_clears_redo() {
        let (mut doc, ground) = document();
        let mut history = UndoHistory::new();
        history.push(paint(&doc, ground, 0, 1, false), &mut doc);
        history.undo(&mut doc);

        history.push(paint(&doc, ground, 1, 2, false), &mut doc);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_mergeable_transactions_become_one_step() {
        let (mut doc, ground) = document();
        let mut history = UndoHistory::new();
        history.push(paint(&doc, ground, 0, 1, false), &mut doc);
        history.push(paint(&doc, ground, 1, 1, true), &mut doc);
        history.push(paint(&doc, ground, 2, 1, true), &mut doc);
        assert_eq!(history.len(), 1);

        history.undo(&mut doc);
        assert!(doc.map().tile_layer(ground).is_some_and(TileGrid::is_empty));
    }

    #[test]
    fn test_empty_transactions_are_not_recorded() {
        let (mut doc, _) = document();
        let mut history = UndoHistory::new();
        history.push(PaintTransaction::new(doc.id()), &mut doc);
        assert!(history.is_empty());
    }

    #[test]
    fn test_limit_drops_oldest_steps() {
        let (mut doc, ground) = document();
        let mut history = UndoHistory::with_limit(2);
        for x in 0..4 {
            history.push(paint(&doc, ground, x, 1, false), &mut doc);
        }
        assert_eq!(history.len(), 2);

        while history.undo(&mut doc) {}
        assert_eq!(cell(&doc, ground, 0), tile(1));
        assert_eq!(cell(&doc, ground, 1), tile(1));
        assert_eq!(cell(&doc, ground, 2), Cell::EMPTY);
        let painted = doc
            .map()
            .tile_layer(ground)
            .map(|g| g.region())
            .unwrap_or_default();
        assert_eq!(painted, Region::from_rect(Rect::new(0, 0, 2, 1)));
    }

    #[test]
    fn test_lowering_limit_trims_history() {
        let (mut doc, ground) = document();
        let mut history = UndoHistory::from_settings(&EditorSettings::default());
        for x in 0..3 {
            history.push(paint(&doc, ground, x, 1, false), &mut doc);
        }
        assert_eq!(history.limit(), 0);
        history.set_limit(1);
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
