//! An open document together with its undo history

use tilepaint_automap::AutoMapPass;
use tilepaint_core::{LayerId, Map, MapDocument, Region, TileGrid};
use tracing::debug;

use crate::commands::{compose_automap, EditOp, PaintTransaction, UndoHistory};
use crate::EditorSettings;

/// The entry point for brush tools: paints stamps, runs auto-mapping and keeps
/// the undo history of one document.
#[derive(Debug)]
pub struct EditorSession {
    document: MapDocument,
    history: UndoHistory,
    settings: EditorSettings,
}

impl EditorSession {
    pub fn new(map: Map, settings: EditorSettings) -> Self {
        Self {
            document: MapDocument::new(map),
            history: UndoHistory::from_settings(&settings),
            settings,
        }
    }

    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut MapDocument {
        &mut self.document
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.history.set_limit(settings.undo_limit);
        self.settings = settings;
    }

    /// Paint the non-empty cells of `stamp` at `(x, y)` on `layer`.
    ///
    /// With `continue_stroke` set, the paint joins the previous undo step when
    /// stroke merging is enabled. When auto-mapping while drawing, `passes` run
    /// over the painted cells and their changes are undone together with the
    /// paint. Returns `false` if nothing was painted.
    pub fn paint_stamp(
        &mut self,
        layer: LayerId,
        x: i32,
        y: i32,
        stamp: &TileGrid,
        continue_stroke: bool,
        passes: &[&dyn AutoMapPass],
    ) -> bool {
        let mut transaction = PaintTransaction::from_stamp(&self.document, layer, x, y, stamp);
        if transaction.is_empty() {
            return false;
        }
        transaction.set_mergeable(continue_stroke && self.settings.merge_paint_strokes);
        transaction.redo(&mut self.document);

        if self.settings.automap_while_drawing {
            let region = transaction.painted_region(layer).cloned().unwrap_or_default();
            let mut automap = compose_automap(&self.document, passes, &region, Some(layer));
            automap.redo(&mut self.document);
            // Attached even when empty so every paint of a stroke has the same shape.
            transaction.push_child(EditOp::Paint(automap));
        }

        self.history.push_applied(transaction);
        true
    }

    /// Auto-map `region` as its own undo step. Returns `false` if nothing changed.
    pub fn automap(&mut self, region: &Region, passes: &[&dyn AutoMapPass]) -> bool {
        let transaction = compose_automap(&self.document, passes, region, None);
        if transaction.is_empty() {
            debug!("automap produced no changes");
            return false;
        }
        self.history.push(transaction, &mut self.document);
        true
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document)
    }
}
