//! Structural edits carried as children of a paint transaction

use tilepaint_core::{Layer, LayerId, Map, MapDocument, MapObject, Properties, Tileset};
use tracing::warn;
use uuid::Uuid;

use super::PaintTransaction;

/// The kind of an [`EditOp`], without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOpKind {
    Paint,
    AddLayer,
    ChangeProperties,
    AddObjects,
    RemoveObjects,
    AddTileset,
}

/// A child operation of a [`PaintTransaction`].
///
/// Every variant keeps what it needs to be applied again after an undo, so the
/// same value can go through any number of redo/undo cycles.
#[derive(Debug, Clone)]
pub enum EditOp {
    /// Nested paints, such as the auto-mapping that follows a brush stroke
    Paint(PaintTransaction),
    /// Insert a layer. The layer is held here while it is not in the map.
    AddLayer {
        index: usize,
        id: LayerId,
        layer: Option<Layer>,
    },
    /// Replace the property map of a layer
    ChangeProperties {
        layer: LayerId,
        old: Properties,
        new: Properties,
    },
    /// Append objects to object layers
    AddObjects { entries: Vec<(LayerId, MapObject)> },
    /// Remove objects; `removed` holds what the last redo took out, with indices
    RemoveObjects {
        targets: Vec<(LayerId, Uuid)>,
        removed: Vec<(LayerId, usize, MapObject)>,
    },
    /// Add a tileset; `added` is set when the last redo actually added it
    AddTileset { tileset: Tileset, added: bool },
}

impl EditOp {
    pub fn add_layer(index: usize, layer: Layer) -> Self {
        Self::AddLayer {
            index,
            id: layer.id,
            layer: Some(layer),
        }
    }

    /// Replace the properties of `layer`, capturing the current ones for undo.
    /// Returns `None` if the layer does not exist.
    pub fn change_properties(map: &Map, layer: LayerId, new: Properties) -> Option<Self> {
        let old = map.layer(layer)?.properties.clone();
        Some(Self::ChangeProperties { layer, old, new })
    }

    pub fn add_objects(entries: Vec<(LayerId, MapObject)>) -> Self {
        Self::AddObjects { entries }
    }

    pub fn remove_objects(targets: Vec<(LayerId, Uuid)>) -> Self {
        Self::RemoveObjects {
            targets,
            removed: Vec::new(),
        }
    }

    pub fn add_tileset(tileset: Tileset) -> Self {
        Self::AddTileset {
            tileset,
            added: false,
        }
    }

    pub fn kind(&self) -> EditOpKind {
        match self {
            Self::Paint(_) => EditOpKind::Paint,
            Self::AddLayer { .. } => EditOpKind::AddLayer,
            Self::ChangeProperties { .. } => EditOpKind::ChangeProperties,
            Self::AddObjects { .. } => EditOpKind::AddObjects,
            Self::RemoveObjects { .. } => EditOpKind::RemoveObjects,
            Self::AddTileset { .. } => EditOpKind::AddTileset,
        }
    }

    pub fn redo(&mut self, document: &mut MapDocument) {
        match self {
            Self::Paint(transaction) => transaction.redo(document),
            Self::AddLayer { index, id, layer } => match layer.take() {
                Some(layer) => *index = document.insert_layer(*index, layer),
                None => warn!("AddLayer redo: layer {} is already in the map", id),
            },
            Self::ChangeProperties { layer, new, .. } => {
                document.set_layer_properties(*layer, new.clone());
            }
            Self::AddObjects { entries } => {
                for (layer, object) in entries.iter() {
                    document.add_object(*layer, object.clone());
                }
            }
            Self::RemoveObjects { targets, removed } => {
                removed.clear();
                for &(layer, object_id) in targets.iter() {
                    match document.remove_object(layer, object_id) {
                        Some((index, object)) => removed.push((layer, index, object)),
                        None => warn!("RemoveObjects: object {} not found on layer {}", object_id, layer),
                    }
                }
            }
            Self::AddTileset { tileset, added } => {
                *added = document.add_tileset(tileset.clone());
            }
        }
    }

    pub fn undo(&mut self, document: &mut MapDocument) {
        match self {
            Self::Paint(transaction) => transaction.undo(document),
            Self::AddLayer { index, id, layer } => {
                if let Some((removed_at, removed)) = document.remove_layer(*id) {
                    *index = removed_at;
                    *layer = Some(removed);
                }
            }
            Self::ChangeProperties { layer, old, .. } => {
                document.set_layer_properties(*layer, old.clone());
            }
            Self::AddObjects { entries } => {
                // Keep the latest state of each object for the next redo.
                for (layer, object) in entries.iter_mut().rev() {
                    if let Some((_, latest)) = document.remove_object(*layer, object.id) {
                        *object = latest;
                    }
                }
            }
            Self::RemoveObjects { removed, .. } => {
                for (layer, index, object) in std::mem::take(removed).into_iter().rev() {
                    document.insert_object(layer, index, object);
                }
            }
            Self::AddTileset { tileset, added } => {
                if *added {
                    if let Some(latest) = document.remove_tileset(tileset.id) {
                        *tileset = latest;
                    }
                    *added = false;
                }
            }
        }
    }

    /// Whether `other`, recorded after `self`, can be folded into it
    pub fn can_merge(&self, other: &EditOp) -> bool {
        match (self, other) {
            (Self::Paint(mine), Self::Paint(theirs)) => {
                mine.document_id() == theirs.document_id() && mine.can_merge_children(theirs)
            }
            (
                Self::ChangeProperties { layer: mine, .. },
                Self::ChangeProperties { layer: theirs, .. },
            ) => mine == theirs,
            (Self::AddObjects { .. }, Self::AddObjects { .. }) => true,
            (Self::RemoveObjects { .. }, Self::RemoveObjects { .. }) => true,
            (Self::AddTileset { tileset: mine, .. }, Self::AddTileset { tileset: theirs, .. }) => {
                mine.id == theirs.id
            }
            _ => false,
        }
    }

    /// Fold `other` into `self`. Does nothing unless [`EditOp::can_merge`] holds.
    pub fn merge(&mut self, other: &EditOp) {
        if !self.can_merge(other) {
            return;
        }
        match (self, other) {
            (Self::Paint(mine), Self::Paint(theirs)) => mine.merge_unchecked(theirs),
            (Self::ChangeProperties { new, .. }, Self::ChangeProperties { new: latest, .. }) => {
                *new = latest.clone();
            }
            (Self::AddObjects { entries }, Self::AddObjects { entries: more }) => {
                entries.extend(more.iter().cloned());
            }
            (
                Self::RemoveObjects { targets, removed },
                Self::RemoveObjects {
                    targets: more_targets,
                    removed: more_removed,
                },
            ) => {
                targets.extend(more_targets.iter().copied());
                removed.extend(more_removed.iter().cloned());
            }
            (Self::AddTileset { added, .. }, Self::AddTileset { added: also_added, .. }) => {
                *added |= *also_added;
            }
            _ => {}
        }
    }
}

impl From<PaintTransaction> for EditOp {
    fn from(transaction: PaintTransaction) -> Self {
        Self::Paint(transaction)
    }
}
