//! Undoable editing on top of tilepaint_core
//!
//! - `PaintTransaction` - Mergeable paints with child operations
//! - `compose_automap` - Auto-map runs as a single transaction
//! - `UndoHistory` - Undo/redo stacks with stroke merging
//! - `EditorSession` - A document, its history and its settings
//!
//! Enable the `bevy` feature to use `UndoHistory` and `EditorSettings` as
//! Bevy resources.

pub mod commands;
mod session;
mod settings;

pub use commands::{
    compose_automap, EditOp, EditOpKind, LayerRecord, PaintTransaction, UndoHistory,
};
pub use session::EditorSession;
pub use settings::{EditorSettings, SettingsError};
