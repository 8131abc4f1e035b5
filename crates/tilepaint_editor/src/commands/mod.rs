//! Undo/redo transactions

mod automap;
mod history;
mod ops;
mod paint;

pub use automap::compose_automap;
pub use history::UndoHistory;
pub use ops::{EditOp, EditOpKind};
pub use paint::{LayerRecord, PaintTransaction};
