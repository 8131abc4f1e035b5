//! Auto-map composition driver for tilepaint.
//!
//! The primary entry point is [`run_passes`], which runs a sequence of
//! [`AutoMapPass`]es over an expanding [`Region`](tilepaint_core::Region) of a
//! [`Map`](tilepaint_core::Map). Passes never touch the map itself: they write
//! into working copies held by the [`AutoMapContext`] that is threaded through
//! every call. Turning the finished context into an undoable edit is the
//! caller's job.
//!
//! Rule matching is not part of this crate; a pass is an opaque producer of
//! modified layer copies and structural changes.

mod context;
mod pass;
mod run;

pub use context::AutoMapContext;
pub use pass::{AutoMapPass, PassOutput};
pub use run::{run_passes, AutoMapRun};
