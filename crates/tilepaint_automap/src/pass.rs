use tilepaint_core::Region;

use crate::AutoMapContext;

/// What a pass hands back to the driver
#[derive(Debug)]
pub struct PassOutput<'m> {
    /// The context, updated with this pass's working copies and side effects
    pub context: AutoMapContext<'m>,
    /// Cells this pass changed, in the map frame. Only expected when the driver
    /// asked the pass to track them.
    pub applied: Option<Region>,
}

impl<'m> PassOutput<'m> {
    /// Output of a pass that changed nothing
    pub fn unchanged(context: AutoMapContext<'m>) -> Self {
        Self {
            context,
            applied: None,
        }
    }
}

/// One rule-driven transformation over a region of a map.
///
/// The context is passed in by value and handed back, so the data flowing from
/// one pass to the next is visible at every call site.
pub trait AutoMapPass {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Called once for every pass before any pass runs, so each can set up the
    /// working copies it reads from or writes to.
    fn prepare<'m>(&self, context: AutoMapContext<'m>) -> AutoMapContext<'m> {
        context
    }

    /// Whether the rules of this pass read the layer with this name
    fn rule_layer_name_used(&self, layer_name: &str) -> bool;

    /// Run the pass over `region` (map frame). When `track_applied` is set, the
    /// pass reports the cells it changed in [`PassOutput::applied`].
    fn auto_map<'m>(
        &self,
        context: AutoMapContext<'m>,
        region: &Region,
        track_applied: bool,
    ) -> PassOutput<'m>;
}
