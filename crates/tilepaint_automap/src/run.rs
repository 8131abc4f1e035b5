//! Running a sequence of passes over an expanding region

use tilepaint_core::{LayerId, Map, Region};
use tracing::{debug, warn};

use crate::{AutoMapContext, AutoMapPass};

/// Result of [`run_passes`]
#[derive(Debug)]
pub struct AutoMapRun<'m> {
    /// Working copies and side effects accumulated by all passes
    pub context: AutoMapContext<'m>,
    /// The working region after the last pass
    pub region: Region,
    /// Number of passes that ran (skipped passes are not counted)
    pub passes_run: usize,
}

/// Run `passes` in order over `region` of `map`.
///
/// Every pass is prepared before the first one runs. When `touched_layer` is
/// given, passes whose rules read none of the touched layers are skipped; an
/// unknown touched layer disables that filter.
///
/// Cells changed by a pass are added to the region seen by the following passes.
/// On bounded maps the region is kept within the map rectangle, and once it
/// covers the whole map passes are no longer asked to track changed cells.
pub fn run_passes<'m>(
    map: &'m Map,
    passes: &[&dyn AutoMapPass],
    region: &Region,
    touched_layer: Option<LayerId>,
) -> AutoMapRun<'m> {
    let mut context = AutoMapContext::new(map);
    for pass in passes {
        context = pass.prepare(context);
    }

    let mut filter_touched = false;
    if let Some(layer_id) = touched_layer {
        match map.layer(layer_id) {
            Some(layer) => {
                context.touched_layers.push(layer.name.clone());
                filter_touched = true;
            }
            None => warn!("run_passes: touched layer {} not found, running all passes", layer_id),
        }
    }

    let map_rect = Region::from_rect(map.bounds());
    let mut region = region.clone();
    let mut tracking = true;
    let mut passes_run = 0;

    for pass in passes {
        if tracking && !map.infinite && map_rect.subtracted(&region).is_empty() {
            debug!("automap region covers the whole map, no longer expanding");
            tracking = false;
        }

        if filter_touched
            && !context
                .touched_layers
                .iter()
                .any(|name| pass.rule_layer_name_used(name))
        {
            debug!("skipping pass '{}': no touched input layer", pass.name());
            continue;
        }

        let output = pass.auto_map(context, &region, tracking);
        context = output.context;
        passes_run += 1;

        if tracking {
            if let Some(applied) = output.applied {
                region = region.united(&applied);
            }
            if !map.infinite {
                region = region.intersected(&map_rect);
            }
        }
    }

    AutoMapRun {
        context,
        region,
        passes_run,
    }
}
