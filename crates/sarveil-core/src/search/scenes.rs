use rayon::prelude::*;
use tracing::{info, warn};

use crate::catalog::{execute, Catalog, CatalogQuery, Filter, SceneDescriptor};
use crate::change::{annotate_scene, ChangeMode};
use crate::consts::{
    BAND_VH, BAND_VV, INSTRUMENT_MODE_IW, PARALLEL_FRAME_THRESHOLD, PROP_INSTRUMENT_MODE,
    PROP_POLARISATION, SAR_COLLECTION,
};
use crate::error::{Result, SarveilError};
use crate::geo::{DateWindow, Region};
use crate::pipeline::PipelineStage;
use crate::scene::SceneRecord;

/// Query for dual-polarization IW scenes over the region within `window`.
pub fn scene_query(region: &Region, window: DateWindow) -> CatalogQuery {
    CatalogQuery::new(SAR_COLLECTION, region.query_bounds, window)
        .filter(Filter::list_contains(PROP_POLARISATION, BAND_VV))
        .filter(Filter::list_contains(PROP_POLARISATION, BAND_VH))
        .filter(Filter::equals(PROP_INSTRUMENT_MODE, INSTRUMENT_MODE_IW))
        .select(&[BAND_VV, BAND_VH])
}

/// Find every SAR scene in `window`, ordered by acquisition time with change bands attached.
///
/// Sequence indices run contiguously from 0. With `max_frames`, only the most
/// recent scenes are kept and indices are assigned after that cut.
pub fn find_scenes(
    catalog: &dyn Catalog,
    region: &Region,
    window: &DateWindow,
    mode: ChangeMode,
    max_frames: Option<usize>,
) -> Result<Vec<SceneRecord>> {
    info!(%window, %mode, "Searching SAR scenes");
    let query = scene_query(region, *window);
    let descriptors = execute(catalog, &query, PipelineStage::SearchingScenes)?;

    if descriptors.is_empty() {
        warn!(%window, "Could not find SAR scenes");
        return Err(SarveilError::NoScenesFound {
            window: window.to_string(),
            query: query.to_string(),
        });
    }

    let found = descriptors.len();
    let ordered = order_descriptors(descriptors, max_frames);
    info!(found, kept = ordered.len(), "Found SAR scenes");

    let mut scenes = ordered
        .into_iter()
        .enumerate()
        .map(|(i, d)| SceneRecord::from_descriptor(d, i))
        .collect::<Result<Vec<_>>>()?;

    if scenes.len() >= PARALLEL_FRAME_THRESHOLD {
        scenes
            .par_iter_mut()
            .try_for_each(|scene| annotate_scene(scene, mode))?;
    } else {
        scenes
            .iter_mut()
            .try_for_each(|scene| annotate_scene(scene, mode))?;
    }

    Ok(scenes)
}

/// Sort by (timestamp, id) and keep the last `max_frames` entries.
fn order_descriptors(
    mut descriptors: Vec<SceneDescriptor>,
    max_frames: Option<usize>,
) -> Vec<SceneDescriptor> {
    descriptors.sort_by(|a, b| {
        a.metadata
            .timestamp_millis
            .cmp(&b.metadata.timestamp_millis)
            .then_with(|| a.metadata.id.cmp(&b.metadata.id))
    });
    if let Some(max) = max_frames {
        if descriptors.len() > max {
            descriptors.drain(..descriptors.len() - max);
        }
    }
    descriptors
}
