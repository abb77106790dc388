use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::{Result, SarveilError};
use crate::geo::resolve_region;
use crate::io::store::ArtifactStore;
use crate::render::FrameRenderer;
use crate::search::{find_basemap, find_scenes};
use crate::sequence::assemble;

use super::config::PipelineConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter, RunOutput};

/// Run the full animation pipeline with a thread-safe progress reporter.
///
/// Nothing is written to `store` unless every frame rendered and the sequence
/// assembled; a failing run leaves no partial output behind.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    catalog: &dyn Catalog,
    renderer: &FrameRenderer,
    store: &mut dyn ArtifactStore,
    today: NaiveDate,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<RunOutput> {
    config.validate()?;
    let poi = &config.poi;

    reporter.begin_stage(PipelineStage::ResolvingRegion, None);
    let region = resolve_region(
        (poi.lat, poi.lon),
        config.region.buffer_radius_meters,
        config.region.frame_half_width_degrees,
    )?;
    let window = config.date_window(today)?;
    info!(
        poi = %poi.name,
        lat = poi.lat,
        lon = poi.lon,
        %window,
        catalog = catalog.name(),
        "Resolved region"
    );
    reporter.finish_stage();

    let basemap = if config.basemap.enabled {
        reporter.begin_stage(
            PipelineStage::SearchingBasemap,
            Some(config.basemap.search_days.len()),
        );
        let found = find_basemap(catalog, &region, &config.basemap, today)?;
        reporter.finish_stage();
        match found {
            Some(basemap) => Some(basemap),
            None if config.basemap.required => {
                return Err(SarveilError::BasemapUnavailable {
                    windows_tried: config.basemap.search_days.len(),
                    threshold: config.basemap.cloudy_pixel_threshold,
                });
            }
            None => {
                warn!(poi = %poi.name, "Rendering without basemap");
                None
            }
        }
    } else {
        None
    };

    reporter.begin_stage(PipelineStage::SearchingScenes, None);
    let scenes = find_scenes(catalog, &region, &window, config.mode, config.max_frames)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::RenderingFrames, Some(scenes.len()));
    let done = AtomicUsize::new(0);
    let frames = renderer.render_all(&scenes, basemap.as_ref(), &region, &poi.name, |_| {
        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(n);
    })?;
    reporter.finish_stage();
    info!(frames = frames.len(), "Rendered frames");

    reporter.begin_stage(PipelineStage::Assembling, None);
    let sequence = assemble(frames, config.animation.fps, config.animation.loop_count)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Writing, Some(sequence.len()));
    if let Some(ref basemap) = basemap {
        let image = renderer.render_basemap(basemap, &region, &poi.name)?;
        store.put_basemap(&poi.name, &image)?;
    }
    for (i, frame) in sequence.frames.iter().enumerate() {
        store.put_frame(&poi.name, frame)?;
        reporter.advance(i + 1);
    }
    store.put_sequence(&poi.name, &sequence)?;
    reporter.finish_stage();
    info!(poi = %poi.name, frames = sequence.len(), "Pipeline complete");

    Ok(RunOutput {
        region,
        window,
        basemap,
        sequence,
    })
}

/// Run the full animation pipeline without progress reporting, rendering with
/// the defaults from `config.render`.
pub fn run_pipeline(
    config: &PipelineConfig,
    catalog: &dyn Catalog,
    store: &mut dyn ArtifactStore,
    today: NaiveDate,
) -> Result<RunOutput> {
    let renderer = FrameRenderer::from_config(config.render.clone());
    let reporter = Arc::new(NoOpReporter);
    run_pipeline_reported(config, catalog, &renderer, store, today, reporter)
}
