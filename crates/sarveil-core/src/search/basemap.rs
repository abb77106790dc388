use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::catalog::{execute, Catalog, CatalogQuery, Filter};
use crate::consts::{BASEMAP_BANDS, OPTICAL_COLLECTION, PROP_CLOUDY_PIXEL_PERCENTAGE};
use crate::error::{Result, SarveilError};
use crate::geo::{DateWindow, Region};
use crate::pipeline::config::BasemapConfig;
use crate::pipeline::PipelineStage;
use crate::scene::{BasemapRecord, SceneRecord};

/// Query for optical scenes fully covering the region below the cloud threshold,
/// least cloudy first.
pub fn basemap_query(region: &Region, window: DateWindow, cloudy_pixel_threshold: f64) -> CatalogQuery {
    CatalogQuery::new(OPTICAL_COLLECTION, region.query_bounds, window)
        .filter(Filter::ContainsRegion)
        .filter(Filter::less_than(
            PROP_CLOUDY_PIXEL_PERCENTAGE,
            cloudy_pixel_threshold,
        ))
        .sort_by(PROP_CLOUDY_PIXEL_PERCENTAGE, true)
        .select(&BASEMAP_BANDS)
        .limit(1)
}

/// Find a cloud-free optical basemap, widening the lookback window until one turns up.
///
/// Windows are tried in configuration order and the search stops at the first
/// non-empty result. `Ok(None)` means every window came back empty.
pub fn find_basemap(
    catalog: &dyn Catalog,
    region: &Region,
    config: &BasemapConfig,
    today: NaiveDate,
) -> Result<Option<BasemapRecord>> {
    if config.search_days.is_empty() {
        return Err(SarveilError::InvalidConfig(
            "basemap search needs at least one window".to_string(),
        ));
    }

    for &days in &config.search_days {
        let window = DateWindow::recent(today, days)?;
        info!(days, %window, "Searching basemap window");

        let query = basemap_query(region, window, config.cloudy_pixel_threshold);
        let scenes = execute(catalog, &query, PipelineStage::SearchingBasemap)?;
        let Some(descriptor) = scenes.into_iter().next() else {
            debug!(days, "No cloud-free scene in window, widening");
            continue;
        };

        let cloud_percentage = descriptor.metadata.number(PROP_CLOUDY_PIXEL_PERCENTAGE);
        let scene = SceneRecord::from_descriptor(descriptor, 0)?;
        info!(
            scene = %scene.id,
            date = %scene.date_label(),
            days,
            cloud = ?cloud_percentage,
            "Using basemap scene"
        );
        return Ok(Some(BasemapRecord {
            scene,
            search_window_days: days,
            cloud_percentage,
        }));
    }

    warn!(
        windows = config.search_days.len(),
        threshold = config.cloudy_pixel_threshold,
        "Could not find a cloud-free basemap"
    );
    Ok(None)
}
