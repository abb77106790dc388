use anyhow::Result;
use clap::Args;
use sarveil_core::geo::resolve_region;
use sarveil_core::search::find_basemap;

use super::{today, PoiArgs};
use crate::summary::print_basemap_summary;

#[derive(Args)]
pub struct BasemapArgs {
    #[command(flatten)]
    pub poi: PoiArgs,

    /// Maximum cloudy pixel percentage
    #[arg(long)]
    pub cloud: Option<f64>,
}

/// Run the widening basemap search alone and report the pick.
pub fn run(args: &BasemapArgs) -> Result<()> {
    let mut config = args.poi.load_config(std::path::Path::new("."))?;
    if let Some(cloud) = args.cloud {
        config.basemap.cloudy_pixel_threshold = cloud;
    }
    config.validate()?;

    let catalog = args.poi.open_catalog()?;
    let region = resolve_region(
        (config.poi.lat, config.poi.lon),
        config.region.buffer_radius_meters,
        config.region.frame_half_width_degrees,
    )?;
    let basemap = find_basemap(catalog.as_ref(), &region, &config.basemap, today())?;

    print_basemap_summary(&region, basemap.as_ref());
    Ok(())
}
