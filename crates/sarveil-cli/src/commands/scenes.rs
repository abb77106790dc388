use anyhow::Result;
use clap::Args;
use sarveil_core::geo::resolve_region;
use sarveil_core::search::find_scenes;

use super::{today, PoiArgs};
use crate::summary::print_scene_table;

#[derive(Args)]
pub struct ScenesArgs {
    #[command(flatten)]
    pub poi: PoiArgs,

    /// Keep only the most recent N scenes
    #[arg(long)]
    pub max_frames: Option<usize>,
}

/// List the SAR scenes a run would animate, in frame order.
pub fn run(args: &ScenesArgs) -> Result<()> {
    let mut config = args.poi.load_config(std::path::Path::new("."))?;
    if args.max_frames.is_some() {
        config.max_frames = args.max_frames;
    }
    config.validate()?;

    let catalog = args.poi.open_catalog()?;
    let region = resolve_region(
        (config.poi.lat, config.poi.lon),
        config.region.buffer_radius_meters,
        config.region.frame_half_width_degrees,
    )?;
    let window = config.date_window(today())?;
    let scenes = find_scenes(
        catalog.as_ref(),
        &region,
        &window,
        config.mode,
        config.max_frames,
    )?;

    print_scene_table(&region, &scenes);
    Ok(())
}
