use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use sarveil_core::io::store::DirectoryStore;
use sarveil_core::pipeline::{run_pipeline_reported, PipelineConfig};
use sarveil_core::render::FrameRenderer;
use sarveil_core::sequence::LoopCount;

use super::{today, PoiArgs};
use crate::progress::BarReporter;
use crate::summary::print_run_summary;

const DEFAULT_OUTPUT_DIR: &str = "frames";

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub poi: PoiArgs,

    /// Output root directory; frames land in <output>/<name>/ [default: frames]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Animation frames per second [default: 1]
    #[arg(long)]
    pub fps: Option<u32>,

    /// Play the animation this many times instead of looping forever
    #[arg(long)]
    pub repeat: Option<u16>,

    /// Keep only the most recent N scenes
    #[arg(long)]
    pub max_frames: Option<usize>,

    /// Abort when no cloud-free basemap is found
    #[arg(long)]
    pub require_basemap: bool,

    /// Skip the basemap search and render the overlay only
    #[arg(long, conflicts_with = "require_basemap")]
    pub no_basemap: bool,

    /// Frame width and map height in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// Extra directory with annotation fonts (.ttf/.otf)
    #[arg(long)]
    pub fonts: Vec<PathBuf>,
}

impl RunArgs {
    /// Apply the flags given on the command line on top of `config`.
    ///
    /// Flags left out keep the value from the config file, or the defaults
    /// when there is none.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        if let Some(ref output) = self.output {
            config.output = output.clone();
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
        if let Some(n) = self.repeat {
            config.animation.loop_count = LoopCount::Finite(n);
        }
        if self.max_frames.is_some() {
            config.max_frames = self.max_frames;
        }
        if self.require_basemap {
            config.basemap.enabled = true;
            config.basemap.required = true;
        }
        if self.no_basemap {
            config.basemap.enabled = false;
            config.basemap.required = false;
        }
        if let Some(size) = self.size {
            config.render.width = size;
            config.render.map_height = size;
        }
        config.render.font_dirs.extend(self.fonts.iter().cloned());
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let default_output = PathBuf::from(DEFAULT_OUTPUT_DIR);
    let mut config = args
        .poi
        .load_config(args.output.as_deref().unwrap_or(&default_output))?;
    args.apply_overrides(&mut config);
    config.validate()?;

    let catalog = args.poi.open_catalog()?;
    let renderer = FrameRenderer::from_config(config.render.clone());
    let mut store = DirectoryStore::new(&config.output);
    let reporter = Arc::new(BarReporter::new());

    let output = run_pipeline_reported(
        &config,
        catalog.as_ref(),
        &renderer,
        &mut store,
        today(),
        reporter,
    )?;

    print_run_summary(&config, &output);
    println!(
        "Animation saved to {}",
        store.sequence_path(&config.poi.name).display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(args: &[&str]) -> RunArgs {
        let mut argv = vec!["sarveil", "--catalog", "cat"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().run
    }

    fn file_config() -> PipelineConfig {
        let mut config = PipelineConfig::for_poi("Port", 45.0, 34.0, PathBuf::from("from-file"));
        config.animation.fps = 3;
        config.animation.loop_count = LoopCount::Finite(2);
        config.max_frames = Some(10);
        config
    }

    #[test]
    fn explicit_flags_override_config_file() {
        let args = parse(&[
            "--config",
            "poi.toml",
            "--output",
            "out",
            "--fps",
            "5",
            "--max-frames",
            "4",
            "--no-basemap",
            "--fonts",
            "fonts",
        ]);
        let mut config = file_config();
        args.apply_overrides(&mut config);

        assert_eq!(config.output, PathBuf::from("out"));
        assert_eq!(config.animation.fps, 5);
        assert_eq!(config.max_frames, Some(4));
        assert!(!config.basemap.enabled);
        assert_eq!(config.render.font_dirs, vec![PathBuf::from("fonts")]);
    }

    #[test]
    fn omitted_flags_keep_config_file_values() {
        let args = parse(&["--config", "poi.toml"]);
        let mut config = file_config();
        let before = config.clone();
        args.apply_overrides(&mut config);

        assert_eq!(config.output, before.output);
        assert_eq!(config.animation.fps, 3);
        assert_eq!(config.animation.loop_count, LoopCount::Finite(2));
        assert_eq!(config.max_frames, Some(10));
        assert_eq!(config.basemap.enabled, before.basemap.enabled);
    }
}
