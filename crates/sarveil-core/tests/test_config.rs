#[allow(dead_code)]
mod common;

use std::path::PathBuf;

use common::date;
use sarveil_core::change::ChangeMode;
use sarveil_core::error::SarveilError;
use sarveil_core::pipeline::config::{AnimationConfig, DateRangeConfig};
use sarveil_core::pipeline::{PipelineConfig, PipelineStage};
use sarveil_core::sequence::LoopCount;

fn base() -> PipelineConfig {
    PipelineConfig::for_poi("Harbor", 45.69481, 34.42467, PathBuf::from("out"))
}

fn assert_invalid(config: &PipelineConfig) {
    assert!(matches!(
        config.validate(),
        Err(SarveilError::InvalidConfig(_))
    ));
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_defaults_are_valid() {
    let config = base();
    config.validate().unwrap();
    assert_eq!(config.default_window_days, 14);
    assert_eq!(config.mode, ChangeMode::Primary);
    assert_eq!(config.basemap.search_days, vec![30, 60, 90, 120, 150, 180]);
    assert_eq!(config.basemap.cloudy_pixel_threshold, 5.0);
    assert_eq!(config.region.buffer_radius_meters, 3000.0);
    assert_eq!(config.region.frame_half_width_degrees, 0.4);
    assert_eq!(config.animation.fps, 1);
    assert_eq!(config.animation.loop_count, LoopCount::Infinite);
}

#[test]
fn test_minimal_toml_fills_defaults() {
    let toml_str = r#"
        output = "frames"

        [poi]
        name = "Harbor"
        lat = 45.69481
        lon = 34.42467
    "#;
    let config: PipelineConfig = toml::from_str(toml_str).unwrap();
    config.validate().unwrap();
    assert!(config.window.is_none());
    assert_eq!(config.render.width, 1000);
    assert!(config.basemap.enabled);
}

#[test]
fn test_full_toml() {
    let toml_str = r#"
        output = "frames"
        mode = "secondary"
        max_frames = 12

        [poi]
        name = "Harbor"
        lat = 45.69481
        lon = 34.42467

        [window]
        from = "2024-03-01"
        to = "2024-03-31"

        [basemap]
        enabled = true
        required = true
        cloudy_pixel_threshold = 10.0
        search_days = [30, 90]

        [animation]
        fps = 2
        loop_count = { finite = 3 }
    "#;
    let config: PipelineConfig = toml::from_str(toml_str).unwrap();
    config.validate().unwrap();
    assert_eq!(config.mode, ChangeMode::Secondary);
    assert_eq!(config.max_frames, Some(12));
    assert!(config.basemap.required);
    assert_eq!(config.animation.loop_count, LoopCount::Finite(3));
    let window = config.date_window(date(2024, 6, 1)).unwrap();
    assert_eq!(window.days(), 31);
}

#[test]
fn test_toml_round_trip() {
    let mut config = base();
    config.window = Some(DateRangeConfig {
        from: date(2024, 1, 1),
        to: date(2024, 1, 14),
    });
    let text = toml::to_string(&config).unwrap();
    let parsed: PipelineConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed.poi.name, "Harbor");
    assert_eq!(parsed.render.overlay_with_basemap_style, config.render.overlay_with_basemap_style);
    assert_eq!(
        parsed.date_window(date(2024, 6, 1)).unwrap(),
        config.date_window(date(2024, 6, 1)).unwrap()
    );
}

#[test]
fn test_default_window_is_recent() {
    let config = base();
    let window = config.date_window(date(2024, 6, 30)).unwrap();
    assert_eq!(window.from().date_naive(), date(2024, 6, 16));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_rejects_blank_name() {
    let mut config = base();
    config.poi.name = "  ".into();
    assert_invalid(&config);
}

#[test]
fn test_rejects_zero_max_frames() {
    let mut config = base();
    config.max_frames = Some(0);
    assert_invalid(&config);
}

#[test]
fn test_rejects_unordered_search_days() {
    let mut config = base();
    config.basemap.search_days = vec![60, 30];
    assert_invalid(&config);
}

#[test]
fn test_search_days_ignored_when_disabled() {
    let mut config = base();
    config.basemap.enabled = false;
    config.basemap.search_days = Vec::new();
    config.validate().unwrap();
}

#[test]
fn test_rejects_bad_style() {
    let mut config = base();
    config.render.overlay_style.opacity = 1.5;
    assert_invalid(&config);
    let mut config = base();
    config.render.basemap_style.gamma = 0.0;
    assert_invalid(&config);
}

#[test]
fn test_rejects_zero_fps() {
    let mut config = base();
    config.animation.fps = 0;
    assert_invalid(&config);
}

#[test]
fn test_rejects_zero_size_canvas() {
    let mut config = base();
    config.render.width = 0;
    assert_invalid(&config);
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[test]
fn test_animation_display() {
    let animation = AnimationConfig {
        fps: 2,
        loop_count: LoopCount::Finite(1),
    };
    assert_eq!(animation.to_string(), "2 fps, repeats 1x");
}

#[test]
fn test_stage_display() {
    assert_eq!(PipelineStage::SearchingBasemap.to_string(), "Searching basemap");
    assert_eq!(PipelineStage::Writing.to_string(), "Writing output");
}
