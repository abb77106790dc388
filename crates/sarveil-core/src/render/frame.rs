use std::sync::Arc;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::debug;

use crate::consts::{BASEMAP_BANDS, MIN_INDEX_DIGITS, PARALLEL_FRAME_THRESHOLD};
use crate::error::{Result, SarveilError};
use crate::geo::Region;
use crate::pipeline::config::RenderConfig;
use crate::render::annotate::{Annotator, HeaderText};
use crate::render::compose::{blend_layer, draw_gridlines, draw_progress_bar, MapArea};
use crate::render::rasterize::{
    LayerBands, LayerRasterizer, LayerRequest, LinearRasterizer, VisParams,
};
use crate::scene::{BandTriple, BasemapRecord, SceneRecord};

/// Layers a frame can carry, in drawing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Basemap,
    Overlay,
    Gridlines,
    ProgressBar,
    Annotations,
}

/// One rendered, annotated frame.
#[derive(Clone, Debug)]
pub struct FrameArtifact {
    pub sequence_index: usize,
    /// Acquisition date, `YYYY-MM-DD`.
    pub timestamp_label: String,
    /// Sortable name, e.g. `007_2024-03-05`.
    pub output_identifier: String,
    /// (index + 1) / total.
    pub progress_fraction: f64,
    /// POI name shown centered in the header.
    pub title: String,
    /// Platform/pass label shown on the right, when known.
    pub subtitle: Option<String>,
    /// Layers actually drawn, in drawing order.
    pub layers: Vec<LayerKind>,
    pub pixels: RgbaImage,
}

impl FrameArtifact {
    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.layers.contains(&kind)
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.output_identifier)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Fraction of the sequence completed once frame `index` is shown.
pub fn progress_fraction(index: usize, total: usize) -> Result<f64> {
    if total == 0 || index >= total {
        return Err(SarveilError::FrameIndexOutOfRange { index, total });
    }
    Ok((index + 1) as f64 / total as f64)
}

/// Zero-padded index plus date; lexical order equals sequence order.
pub fn output_identifier(index: usize, total: usize, date_label: &str) -> String {
    let digits = total.saturating_sub(1).max(1).to_string().len();
    let width = digits.max(MIN_INDEX_DIGITS);
    format!("{index:0width$}_{date_label}")
}

/// Turns scenes plus the optional basemap into annotated frames.
pub struct FrameRenderer {
    config: RenderConfig,
    rasterizer: Arc<dyn LayerRasterizer>,
    annotator: Annotator,
}

impl FrameRenderer {
    pub fn new(
        config: RenderConfig,
        rasterizer: Arc<dyn LayerRasterizer>,
        annotator: Annotator,
    ) -> Self {
        Self {
            config,
            rasterizer,
            annotator,
        }
    }

    /// Linear rasterizer and fonts from the system plus `config.font_dirs`.
    pub fn from_config(config: RenderConfig) -> Self {
        let annotator = Annotator::new(&config.font_dirs);
        Self::new(config, Arc::new(LinearRasterizer), annotator)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    fn map_area(&self) -> MapArea {
        MapArea {
            x: 0,
            y: self.config.header_height,
            width: self.config.width,
            height: self.config.map_height,
        }
    }

    fn blank_canvas(&self) -> Result<RgbaImage> {
        let height = self.config.header_height + self.config.map_height;
        if self.config.width == 0 || self.config.map_height == 0 {
            return Err(SarveilError::InvalidDimensions {
                width: self.config.width as usize,
                height: height as usize,
            });
        }
        let [r, g, b] = self.config.background;
        Ok(RgbaImage::from_pixel(
            self.config.width,
            height,
            Rgba([r, g, b, 255]),
        ))
    }

    fn draw_layer(
        &self,
        canvas: &mut RgbaImage,
        bands: LayerBands<'_>,
        scene: &SceneRecord,
        region: &Region,
        params: VisParams,
    ) -> Result<()> {
        let area = self.map_area();
        let request = LayerRequest {
            bands,
            footprint: scene.footprint,
            clip: region.query_bounds,
            extent: region.frame_extent,
            params,
            width: area.width,
            height: area.height,
        };
        let layer = self.rasterizer.rasterize(&request)?;
        blend_layer(canvas, &layer, area);
        Ok(())
    }

    fn draw_basemap(&self, canvas: &mut RgbaImage, basemap: &BasemapRecord, region: &Region) -> Result<()> {
        let scene = &basemap.scene;
        let [r, g, b] = BASEMAP_BANDS;
        let bands = LayerBands {
            red: scene.band(r)?,
            green: scene.band(g)?,
            blue: scene.band(b)?,
        };
        self.draw_layer(canvas, bands, scene, region, self.config.basemap_style)
    }

    /// Render frame `scene.sequence_index` of `total_count`.
    ///
    /// Layer order: basemap, change overlay, gridlines, progress bar, header text.
    pub fn render(
        &self,
        scene: &SceneRecord,
        basemap: Option<&BasemapRecord>,
        region: &Region,
        poi_name: &str,
        total_count: usize,
    ) -> Result<FrameArtifact> {
        let index = scene.sequence_index;
        let fraction = progress_fraction(index, total_count)?;
        let derived: &BandTriple =
            scene
                .derived_bands
                .as_ref()
                .ok_or_else(|| SarveilError::MissingBand {
                    scene_id: scene.id.clone(),
                    band: "change".to_string(),
                })?;

        let mut canvas = self.blank_canvas()?;
        let mut layers = Vec::with_capacity(5);
        let area = self.map_area();

        let overlay_style = match basemap {
            Some(basemap) => {
                self.draw_basemap(&mut canvas, basemap, region)?;
                layers.push(LayerKind::Basemap);
                self.config.overlay_with_basemap_style
            }
            None => self.config.overlay_style,
        };

        self.draw_layer(&mut canvas, derived.into(), scene, region, overlay_style)?;
        layers.push(LayerKind::Overlay);

        if let Some(interval) = self.config.gridline_interval_degrees {
            draw_gridlines(&mut canvas, &region.frame_extent, area, interval);
            layers.push(LayerKind::Gridlines);
        }

        draw_progress_bar(&mut canvas, &region.frame_extent, area, fraction);
        layers.push(LayerKind::ProgressBar);

        let timestamp_label = scene.date_label();
        let subtitle = scene.platform_label();
        let header = HeaderText {
            left: timestamp_label.clone(),
            center: poi_name.to_string(),
            right: subtitle.clone(),
        };
        if self
            .annotator
            .draw_header(&mut canvas, &header, self.config.header_height)?
        {
            layers.push(LayerKind::Annotations);
        }

        let output_identifier = output_identifier(index, total_count, &timestamp_label);
        debug!(frame = %output_identifier, scene = %scene.id, ?layers, "Rendered frame");

        Ok(FrameArtifact {
            sequence_index: index,
            timestamp_label,
            output_identifier,
            progress_fraction: fraction,
            title: poi_name.to_string(),
            subtitle,
            layers,
            pixels: canvas,
        })
    }

    /// Render every scene, preserving input order. `on_frame` is called once per finished frame.
    pub fn render_all<F>(
        &self,
        scenes: &[SceneRecord],
        basemap: Option<&BasemapRecord>,
        region: &Region,
        poi_name: &str,
        on_frame: F,
    ) -> Result<Vec<FrameArtifact>>
    where
        F: Fn(usize) + Sync,
    {
        let total = scenes.len();
        let render_one = |scene: &SceneRecord| -> Result<FrameArtifact> {
            let frame = self.render(scene, basemap, region, poi_name, total)?;
            on_frame(frame.sequence_index);
            Ok(frame)
        };

        if total >= PARALLEL_FRAME_THRESHOLD {
            scenes.par_iter().map(render_one).collect()
        } else {
            scenes.iter().map(render_one).collect()
        }
    }

    /// The basemap alone over the frame extent, with gridlines and header.
    pub fn render_basemap(
        &self,
        basemap: &BasemapRecord,
        region: &Region,
        poi_name: &str,
    ) -> Result<RgbaImage> {
        let mut canvas = self.blank_canvas()?;
        self.draw_basemap(&mut canvas, basemap, region)?;
        if let Some(interval) = self.config.gridline_interval_degrees {
            draw_gridlines(&mut canvas, &region.frame_extent, self.map_area(), interval);
        }
        let header = HeaderText {
            left: basemap.scene.date_label(),
            center: poi_name.to_string(),
            right: None,
        };
        self.annotator
            .draw_header(&mut canvas, &header, self.config.header_height)?;
        Ok(canvas)
    }
}
