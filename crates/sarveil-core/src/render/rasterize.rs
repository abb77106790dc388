use image::RgbaImage;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{Result, SarveilError};
use crate::geo::{BoundingBox, FrameExtent};
use crate::scene::BandTriple;

/// Visualization parameters for turning three bands into an RGBA layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisParams {
    /// Band value drawn as black.
    pub min: f32,
    /// Band value drawn at full intensity.
    pub max: f32,
    /// Output = stretched^(1/gamma).
    pub gamma: f32,
    /// Layer opacity in [0, 1].
    pub opacity: f32,
    /// Hide pixels whose mean band value is at or below this threshold.
    #[serde(default)]
    pub mask_threshold: Option<f32>,
}

impl Default for VisParams {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            gamma: 1.0,
            opacity: 1.0,
            mask_threshold: None,
        }
    }
}

impl VisParams {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.max <= self.min {
            return Err(format!("max ({}) must exceed min ({})", self.max, self.min));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(format!("gamma must be positive, got {}", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!("opacity must be within [0, 1], got {}", self.opacity));
        }
        Ok(())
    }

    /// Linear stretch to [0, 1] followed by gamma. Non-finite input maps to 0.
    pub fn stretch(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return 0.0;
        }
        let t = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        t.powf(1.0 / self.gamma)
    }

    fn alpha(&self) -> u8 {
        (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Borrowed red/green/blue rasters for one layer.
#[derive(Clone, Copy, Debug)]
pub struct LayerBands<'a> {
    pub red: &'a Array2<f32>,
    pub green: &'a Array2<f32>,
    pub blue: &'a Array2<f32>,
}

impl<'a> From<&'a BandTriple> for LayerBands<'a> {
    fn from(triple: &'a BandTriple) -> Self {
        Self {
            red: &triple.red,
            green: &triple.green,
            blue: &triple.blue,
        }
    }
}

/// Everything a rasterizer needs to draw one layer over the frame extent.
#[derive(Clone, Copy, Debug)]
pub struct LayerRequest<'a> {
    pub bands: LayerBands<'a>,
    /// Geographic bounds covered by the band rasters.
    pub footprint: BoundingBox,
    /// Pixels outside these bounds stay transparent.
    pub clip: BoundingBox,
    /// Geographic area spanned by the output layer.
    pub extent: FrameExtent,
    pub params: VisParams,
    pub width: u32,
    pub height: u32,
}

/// Turns georeferenced bands plus visualization parameters into a drawable layer.
pub trait LayerRasterizer: Send + Sync {
    /// Returns a straight-alpha RGBA layer of `request.width` x `request.height`.
    fn rasterize(&self, request: &LayerRequest<'_>) -> Result<RgbaImage>;
}

/// Nearest-neighbour resampling with a per-channel linear stretch and gamma.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearRasterizer;

impl LayerRasterizer for LinearRasterizer {
    fn rasterize(&self, request: &LayerRequest<'_>) -> Result<RgbaImage> {
        let bands = request.bands;
        let (rows, cols) = bands.red.dim();
        if rows == 0
            || cols == 0
            || bands.green.dim() != (rows, cols)
            || bands.blue.dim() != (rows, cols)
        {
            return Err(SarveilError::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        if request.width == 0 || request.height == 0 {
            return Err(SarveilError::InvalidDimensions {
                width: request.width as usize,
                height: request.height as usize,
            });
        }
        let footprint = request.footprint;
        if footprint.width() <= 0.0 || footprint.height() <= 0.0 {
            return Err(SarveilError::Render(format!(
                "degenerate raster footprint {footprint:?}"
            )));
        }

        let w = request.width as usize;
        let h = request.height as usize;
        let extent = request.extent.as_bounds();
        let params = request.params;
        let alpha = params.alpha();
        let mut pixels = vec![0u8; w * h * 4];

        let fill_row = |(y, row): (usize, &mut [u8])| {
            let lat = extent.north - (y as f64 + 0.5) / h as f64 * extent.height();
            for x in 0..w {
                let lon = extent.west + (x as f64 + 0.5) / w as f64 * extent.width();
                if !request.clip.contains_point(lon, lat) || !footprint.contains_point(lon, lat) {
                    continue;
                }
                let col = (((lon - footprint.west) / footprint.width()) * cols as f64).floor();
                let line = (((footprint.north - lat) / footprint.height()) * rows as f64).floor();
                let col = (col.max(0.0) as usize).min(cols - 1);
                let line = (line.max(0.0) as usize).min(rows - 1);

                let r = bands.red[[line, col]];
                let g = bands.green[[line, col]];
                let b = bands.blue[[line, col]];
                if let Some(threshold) = params.mask_threshold {
                    let mean = (r + g + b) / 3.0;
                    if mean.is_nan() || mean <= threshold {
                        continue;
                    }
                }

                let px = &mut row[x * 4..x * 4 + 4];
                px[0] = (params.stretch(r) * 255.0).round() as u8;
                px[1] = (params.stretch(g) * 255.0).round() as u8;
                px[2] = (params.stretch(b) * 255.0).round() as u8;
                px[3] = alpha;
            }
        };

        if w * h >= PARALLEL_PIXEL_THRESHOLD {
            pixels.par_chunks_mut(w * 4).enumerate().for_each(fill_row);
        } else {
            pixels.chunks_mut(w * 4).enumerate().for_each(fill_row);
        }

        RgbaImage::from_raw(request.width, request.height, pixels).ok_or(
            SarveilError::InvalidDimensions {
                width: w,
                height: h,
            },
        )
    }
}
