use image::{Rgba, RgbaImage};

use crate::consts::{
    GRIDLINE_COLOR, PROGRESS_BAR_HEIGHT_DEGREES, PROGRESS_BASE_COLOR, PROGRESS_FILL_COLOR,
};
use crate::geo::FrameExtent;

/// Pixel rectangle of the canvas that displays the frame extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl MapArea {
    fn lon_to_x(&self, extent: &FrameExtent, lon: f64) -> f64 {
        (lon - extent.west) / (extent.east - extent.west) * self.width as f64
    }

    fn lat_to_y(&self, extent: &FrameExtent, lat: f64) -> f64 {
        (extent.north - lat) / (extent.north - extent.south) * self.height as f64
    }
}

/// Composite a straight-alpha layer over the canvas at `area`.
pub fn blend_layer(canvas: &mut RgbaImage, layer: &RgbaImage, area: MapArea) {
    let w = layer.width().min(area.width);
    let h = layer.height().min(area.height);
    for y in 0..h {
        for x in 0..w {
            let src = layer.get_pixel(x, y);
            let a = src[3] as f32 / 255.0;
            if a <= 0.0 {
                continue;
            }
            let (cx, cy) = (area.x + x, area.y + y);
            if cx >= canvas.width() || cy >= canvas.height() {
                continue;
            }
            let dst = canvas.get_pixel_mut(cx, cy);
            for c in 0..3 {
                let v = src[c] as f32 * a + dst[c] as f32 * (1.0 - a);
                dst[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            dst[3] = 255;
        }
    }
}

/// Composite premultiplied RGBA8 pixels (as produced by tiny-skia) over the canvas at the origin.
pub fn blend_premultiplied(canvas: &mut RgbaImage, data: &[u8], width: u32, height: u32) {
    let w = width.min(canvas.width());
    let h = height.min(canvas.height());
    for y in 0..h {
        for x in 0..w {
            let i = ((y * width + x) * 4) as usize;
            let src = &data[i..i + 4];
            if src[3] == 0 {
                continue;
            }
            let inv = 1.0 - src[3] as f32 / 255.0;
            let dst = canvas.get_pixel_mut(x, y);
            for c in 0..3 {
                let v = src[c] as f32 + dst[c] as f32 * inv;
                dst[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            dst[3] = 255;
        }
    }
}

pub fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: [u8; 3]) {
    let x_end = (x + width).min(canvas.width());
    let y_end = (y + height).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, Rgba([color[0], color[1], color[2], 255]));
        }
    }
}

/// Dotted gridlines on every multiple of `interval` degrees strictly inside the extent.
pub fn draw_gridlines(canvas: &mut RgbaImage, extent: &FrameExtent, area: MapArea, interval: f64) {
    let dotted = |i: u32| (i / 2) % 2 == 0;

    let mut lon = (extent.west / interval).floor() * interval;
    while lon < extent.east {
        if lon > extent.west {
            let x = area.lon_to_x(extent, lon).round() as u32;
            if x < area.width {
                for y in (0..area.height).filter(|&y| dotted(y)) {
                    canvas.put_pixel(area.x + x, area.y + y, gridline_pixel());
                }
            }
        }
        lon += interval;
    }

    let mut lat = (extent.south / interval).floor() * interval;
    while lat < extent.north {
        if lat > extent.south {
            let y = area.lat_to_y(extent, lat).round() as u32;
            if y < area.height {
                for x in (0..area.width).filter(|&x| dotted(x)) {
                    canvas.put_pixel(area.x + x, area.y + y, gridline_pixel());
                }
            }
        }
        lat += interval;
    }
}

fn gridline_pixel() -> Rgba<u8> {
    Rgba([GRIDLINE_COLOR[0], GRIDLINE_COLOR[1], GRIDLINE_COLOR[2], 255])
}

/// Pixel geometry of a drawn progress bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressBarGeometry {
    /// First canvas row of the bar.
    pub top: u32,
    pub height: u32,
    /// Width of the filled part in pixels.
    pub filled_width: u32,
}

/// Draw the progress bar along the south edge of the map: a white base spanning the
/// full extent, then the filled fraction from the west edge.
pub fn draw_progress_bar(
    canvas: &mut RgbaImage,
    extent: &FrameExtent,
    area: MapArea,
    fraction: f64,
) -> ProgressBarGeometry {
    let degrees_tall = extent.north - extent.south;
    let height = ((PROGRESS_BAR_HEIGHT_DEGREES / degrees_tall) * area.height as f64)
        .round()
        .max(1.0) as u32;
    let height = height.min(area.height);
    let top = area.y + area.height - height;
    let filled_width = (fraction.clamp(0.0, 1.0) * area.width as f64).round() as u32;

    fill_rect(canvas, area.x, top, area.width, height, PROGRESS_BASE_COLOR);
    fill_rect(canvas, area.x, top, filled_width, height, PROGRESS_FILL_COLOR);

    ProgressBarGeometry {
        top,
        height,
        filled_width,
    }
}
