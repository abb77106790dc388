use std::path::Path;

use image::{ImageBuffer, ImageFormat, Luma, RgbaImage};
use ndarray::Array2;

use crate::error::{Result, SarveilError};

/// Save a band raster as a 16-bit grayscale PNG.
///
/// Values are divided by `scale` and clamped to [0, 1] before quantization, so
/// [`load_band_raster`] with the same scale restores them to 1/65535 precision.
pub fn save_band_raster(data: &Array2<f32>, scale: f32, path: &Path) -> Result<()> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 || scale <= 0.0 {
        return Err(SarveilError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            let val = ((data[[row, col]] / scale).clamp(0.0, 1.0) * 65535.0).round() as u16;
            pixels.push(val);
        }
    }

    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels).ok_or(
        SarveilError::InvalidDimensions {
            width: w,
            height: h,
        },
    )?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load a grayscale image as a band raster, mapping full scale to `scale`.
pub fn load_band_raster(path: &Path, scale: f32) -> Result<Array2<f32>> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32 / 65535.0 * scale;
        }
    }

    Ok(data)
}

/// Save a rendered RGBA canvas as 8-bit PNG.
pub fn save_rgba_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
