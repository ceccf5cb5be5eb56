//! Decoding source images and encoding filtered results

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use linviz_core::{PixelBuffer, VizError};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image has no pixels")]
    Empty,

    #[error("fit box must be at least one pixel")]
    InvalidBox,

    #[error("buffer of {width}×{height} does not match its data")]
    DimensionMismatch { width: usize, height: usize },
}

impl From<ImageError> for VizError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Decode(_) | ImageError::Empty => VizError::image_decode(err.to_string()),
            ImageError::InvalidBox => VizError::config(err.to_string()),
            ImageError::Encode(_) | ImageError::DimensionMismatch { .. } => {
                VizError::image_encode(err.to_string())
            }
        }
    }
}

/// Size that fits `width × height` into a `fit × fit` box, long side equal to `fit`
pub fn fit_dimensions(width: u32, height: u32, fit: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    let (w, h, fit) = (width as f64, height as f64, fit as f64);
    let (fw, fh) = if w > h { (fit, h * fit / w) } else { (w * fit / h, fit) };
    ((fw.round() as u32).max(1), (fh.round() as u32).max(1))
}

/// Decode any supported raster format and scale it to fit the box
pub fn decode_fit(bytes: &[u8], fit: u32) -> Result<PixelBuffer, ImageError> {
    if fit == 0 {
        return Err(ImageError::InvalidBox);
    }
    let img = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    fit_image(&img, fit)
}

fn fit_image(img: &DynamicImage, fit: u32) -> Result<PixelBuffer, ImageError> {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageError::Empty);
    }

    let (tw, th) = fit_dimensions(w, h, fit);
    let scaled = if (tw, th) == (w, h) {
        rgba
    } else {
        imageops::resize(&rgba, tw, th, FilterType::Triangle)
    };
    tracing::debug!(from_w = w, from_h = h, to_w = tw, to_h = th, "decoded image");

    let (width, height) = (tw as usize, th as usize);
    PixelBuffer::from_rgba8(width, height, scaled.as_raw())
        .map_err(|_| ImageError::DimensionMismatch { width, height })
}

/// PNG bytes of `buffer`, channels clamped to 0..=255
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    let (width, height) = (buffer.width(), buffer.height());
    if buffer.is_empty() {
        return Err(ImageError::Empty);
    }
    let img = RgbaImage::from_raw(width as u32, height as u32, buffer.to_rgba8())
        .ok_or(ImageError::DimensionMismatch { width, height })?;

    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(ImageError::Encode)?;
    Ok(bytes)
}
