//! RGBA pixel buffers
//!
//! Channels are stored as `f32` so filtered values may leave the 0..=255
//! display range. Clamping happens only in [`PixelBuffer::to_rgba8`].

use crate::error::VizError;
use serde::Serialize;

pub const CHANNELS: usize = 4;

pub type Rgba = [f32; CHANNELS];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    #[serde(skip)]
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Transparent black buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0.0; width * height * CHANNELS] }
    }

    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for _ in 0..width * height {
            data.extend_from_slice(&color);
        }
        Self { width, height, data }
    }

    /// Wrap raw channel data (RGBA interleaved, row-major)
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Result<Self, VizError> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(VizError::dimension(format!(
                "{}×{} RGBA buffer needs {} values, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, VizError> {
        Self::from_raw(width, height, bytes.iter().map(|&b| b as f32).collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Offset of the first channel of (x, y)
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let mut px = [0.0; CHANNELS];
        px.copy_from_slice(&self.data[i..i + CHANNELS]);
        Some(px)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, px: Rgba) -> Result<(), VizError> {
        if x >= self.width {
            return Err(VizError::index("pixel column", x, self.width));
        }
        if y >= self.height {
            return Err(VizError::index("pixel row", y, self.height));
        }
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&px);
        Ok(())
    }

    /// Per-channel sum over the rectangle `[x0, x1) × [y0, y1)`
    pub fn channel_sums(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> [f64; CHANNELS] {
        let mut sums = [0.0f64; CHANNELS];
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                let i = self.offset(x, y);
                for (ch, sum) in sums.iter_mut().enumerate() {
                    *sum += self.data[i + ch] as f64;
                }
            }
        }
        sums
    }

    /// Display bytes, each channel rounded and clamped to 0..=255
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().map(|&v| v.round().clamp(0.0, 255.0) as u8).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0.0; 15]).is_err());
        assert!(PixelBuffer::from_raw(2, 2, vec![0.0; 16]).is_ok());
    }

    #[test]
    fn test_pixel_access() {
        let mut buf = PixelBuffer::new(3, 2);
        buf.set_pixel(2, 1, [1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(buf.pixel(2, 1), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(buf.pixel(3, 0), None);
        assert!(buf.set_pixel(0, 2, [0.0; 4]).is_err());
    }

    #[test]
    fn test_to_rgba8_clamps() {
        let buf = PixelBuffer::from_raw(1, 1, vec![-20.0, 127.6, 300.0, 255.0]).unwrap();
        assert_eq!(buf.to_rgba8(), vec![0, 128, 255, 255]);
    }

    #[test]
    fn test_channel_sums() {
        let buf = PixelBuffer::filled(4, 4, [1.0, 2.0, 0.0, 255.0]);
        let sums = buf.channel_sums(1, 1, 3, 3);
        assert_eq!(sums, [4.0, 8.0, 0.0, 1020.0]);
    }
}
