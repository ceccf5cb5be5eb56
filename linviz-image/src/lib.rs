//! linviz image - raster input, filtering and output
//!
//! - `decode_fit`: decode an image and scale it to fit a square box
//! - `convolve`: 3×3 filter with copy-through borders
//! - `encode_png`: clamp and encode a buffer for export

mod convolve;
mod decode;

pub use convolve::{convolve, interior};
pub use decode::{decode_fit, encode_png, fit_dimensions, ImageError};
