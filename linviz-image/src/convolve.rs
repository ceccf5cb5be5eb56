//! 3×3 convolution over RGBA buffers
//!
//! Edge policy: pixels whose kernel footprint would leave the buffer keep
//! their original value (copy-through). No zero fill, no edge extension.
//! Weights are applied as given and results are not clamped.

use linviz_core::{Kernel, PixelBuffer, CHANNELS};

/// Filter `src` with `kernel`, returning a buffer of the same size
///
/// The weighted sum of the footprint is written at the footprint's center
/// pixel. The weights are not flipped; for the symmetric presets this makes
/// no difference.
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let mut out = src.clone();
    let size = kernel.size();
    let half = size / 2;
    let (width, height) = (src.width(), src.height());
    if width < size || height < size {
        return out;
    }

    let weights = kernel.weights();
    let data = src.data();
    let dst = out.data_mut();

    for y in half..height - half {
        for x in half..width - half {
            let mut acc = [0.0f64; CHANNELS];
            for (ky, row) in weights.iter().enumerate() {
                let sy = y + ky - half;
                for (kx, &w) in row.iter().enumerate() {
                    if w == 0.0 {
                        continue;
                    }
                    let i = (sy * width + x + kx - half) * CHANNELS;
                    for (ch, sum) in acc.iter_mut().enumerate() {
                        *sum += data[i + ch] as f64 * w;
                    }
                }
            }
            let o = (y * width + x) * CHANNELS;
            for (ch, sum) in acc.iter().enumerate() {
                dst[o + ch] = *sum as f32;
            }
        }
    }

    out
}

/// Bounds of the region the filter writes: `(x0, y0, x1, y1)`, half-open
pub fn interior(width: usize, height: usize, kernel: &Kernel) -> (usize, usize, usize, usize) {
    let size = kernel.size();
    let half = size / 2;
    if width < size || height < size {
        return (0, 0, 0, 0);
    }
    (half, half, width - half, height - half)
}
