// Core types shared by the simulation, the brush and the window.

use crate::error::{Error, Result};
use image::{GrayImage, Luma};

/// Cleared Input value (transparent black). Painting adds on top of it.
pub const BLANK: u8 = 0;
/// Mid grey, 0.5: the "zero displacement" rest height for Prev/Prev2.
pub const REST: u8 = 128;

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// Fixed-resolution single-channel 8-bit image.
///
/// Stored values are normalised as `v / 255`. The wave state keeps a signed
/// height `h` in `[-1, 1]` encoded as `(h + 1) / 2`, so [`REST`] is flat water.
#[derive(Clone, Debug, PartialEq)]
pub struct Buffer {
    img: GrayImage,
}

impl Buffer {
    /// Zero-filled buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self { img: GrayImage::new(width, height) }
    }

    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self { img: GrayImage::from_pixel(width, height, Luma([value])) }
    }

    #[cfg(test)]
    pub fn from_image(img: GrayImage) -> Self {
        Self { img }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    /// Blit of a constant single-pixel frame over the whole buffer.
    pub fn fill(&mut self, value: u8) {
        self.img.pixels_mut().for_each(|p| p.0[0] = value);
    }

    /// Blit `src` into `self`, rescaling nearest-neighbour when sizes differ.
    /// Visual: `self` shows the same picture as `src`, stretched to fit.
    pub fn blit_from(&mut self, src: &Buffer) {
        if self.dimensions() == src.dimensions() {
            let dst: &mut [u8] = &mut self.img;
            dst.copy_from_slice(src.as_raw());
            return;
        }
        if src.width() == 0 || src.height() == 0 { return; }

        let (w, h) = self.dimensions();
        for y in 0..h {
            let sy = nearest(y as usize, h as usize, src.height());
            for x in 0..w {
                let sx = nearest(x as usize, w as usize, src.width());
                self.put(x, y, src.get(sx, sy));
            }
        }
    }

    /// Error unless `other` has exactly this buffer's resolution.
    pub fn ensure_same_size(&self, other: &Buffer) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::size_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.img.get_pixel(x, y).0[0]
    }

    #[inline]
    pub fn put(&mut self, x: u32, y: u32, value: u8) {
        self.img.put_pixel(x, y, Luma([value]));
    }

    /// Clamp-to-edge read; out-of-range coordinates take the nearest border texel.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> u8 {
        let cx = x.clamp(0, self.width() as i64 - 1) as u32;
        let cy = y.clamp(0, self.height() as i64 - 1) as u32;
        self.get(cx, cy)
    }

    /// Normalised value at texel `(x, y)`.
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> f32 {
        self.get(x, y) as f32 / 255.0
    }

    /// Bilinear sample in texel units, clamp-to-edge. Returns `[0, 1]`.
    pub fn sample_bilinear(&self, fx: f32, fy: f32) -> f32 {
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let a = self.get_clamped(x0, y0) as f32;
        let b = self.get_clamped(x0 + 1, y0) as f32;
        let c = self.get_clamped(x0, y0 + 1) as f32;
        let d = self.get_clamped(x0 + 1, y0 + 1) as f32;

        let top = a + (b - a) * tx;
        let bottom = c + (d - c) * tx;
        (top + (bottom - top) * ty) / 255.0
    }

    #[cfg(test)]
    pub fn is_uniform(&self, value: u8) -> bool {
        self.as_raw().iter().all(|&v| v == value)
    }

    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.img.as_raw()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.img
    }
}

/// Nearest-neighbour source index for destination index `i` of `dst_len`.
#[inline]
pub fn nearest(i: usize, dst_len: usize, src_len: u32) -> u32 {
    ((i as u64 * src_len as u64) / dst_len.max(1) as u64) as u32
}

/// Precomputed circular Gaussian "stamp" the brush dabs into the Input buffer.
pub struct Stamp {
    pub radius: i32,       // pixels from center to edge
    pub weights: Vec<f32>, // (2r+1)*(2r+1), centered kernel, already normalized to peak 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fill_overwrites_every_texel() {
        let mut b = Buffer::new(5, 3);
        b.put(2, 1, 77);
        b.fill(REST);
        assert!(b.is_uniform(REST));
    }

    #[test]
    fn blit_same_size_is_an_exact_copy() {
        let mut src = Buffer::filled(4, 4, 9);
        src.put(3, 1, 200);
        let mut dst = Buffer::new(4, 4);
        dst.blit_from(&src);
        assert_eq!(dst, src);
    }

    #[test]
    fn blit_rescales_to_the_target_size() {
        let mut src = Buffer::filled(4, 4, 10);
        src.put(2, 2, 250);
        src.put(3, 3, 250);

        // Downscale: each target texel takes every second source texel.
        let mut small = Buffer::new(2, 2);
        small.blit_from(&src);
        assert_eq!(small.get(0, 0), 10);
        assert_eq!(small.get(1, 1), 250);
        assert_eq!(small.get(1, 0), 10);

        // Upscale: each source texel covers a 2x2 block.
        let mut big = Buffer::new(8, 8);
        big.blit_from(&src);
        for (x, y) in [(4, 4), (5, 5), (4, 5), (6, 6), (7, 7)] {
            assert_eq!(big.get(x, y), 250, "({x},{y})");
        }
        assert_eq!(big.get(3, 3), 10);
    }

    #[test]
    fn size_check_reports_both_sizes() {
        let a = Buffer::new(4, 2);
        let b = Buffer::new(4, 4);
        assert!(a.ensure_same_size(&Buffer::new(4, 2)).is_ok());
        match a.ensure_same_size(&b) {
            Err(Error::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, (4, 2));
                assert_eq!(actual, (4, 4));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn nearest_maps_ends() {
        assert_eq!(nearest(0, 100, 10), 0);
        assert_eq!(nearest(99, 100, 10), 9);
        assert_eq!(nearest(50, 100, 10), 5);
    }

    #[test]
    fn clamped_reads_use_the_border() {
        let mut b = Buffer::new(3, 3);
        b.put(0, 0, 10);
        b.put(2, 2, 200);
        assert_eq!(b.get_clamped(-5, -1), 10);
        assert_eq!(b.get_clamped(9, 7), 200);
    }

    #[test]
    fn bilinear_interpolates_between_texels() {
        let mut b = Buffer::new(2, 1);
        b.put(0, 0, 0);
        b.put(1, 0, 255);
        assert_abs_diff_eq!(b.sample_bilinear(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(b.sample_bilinear(0.5, 0.0), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(b.sample_bilinear(1.0, 0.0), 1.0);
        // Past the edge stays on the border texel.
        assert_abs_diff_eq!(b.sample_bilinear(3.25, 0.0), 1.0);
    }
}
