// Brush side of the Input hand-off.
// The canvas creates the Input buffer once and dabs height into it between
// cycle steps; the cycle consumes and clears it.

use crate::types::{BLANK, Buffer, Stamp};

impl Stamp {
    /// Make a circular Gaussian stamp with peak 1.0 at the center.
    pub fn gaussian(radius: i32, sigma: f32) -> Stamp {
        let radius = radius.max(0);
        let d = 2 * radius + 1;                   // kernel size (width = height)
        let mut weights = Vec::with_capacity((d * d) as usize);
        let s2 = 2.0 * sigma * sigma;             // denominator in the exponent
        let mut maxw = 0.0_f32;

        for y in -radius..=radius {
            for x in -radius..=radius {
                let r2 = (x as f32) * (x as f32) + (y as f32) * (y as f32);
                // Keep the footprint round; corners of the square are dropped.
                let w = if r2 > (radius * radius) as f32 { 0.0 } else { (-r2 / s2).exp() };
                if w > maxw { maxw = w; }
                weights.push(w);
            }
        }
        // Normalize to peak 1.0 (not sum=1); full strength at the center
        if maxw > 0.0 {
            for w in &mut weights { *w /= maxw; }
        }

        Stamp { radius, weights }
    }
}

/// The paint surface feeding the wave cycle.
pub struct PaintCanvas {
    size: u32,
    brush: Stamp,
    strength: f32, // 0..1, fraction of full height added at the brush center
}

impl PaintCanvas {
    pub fn new(size: u32, brush_radius: i32, strength: f32) -> Self {
        let sigma = brush_radius.max(1) as f32 * 0.5;
        Self {
            size: size.max(1),
            brush: Stamp::gaussian(brush_radius, sigma),
            strength: strength.clamp(0.0, 1.0),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// The blank Input buffer handed to the cycle once the canvas is ready.
    pub fn create_input(&self) -> Buffer {
        log::info!("paint canvas ready: {0}x{0} input", self.size);
        Buffer::filled(self.size, self.size, BLANK)
    }

    /// Add the brush into `input` at texel (cx, cy), saturating at 255.
    pub fn dab(&self, input: &mut Buffer, cx: i32, cy: i32) {
        let w = input.width() as i32;
        let h = input.height() as i32;
        let r = self.brush.radius;
        let d = 2 * r + 1;
        let gain = self.strength * 255.0;

        for ky in 0..d {
            for kx in 0..d {
                let sx = cx + kx - r;
                let sy = cy + ky - r;
                if sx < 0 || sy < 0 || sx >= w || sy >= h { continue; }
                let kidx = ky as usize * d as usize + kx as usize;
                let add = (self.brush.weights[kidx] * gain).round() as u16;
                if add == 0 { continue; }

                let (ux, uy) = (sx as u32, sy as u32);
                let v = (input.get(ux, uy) as u16 + add).min(255) as u8;
                input.put(ux, uy, v);
            }
        }
    }

    /// Dab along a segment at half-radius spacing so quick drags stay continuous.
    pub fn stroke(&self, input: &mut Buffer, from: (i32, i32), to: (i32, i32)) {
        let dx = (to.0 - from.0) as f32;
        let dy = (to.1 - from.1) as f32;
        let dist = (dx * dx + dy * dy).sqrt();
        let spacing = (self.brush.radius as f32 * 0.5).max(1.0);
        let steps = (dist / spacing).ceil() as i32;

        if steps == 0 {
            self.dab(input, to.0, to.1);
            return;
        }
        // Skip the start point; the previous stroke already dabbed it.
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let x = from.0 as f32 + dx * t;
            let y = from.1 as f32 + dy * t;
            self.dab(input, x.round() as i32, y.round() as i32);
        }
    }

    /// Map a window pixel to a canvas texel.
    pub fn to_canvas(&self, screen: (usize, usize), screen_size: (usize, usize)) -> (i32, i32) {
        let sx = self.size as f32 / screen_size.0.max(1) as f32;
        let sy = self.size as f32 / screen_size.1.max(1) as f32;
        ((screen.0 as f32 * sx) as i32, (screen.1 as f32 * sy) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stamp_peaks_at_center_and_is_round() {
        let s = Stamp::gaussian(4, 2.0);
        let d = 9usize;
        assert_eq!(s.weights.len(), d * d);
        assert_relative_eq!(s.weights[4 * d + 4], 1.0);
        assert!(s.weights[4 * d + 5] < 1.0);
        assert_eq!(s.weights[0], 0.0, "square corner lies outside the disc");
    }

    #[test]
    fn dab_adds_and_saturates() {
        let canvas = PaintCanvas::new(16, 2, 0.6);
        let mut input = canvas.create_input();
        assert!(input.is_uniform(BLANK));

        canvas.dab(&mut input, 8, 8);
        let once = input.get(8, 8);
        assert_eq!(once, 153);
        assert!(input.get(9, 8) > 0 && input.get(9, 8) < once);
        assert_eq!(input.get(0, 0), 0);

        canvas.dab(&mut input, 8, 8);
        assert_eq!(input.get(8, 8), 255);
    }

    #[test]
    fn dab_clips_at_edges() {
        let canvas = PaintCanvas::new(4, 3, 1.0);
        let mut input = canvas.create_input();
        canvas.dab(&mut input, 0, 0);
        canvas.dab(&mut input, -10, 50);
        assert_eq!(input.get(0, 0), 255);
    }

    #[test]
    fn stroke_leaves_a_continuous_line() {
        let canvas = PaintCanvas::new(64, 2, 1.0);
        let mut input = canvas.create_input();
        canvas.stroke(&mut input, (4, 10), (60, 10));
        for x in 4..=60 {
            assert!(input.get(x, 10) > 0, "gap at x={x}");
        }
        assert_eq!(input.get(30, 40), 0);
    }

    #[test]
    fn screen_to_canvas_scales() {
        let canvas = PaintCanvas::new(256, 4, 1.0);
        assert_eq!(canvas.to_canvas((256, 128), (512, 512)), (128, 64));
        assert_eq!(canvas.to_canvas((0, 0), (512, 512)), (0, 0));
    }
}
