// Turns the Output height map into something that looks like water on screen.

use crate::types::{Buffer, FrameBuffer, nearest};

const DEEP: (f32, f32, f32) = (16.0, 58.0, 107.0);
const CREST: (f32, f32, f32) = (184.0, 230.0, 255.0);

/// Light direction across the surface (x, y), normalised-ish.
const LIGHT: (f32, f32) = (-0.6, -0.8);

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn gray(v: u8) -> u32 {
    pack_rgb(v, v, v)
}

/// Colour for one texel: height picks the tint, slope adds a highlight.
fn water_color(height: &Buffer, x: u32, y: u32) -> u32 {
    let v = height.value(x, y);
    let (xi, yi) = (x as i64, y as i64);
    let gx = height.get_clamped(xi + 1, yi) as f32 - height.get_clamped(xi - 1, yi) as f32;
    let gy = height.get_clamped(xi, yi + 1) as f32 - height.get_clamped(xi, yi - 1) as f32;

    // Slopes facing the light brighten, others darken.
    let light = ((gx * LIGHT.0 + gy * LIGHT.1) / 64.0).clamp(-0.5, 0.5);
    let t = (v + light).clamp(0.0, 1.0);

    let mix = |a: f32, b: f32| (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
    pack_rgb(mix(DEEP.0, CREST.0), mix(DEEP.1, CREST.1), mix(DEEP.2, CREST.2))
}

/// Fill the whole screen with the shaded height map (nearest-neighbour scaling).
pub fn shade_water(height: &Buffer, screen: &mut FrameBuffer) {
    if height.width() == 0 || height.height() == 0 { return; }
    for sy in 0..screen.height {
        let y = nearest(sy, screen.height, height.height());
        let row = sy * screen.width;
        for sx in 0..screen.width {
            let x = nearest(sx, screen.width, height.width());
            screen.pixels[row + sx] = water_color(height, x, y);
        }
    }
}

/// Blit a buffer as grey into a `side x side` square at (ox, oy).
pub fn blit_gray(src: &Buffer, screen: &mut FrameBuffer, ox: usize, oy: usize, side: usize) {
    if src.width() == 0 || src.height() == 0 { return; }
    for dy in 0..side {
        let py = oy + dy;
        if py >= screen.height { break; }
        let y = nearest(dy, side, src.height());
        for dx in 0..side {
            let px = ox + dx;
            if px >= screen.width { break; }
            let x = nearest(dx, side, src.width());
            screen.pixels[py * screen.width + px] = gray(src.get(x, y));
        }
    }
}
