// Simulation tunables and the ranges the host pins them to.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const UPDATE_FRAME_TIMING_RANGE: RangeInclusive<u32> = 1..=10;
pub const ADJUSTER_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const STRIDE_RANGE: RangeInclusive<f32> = 0.01..=2.0;
pub const ATTENUATION_RANGE: RangeInclusive<f32> = 0.1..=0.98;
pub const PROPAGATION_SPEED_RANGE: RangeInclusive<f32> = 0.01..=0.5;

pub const DEFAULT_INPUT_TEXTURE_SIZE: u32 = 512;

/// Scalars forwarded to the wave kernel, plus the step decimation and buffer size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Advance once every N frames.
    pub update_frame_timing: u32,
    /// Quantisation bias, in units of one 8-bit step.
    pub adjuster: f32,
    /// Neighbour distance in texels.
    pub stride: f32,
    /// Damping applied to every new frame.
    pub attenuation: f32,
    pub propagation_speed: f32,
    pub input_texture_size: u32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            update_frame_timing: 3,
            adjuster: 0.0,
            stride: 1.0,
            attenuation: 0.96,
            propagation_speed: 0.1,
            input_texture_size: DEFAULT_INPUT_TEXTURE_SIZE,
        }
    }
}

impl SimulationParameters {
    /// Pin every tunable into its allowed range.
    ///
    /// This is the host's job; the cycle trusts whatever it is given.
    pub fn clamped(self) -> Self {
        Self {
            update_frame_timing: self
                .update_frame_timing
                .clamp(*UPDATE_FRAME_TIMING_RANGE.start(), *UPDATE_FRAME_TIMING_RANGE.end()),
            adjuster: clamp_f32(self.adjuster, &ADJUSTER_RANGE),
            stride: clamp_f32(self.stride, &STRIDE_RANGE),
            attenuation: clamp_f32(self.attenuation, &ATTENUATION_RANGE),
            propagation_speed: clamp_f32(self.propagation_speed, &PROPAGATION_SPEED_RANGE),
            input_texture_size: self.input_texture_size.max(1),
        }
    }
}

// NaN falls back to the bottom of the range
fn clamp_f32(v: f32, range: &RangeInclusive<f32>) -> f32 {
    if v.is_nan() { *range.start() } else { v.clamp(*range.start(), *range.end()) }
}
