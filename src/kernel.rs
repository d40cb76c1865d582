// Wave-propagation kernels and the registry cycles look them up in.

use crate::error::{Error, Result};
use crate::params::SimulationParameters;
use crate::types::Buffer;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry name of the wave-propagation kernel.
pub const WAVE_KERNEL: &str = "wave.propagate";

/// One propagation pass: reads Input, Prev and Prev2, writes a whole new frame.
///
/// All four buffers share one resolution. `out` is fully overwritten, so its
/// previous contents never matter.
pub trait WaveKernel: Send + Sync {
    fn name(&self) -> &str;

    fn propagate(
        &self,
        params: &SimulationParameters,
        input: &Buffer,
        prev: &Buffer,
        prev2: &Buffer,
        out: &mut Buffer,
    );
}

/// Compiled kernels by name, shared by every cycle built from it.
#[derive(Default, Clone)]
pub struct KernelRegistry {
    kernels: HashMap<String, Arc<dyn WaveKernel>>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the software wave kernel under [`WAVE_KERNEL`].
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(CpuWaveKernel));
        reg
    }

    /// Insert or replace a kernel under its own name.
    pub fn register(&mut self, kernel: Arc<dyn WaveKernel>) {
        log::debug!("registering kernel '{}'", kernel.name());
        self.kernels.insert(kernel.name().to_owned(), kernel);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn WaveKernel>> {
        self.kernels
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownKernel(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }
}

/// Software rendition of the damped 2D wave equation over R8 buffers.
///
/// Per texel, with heights decoded to `[-1, 1]`:
/// `h = (2p - q + c * (N + S + E + W - 4p) + input) * attenuation`,
/// neighbours taken `stride` texels away (bilinear, clamp-to-edge).
/// The result is encoded back to `[0, 1]` and quantised as
/// `floor(v * 255 + adjuster)`.
pub struct CpuWaveKernel;

#[inline]
fn decode(v: f32) -> f32 {
    v * 2.0 - 1.0
}

#[inline]
fn quantize(h: f32, adjuster: f32) -> u8 {
    let v = (h + 1.0) * 0.5;
    (v * 255.0 + adjuster).floor().clamp(0.0, 255.0) as u8
}

impl WaveKernel for CpuWaveKernel {
    fn name(&self) -> &str {
        WAVE_KERNEL
    }

    fn propagate(
        &self,
        params: &SimulationParameters,
        input: &Buffer,
        prev: &Buffer,
        prev2: &Buffer,
        out: &mut Buffer,
    ) {
        let (w, h) = out.dimensions();
        let s = params.stride;
        let c = params.propagation_speed;

        for y in 0..h {
            for x in 0..w {
                let (fx, fy) = (x as f32, y as f32);
                let p = decode(prev.value(x, y));
                let q = decode(prev2.value(x, y));

                let e = decode(prev.sample_bilinear(fx + s, fy));
                let wst = decode(prev.sample_bilinear(fx - s, fy));
                let n = decode(prev.sample_bilinear(fx, fy - s));
                let sth = decode(prev.sample_bilinear(fx, fy + s));

                let mut next = 2.0 * p - q + c * (n + sth + e + wst - 4.0 * p);
                next += input.value(x, y);
                next *= params.attenuation;

                out.put(x, y, quantize(next, params.adjuster));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLANK, REST};

    fn params() -> SimulationParameters {
        SimulationParameters { adjuster: 0.5, ..Default::default() }
    }

    #[test]
    fn registry_resolves_default_kernel() {
        let reg = KernelRegistry::with_defaults();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(WAVE_KERNEL).unwrap().name(), WAVE_KERNEL);
        assert!(matches!(reg.get("wave.missing"), Err(Error::UnknownKernel(_))));
    }

    #[test]
    fn flat_water_stays_flat() {
        let input = Buffer::filled(8, 8, BLANK);
        let prev = Buffer::filled(8, 8, REST);
        let prev2 = Buffer::filled(8, 8, REST);
        let mut out = Buffer::new(8, 8);

        CpuWaveKernel.propagate(&params(), &input, &prev, &prev2, &mut out);
        assert!(out.is_uniform(REST));
    }

    #[test]
    fn spike_spreads_to_neighbours() {
        let input = Buffer::filled(9, 9, BLANK);
        let mut prev = Buffer::filled(9, 9, REST);
        prev.put(4, 4, 255);
        let prev2 = Buffer::filled(9, 9, REST);
        let mut out = Buffer::new(9, 9);

        CpuWaveKernel.propagate(&params(), &input, &prev, &prev2, &mut out);

        for (x, y) in [(3, 4), (5, 4), (4, 3), (4, 5)] {
            assert!(out.get(x, y) > REST, "neighbour ({x},{y}) = {}", out.get(x, y));
        }
        // Far corner has not been reached yet.
        assert_eq!(out.get(0, 0), REST);
    }

    #[test]
    fn painted_input_raises_the_surface() {
        let mut input = Buffer::filled(5, 5, BLANK);
        input.put(2, 2, 200);
        let prev = Buffer::filled(5, 5, REST);
        let prev2 = Buffer::filled(5, 5, REST);
        let mut out = Buffer::new(5, 5);

        CpuWaveKernel.propagate(&params(), &input, &prev, &prev2, &mut out);
        assert!(out.get(2, 2) > REST);
        assert_eq!(out.get(0, 0), REST);
    }

    #[test]
    fn attenuation_pulls_a_still_bump_toward_rest() {
        let input = Buffer::filled(1, 1, BLANK);
        let prev = Buffer::filled(1, 1, 230);
        let prev2 = Buffer::filled(1, 1, 230);
        let mut out = Buffer::new(1, 1);

        let p = SimulationParameters { attenuation: 0.5, ..params() };
        CpuWaveKernel.propagate(&p, &input, &prev, &prev2, &mut out);
        let v = out.get(0, 0);
        assert!(v > REST && v < 230, "got {v}");
    }

    #[test]
    fn adjuster_biases_quantisation() {
        // 127.5 lands exactly between two steps.
        assert_eq!(quantize(0.0, 0.0), 127);
        assert_eq!(quantize(0.0, 0.5), 128);
        assert_eq!(quantize(5.0, 1.0), 255);
        assert_eq!(quantize(-5.0, 0.0), 0);
    }
}
