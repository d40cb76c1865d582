// The wave buffer cycle: Input + three rotating state slots + Output.
//
// Per advanced step: kernel(Input, Prev, Prev2) -> Result, rotate roles,
// clear Input, copy Prev into Output. Output therefore always shows the
// frame after rotation.

use crate::error::Result;
use crate::kernel::{KernelRegistry, WAVE_KERNEL, WaveKernel};
use crate::params::SimulationParameters;
use crate::types::{BLANK, Buffer, REST};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleState {
    /// No Input yet; every step is a no-op.
    Uninitialized,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Frame counter not on a multiple of `update_frame_timing`.
    Gated,
    /// Input or Output missing.
    Skipped,
    Advanced,
}

/// Which storage slot currently plays which role. Always a permutation of 0..3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Roles {
    prev: usize,
    prev2: usize,
    result: usize,
}

impl Roles {
    const START: Roles = Roles { prev: 0, prev2: 1, result: 2 };

    // prev2 <- prev, prev <- result, result <- old prev2
    fn rotated(self) -> Roles {
        Roles { prev: self.result, prev2: self.prev, result: self.prev2 }
    }
}

pub struct WaveBufferCycle {
    kernel: Arc<dyn WaveKernel>,
    params: SimulationParameters,
    state: CycleState,
    input: Option<Buffer>,
    slots: [Buffer; 3],
    roles: Roles,
    output: Option<Buffer>,
    steps: u64,
}

impl WaveBufferCycle {
    /// Build a cycle around the registry's wave kernel.
    pub fn new(registry: &KernelRegistry, params: SimulationParameters) -> Result<Self> {
        let kernel = registry.get(WAVE_KERNEL)?;
        Ok(Self {
            kernel,
            params,
            state: CycleState::Uninitialized,
            input: None,
            slots: [Buffer::new(0, 0), Buffer::new(0, 0), Buffer::new(0, 0)],
            roles: Roles::START,
            output: None,
            steps: 0,
        })
    }

    /// Store new tunables. Takes effect on the next advanced step.
    pub fn configure(&mut self, params: SimulationParameters) {
        self.params = params;
    }

    /// Take ownership of the freshly created Input and allocate the state slots
    /// at its resolution. Prev and Prev2 start at rest; Result is left as
    /// allocated since the kernel overwrites it before anything reads it.
    pub fn initialize(&mut self, input: Buffer) {
        let (w, h) = input.dimensions();
        self.slots = [
            Buffer::filled(w, h, REST),
            Buffer::filled(w, h, REST),
            Buffer::new(w, h),
        ];
        self.roles = Roles::START;
        self.input = Some(input);
        self.state = CycleState::Running;
        log::info!("wave cycle initialized at {w}x{h}");
    }

    /// Per-frame hook. `frame` is the host's global frame counter.
    pub fn step(&mut self, frame: u64) -> StepOutcome {
        // a timing of 0 would divide by zero
        let timing = u64::from(self.params.update_frame_timing.max(1));
        if frame % timing != 0 {
            return StepOutcome::Gated;
        }

        let (Some(input), Some(output)) = (self.input.as_mut(), self.output.as_mut()) else {
            return StepOutcome::Skipped;
        };
        // Input swapped for one at another resolution: the kernel reads both per texel.
        if let Err(e) = self.slots[self.roles.prev].ensure_same_size(input) {
            log::warn!("frame {frame}: input not consumed: {e}");
            return StepOutcome::Skipped;
        }

        let Roles { prev, prev2, result } = self.roles;
        {
            let [a, b, c] = &mut self.slots;
            let mut by_slot = [Some(a), Some(b), Some(c)];
            let (Some(prev_buf), Some(prev2_buf), Some(out_buf)) =
                (by_slot[prev].take(), by_slot[prev2].take(), by_slot[result].take())
            else {
                unreachable!("roles are a permutation of the three slots");
            };
            self.kernel.propagate(&self.params, input, prev_buf, prev2_buf, out_buf);
        }

        self.roles = self.roles.rotated();
        log::debug!("frame {frame}: roles -> {:?}", self.roles);

        input.fill(BLANK);

        output.blit_from(&self.slots[self.roles.prev]);

        self.steps += 1;
        StepOutcome::Advanced
    }

    /// Settle the water: Prev/Prev2 back to rest and any pending paint dropped.
    pub fn reset(&mut self) {
        if self.state == CycleState::Uninitialized {
            return;
        }
        self.slots[self.roles.prev].fill(REST);
        self.slots[self.roles.prev2].fill(REST);
        if let Some(input) = self.input.as_mut() {
            input.fill(BLANK);
        }
        if let Some(output) = self.output.as_mut() {
            output.fill(REST);
        }
        log::info!("wave cycle reset to rest");
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn input(&self) -> Option<&Buffer> {
        self.input.as_ref()
    }

    /// Write access for the paint side between steps. A replacement Input must
    /// keep the slot resolution or later steps are skipped.
    pub fn input_mut(&mut self) -> Option<&mut Buffer> {
        self.input.as_mut()
    }

    pub fn prev(&self) -> Option<&Buffer> {
        self.running().then(|| &self.slots[self.roles.prev])
    }

    pub fn prev2(&self) -> Option<&Buffer> {
        self.running().then(|| &self.slots[self.roles.prev2])
    }

    #[cfg(test)]
    pub fn result(&self) -> Option<&Buffer> {
        self.running().then(|| &self.slots[self.roles.result])
    }

    pub fn output(&self) -> Option<&Buffer> {
        self.output.as_ref()
    }

    pub fn set_output(&mut self, output: Option<Buffer>) {
        self.output = output;
    }

    /// Number of advanced steps so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn running(&self) -> bool {
        self.state == CycleState::Running
    }
}
