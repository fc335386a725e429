use std::iter::FusedIterator;

use rand::Rng;

use super::simulator::LatticeSimulator;

/// State of the chain after a completed sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroStepRecord {
    /// Micro-step counter within the emitting `advance` call; a multiple of `size²`.
    pub step: usize,
    /// `magnet / size²` at the end of the sweep.
    pub magnetization: f64,
    /// Owned copy of the lattice, ±1 per site.
    pub snapshot: Vec<i8>,
}

impl MacroStepRecord {
    /// Sweep number, `step / size²`, starting at 1.
    pub fn sweep(&self) -> usize {
        self.step / self.snapshot.len()
    }

    /// Snapshot spins as `-1.0`/`+1.0`.
    pub fn spin_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.snapshot.iter().map(|&s| s as f64)
    }
}

/// Single-pass iterator returned by [`LatticeSimulator::advance`].
///
/// Each `next` runs one sweep of `size²` Metropolis trials and then copies
/// the lattice. Nothing is precomputed, so stopping early costs nothing and
/// leaves the simulator at a sweep boundary.
pub struct MacroSteps<'a, R> {
    sim: &'a mut LatticeSimulator<R>,
    step: usize,
    end: usize,
}

impl<'a, R: Rng> MacroSteps<'a, R> {
    pub(super) fn new(sim: &'a mut LatticeSimulator<R>) -> Self {
        let end = sim.params().steps * sim.n_spins();
        Self { sim, step: 0, end }
    }
}

impl<R: Rng> Iterator for MacroSteps<'_, R> {
    type Item = MacroStepRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.end {
            return None;
        }
        let n_spins = self.sim.n_spins();
        for _ in 0..n_spins {
            self.sim.micro_step();
        }
        self.step += n_spins;
        Some(MacroStepRecord {
            step: self.step,
            magnetization: self.sim.magnetization(),
            snapshot: self.sim.spins().to_vec(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.step) / self.sim.n_spins();
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for MacroSteps<'_, R> {}

impl<R: Rng> FusedIterator for MacroSteps<'_, R> {}
