use crate::config::{Parameters, RunConfig};
use crate::geometry::SquareTorus;
use crate::simulation::MacroStepRecord;
use crate::spins::energy;

use super::{sokal_tau, AutocorrAccum, Statistics};

/// Equilibrium estimates from the records of one run.
///
/// Magnetization moments are per spin; energies are the lattice Hamiltonian
/// per spin of each snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub beta: f64,
    pub n_spins: usize,
    /// Records that contributed (after warmup).
    pub n_records: usize,
    /// ⟨m⟩.
    pub mag: f64,
    /// ⟨|m|⟩.
    pub abs_mag: f64,
    /// ⟨m²⟩.
    pub mag2: f64,
    /// ⟨m⁴⟩.
    pub mag4: f64,
    /// ⟨e⟩.
    pub energy: f64,
    /// ⟨e²⟩.
    pub energy2: f64,
    /// Integrated autocorrelation time of m², in sweeps.
    pub mag2_tau: Option<f64>,
    /// Accepted flips over all trials of the chain.
    pub acceptance_rate: f64,
}

impl RunSummary {
    /// Binder cumulant `1 - ⟨m⁴⟩ / (3 ⟨m²⟩²)`; 0 if ⟨m²⟩ is 0.
    pub fn binder(&self) -> f64 {
        if self.mag2 <= 0.0 {
            return 0.0;
        }
        1.0 - self.mag4 / (3.0 * self.mag2 * self.mag2)
    }

    /// χ = β N (⟨m²⟩ − ⟨|m|⟩²).
    pub fn susceptibility(&self) -> f64 {
        self.beta * self.n_spins as f64 * (self.mag2 - self.abs_mag * self.abs_mag)
    }

    /// C = β² N (⟨e²⟩ − ⟨e⟩²).
    pub fn specific_heat(&self) -> f64 {
        self.beta * self.beta * self.n_spins as f64 * (self.energy2 - self.energy * self.energy)
    }
}

/// Folds a stream of [`MacroStepRecord`]s into a [`RunSummary`].
///
/// Only running sums are kept; snapshots are read and dropped by the caller.
pub struct Observer {
    params: Parameters,
    lattice: SquareTorus,
    warmup_sweeps: usize,
    seen: usize,
    mag: Statistics,
    abs_mag: Statistics,
    mag2: Statistics,
    mag4: Statistics,
    energy: Statistics,
    energy2: Statistics,
    mag2_accum: Option<AutocorrAccum>,
}

impl Observer {
    pub fn new(params: Parameters, config: &RunConfig) -> Self {
        let measured = params.steps.saturating_sub(config.warmup_sweeps);
        let max_lag = config
            .autocorrelation_max_lag
            .map(|k| k.min(measured / 4).max(1));
        Self {
            params,
            lattice: SquareTorus::new(params.size),
            warmup_sweeps: config.warmup_sweeps,
            seen: 0,
            mag: Statistics::new(1),
            abs_mag: Statistics::new(1),
            mag2: Statistics::new(2),
            mag4: Statistics::new(4),
            energy: Statistics::new(1),
            energy2: Statistics::new(2),
            mag2_accum: max_lag.map(AutocorrAccum::new),
        }
    }

    pub fn observe(&mut self, record: &MacroStepRecord) {
        self.seen += 1;
        if self.seen <= self.warmup_sweeps {
            return;
        }

        let m = record.magnetization;
        self.mag.update(m);
        self.abs_mag.update(m.abs());
        self.mag2.update(m);
        self.mag4.update(m);

        let e = energy::hamiltonian(&self.lattice, &record.snapshot, self.params.j, self.params.b)
            / self.lattice.n_spins as f64;
        self.energy.update(e);
        self.energy2.update(e);

        if let Some(acc) = self.mag2_accum.as_mut() {
            acc.push(m * m);
        }
    }

    pub fn finish(self, acceptance_rate: f64) -> RunSummary {
        RunSummary {
            beta: self.params.beta,
            n_spins: self.lattice.n_spins,
            n_records: self.mag.count,
            mag: self.mag.average(),
            abs_mag: self.abs_mag.average(),
            mag2: self.mag2.average(),
            mag4: self.mag4.average(),
            energy: self.energy.average(),
            energy2: self.energy2.average(),
            mag2_tau: self.mag2_accum.map(|acc| sokal_tau(&acc.finish())),
            acceptance_rate,
        }
    }
}
