use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use validator::Validate;

use super::macro_steps::MacroSteps;
use crate::config::Parameters;
use crate::error::{Result, SimError};
use crate::geometry::SquareTorus;
use crate::mcmc::{self, FlipOutcome};
use crate::spins::{self, energy};

/// Mutable state of one Metropolis chain on a square torus.
///
/// Holds the spin configuration, the running energy and magnetization, and
/// the random source driving the chain. Spins are stored as a flat `Vec<i8>`
/// of ±1, indexed as described on [`SquareTorus`].
///
/// `energy` starts at `-0.5 * J * Σs` and `magnet` at `Σs`; afterwards both
/// are only ever changed by the `dE`/`dM` of accepted flips.
pub struct LatticeSimulator<R = Xoshiro256StarStar> {
    params: Parameters,
    lattice: SquareTorus,
    spins: Vec<i8>,
    energy: f64,
    magnet: f64,
    rng: R,
    /// Micro-steps performed since construction.
    micro_steps: u64,
    /// Accepted flips since construction.
    accepted: u64,
}

impl LatticeSimulator<Xoshiro256StarStar> {
    /// Random initial lattice from a `Xoshiro256StarStar` seeded with `seed`.
    pub fn seeded(params: Parameters, seed: u64) -> Result<Self> {
        Self::with_rng(params, Xoshiro256StarStar::seed_from_u64(seed))
    }
}

impl<R: Rng> LatticeSimulator<R> {
    /// Validate `params` and draw each spin as +1 with probability `density`.
    pub fn with_rng(params: Parameters, mut rng: R) -> Result<Self> {
        params.validate()?;
        let spins = spins::random_spins(&mut rng, params.n_spins(), params.density);
        Ok(Self::build(params, spins, rng))
    }

    /// Start from an explicit configuration instead of a random one.
    /// `density` is ignored.
    pub fn from_spins(params: Parameters, spins: Vec<i8>, rng: R) -> Result<Self> {
        params.validate()?;
        if spins.len() != params.n_spins() {
            return Err(SimError::InvalidConfiguration(format!(
                "expected {} spins for size {}, got {}",
                params.n_spins(),
                params.size,
                spins.len()
            )));
        }
        if let Some(pos) = spins.iter().position(|&s| s != 1 && s != -1) {
            return Err(SimError::InvalidConfiguration(format!(
                "spin {pos} is {}, expected +1 or -1",
                spins[pos]
            )));
        }
        Ok(Self::build(params, spins, rng))
    }

    fn build(params: Parameters, spins: Vec<i8>, rng: R) -> Self {
        let lattice = SquareTorus::new(params.size);
        let energy = energy::initial_energy(&spins, params.j);
        let magnet = energy::magnet_of(&spins);

        tracing::debug!(
            size = params.size,
            steps = params.steps,
            beta = params.beta,
            j = params.j,
            b = params.b,
            magnet,
            "lattice initialized"
        );

        Self {
            params,
            lattice,
            spins,
            energy,
            magnet,
            rng,
            micro_steps: 0,
            accepted: 0,
        }
    }

    /// `(i, j)` of site `idx`. Panics if `idx >= size²`.
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        self.lattice.coords(idx)
    }

    /// Sum of the four wrapped neighbor spins of `idx`. Panics if `idx >= size²`.
    pub fn neighbor_sum(&self, idx: usize) -> f64 {
        energy::neighbor_sum(&self.lattice, &self.spins, idx)
    }

    /// One single-spin-flip trial on a uniformly drawn site.
    pub fn micro_step(&mut self) -> FlipOutcome {
        let out = mcmc::metropolis_step(
            &self.lattice,
            &mut self.spins,
            self.params.j,
            self.params.b,
            self.params.beta,
            &mut self.rng,
        );
        self.micro_steps += 1;
        if out.accepted {
            self.energy += out.d_energy;
            self.magnet += out.d_magnet;
            self.accepted += 1;
        }
        out
    }

    /// `size²` micro-steps. Returns the number of accepted flips.
    pub fn sweep(&mut self) -> usize {
        (0..self.lattice.n_spins)
            .filter(|_| self.micro_step().accepted)
            .count()
    }

    /// Lazily run `steps` sweeps, yielding one [`MacroStepRecord`] per sweep.
    ///
    /// Dropping the iterator early leaves the simulator at the last completed
    /// sweep; calling `advance` again continues the same chain.
    ///
    /// [`MacroStepRecord`]: super::MacroStepRecord
    pub fn advance(&mut self) -> MacroSteps<'_, R> {
        MacroSteps::new(self)
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn lattice(&self) -> &SquareTorus {
        &self.lattice
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    pub fn n_spins(&self) -> usize {
        self.lattice.n_spins
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn magnet(&self) -> f64 {
        self.magnet
    }

    /// Magnetization per spin, `magnet / size²`.
    pub fn magnetization(&self) -> f64 {
        self.magnet / self.lattice.n_spins as f64
    }

    pub fn total_micro_steps(&self) -> u64 {
        self.micro_steps
    }

    pub fn accepted_flips(&self) -> u64 {
        self.accepted
    }

    /// Fraction of micro-steps accepted since construction (0 before any).
    pub fn acceptance_rate(&self) -> f64 {
        if self.micro_steps == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.micro_steps as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let params = Parameters::new(6, 1, 0.3).with_coupling(2.0);
        let sim = LatticeSimulator::seeded(params, 1).unwrap();
        assert_eq!(sim.spins().len(), 36);
        assert!(sim.spins().iter().all(|&s| s == 1 || s == -1));
        let sum: f64 = sim.spins().iter().map(|&s| s as f64).sum();
        assert_eq!(sim.magnet(), sum);
        assert_eq!(sim.energy(), -0.5 * 2.0 * sum);
        assert_eq!(sim.total_micro_steps(), 0);
        assert_eq!(sim.acceptance_rate(), 0.0);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Parameters::new(0, 1, 0.3);
        assert!(matches!(
            LatticeSimulator::seeded(params, 1),
            Err(SimError::InvalidParameters(_))
        ));
        let params = Parameters::new(4, 1, -0.5);
        assert!(LatticeSimulator::seeded(params, 1).is_err());
    }

    #[test]
    fn test_from_spins_checks_configuration() {
        let params = Parameters::new(2, 1, 1.0);
        let rng = Xoshiro256StarStar::seed_from_u64(0);
        assert!(matches!(
            LatticeSimulator::from_spins(params, vec![1, 1, 1], rng.clone()),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            LatticeSimulator::from_spins(params, vec![1, 0, 1, -1], rng.clone()),
            Err(SimError::InvalidConfiguration(_))
        ));
        let sim = LatticeSimulator::from_spins(params, vec![1, -1, -1, -1], rng).unwrap();
        assert_eq!(sim.magnet(), -2.0);
        assert_eq!(sim.energy(), 1.0);
    }

    #[test]
    fn test_neighbor_sum_all_up() {
        let params = Parameters::new(3, 1, 1.0).with_density(1.0);
        let sim = LatticeSimulator::seeded(params, 5).unwrap();
        for idx in 0..9 {
            assert_eq!(sim.neighbor_sum(idx), 4.0);
        }
        assert_eq!(sim.coords(7), (1, 2));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_neighbor_sum_out_of_range_panics() {
        let sim = LatticeSimulator::seeded(Parameters::new(3, 1, 1.0), 5).unwrap();
        sim.neighbor_sum(9);
    }

    #[test]
    fn test_magnet_tracks_every_step() {
        let params = Parameters::new(5, 1, 0.4).with_field(0.2);
        let mut sim = LatticeSimulator::seeded(params, 9).unwrap();
        for _ in 0..2000 {
            let before = sim.spins().to_vec();
            let out = sim.micro_step();
            let sum: i64 = sim.spins().iter().map(|&s| s as i64).sum();
            assert_eq!(sim.magnet(), sum as f64);
            if out.accepted {
                assert_eq!(sim.spins()[out.idx], -before[out.idx]);
            } else {
                assert_eq!(sim.spins(), &before[..]);
            }
        }
        assert_eq!(sim.total_micro_steps(), 2000);
    }

    #[test]
    fn test_sweep_counts_accepted() {
        let params = Parameters::new(4, 1, 0.0);
        let mut sim = LatticeSimulator::seeded(params, 2).unwrap();
        // Infinite temperature: every trial is accepted.
        assert_eq!(sim.sweep(), 16);
        assert_eq!(sim.accepted_flips(), 16);
        assert_eq!(sim.acceptance_rate(), 1.0);
    }
}
