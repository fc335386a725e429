use crate::geometry::SquareTorus;
use crate::spins::energy::neighbor_sum;
use rand::Rng;

/// Outcome of one single-spin-flip trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipOutcome {
    /// Site that was proposed for flipping.
    pub idx: usize,
    /// Energy change of the proposed flip.
    pub d_energy: f64,
    /// Magnetization change of the proposed flip.
    pub d_magnet: f64,
    pub accepted: bool,
}

/// Metropolis acceptance: always accept a downhill move, otherwise accept
/// with probability `exp(-dE * beta)`.
///
/// The uniform draw in `[0, 1)` only happens for `dE >= 0`. Since the draw is
/// strictly below 1, `dE == 0` and `beta == 0` are always accepted.
#[inline]
pub fn metropolis_accept<R: Rng>(rng: &mut R, d_energy: f64, beta: f64) -> bool {
    d_energy < 0.0 || rng.gen::<f64>() < (-d_energy * beta).exp()
}

/// One Metropolis trial on a uniformly drawn site. Flips `spins` in place when
/// accepted; the caller applies `d_energy`/`d_magnet` to its observables.
#[inline]
pub fn metropolis_step<R: Rng>(
    lattice: &SquareTorus,
    spins: &mut [i8],
    j: f64,
    b: f64,
    beta: f64,
    rng: &mut R,
) -> FlipOutcome {
    let idx = rng.gen_range(0..lattice.n_spins);
    let si = spins[idx] as f64;
    let d_energy = 2.0 * si * (j * neighbor_sum(lattice, spins, idx) + b);
    let d_magnet = -2.0 * si;

    let accepted = metropolis_accept(rng, d_energy, beta);
    if accepted {
        spins[idx] = -spins[idx];
    }
    FlipOutcome {
        idx,
        d_energy,
        d_magnet,
        accepted,
    }
}
