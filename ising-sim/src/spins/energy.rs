use crate::geometry::SquareTorus;

/// Total magnetization `Σ s_i`.
pub fn magnet_of(spins: &[i8]) -> f64 {
    spins.iter().map(|&s| s as i64).sum::<i64>() as f64
}

/// Starting value of the tracked energy, `-0.5 * J * Σ s_i`.
///
/// This is the reference the incremental updates are added to; it is not the
/// lattice Hamiltonian (see [`hamiltonian`]).
pub fn initial_energy(spins: &[i8], j: f64) -> f64 {
    -0.5 * j * magnet_of(spins)
}

/// Sum of the four wrapped neighbor spins of `idx`.
#[inline]
pub fn neighbor_sum(lattice: &SquareTorus, spins: &[i8], idx: usize) -> f64 {
    lattice
        .neighbors(idx)
        .iter()
        .map(|&k| spins[k] as i32)
        .sum::<i32>() as f64
}

/// Nearest-neighbor Hamiltonian `-J Σ_<ik> s_i s_k - B Σ s_i`.
///
/// Each bond is counted once through the forward neighbor on each axis. A
/// single flip of `s_i` changes this by exactly `2 s_i (J h_i + B)`, which is
/// the `dE` the sampler adds to its tracked energy (for `size >= 2`).
pub fn hamiltonian(lattice: &SquareTorus, spins: &[i8], j: f64, b: f64) -> f64 {
    let mut bonds = 0i64;
    #[allow(clippy::needless_range_loop)]
    for i in 0..lattice.n_spins {
        let si = spins[i] as i64;
        for axis in 0..2 {
            bonds += si * spins[lattice.neighbor(i, axis, true)] as i64;
        }
    }
    -j * bonds as f64 - b * magnet_of(spins)
}
