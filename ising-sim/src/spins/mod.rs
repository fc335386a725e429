pub mod energy;

use rand::Rng;

/// Draw `n_spins` independent spins, each +1 with probability `density`.
pub fn random_spins<R: Rng>(rng: &mut R, n_spins: usize, density: f64) -> Vec<i8> {
    (0..n_spins)
        .map(|_| if rng.gen::<f64>() < density { 1 } else { -1 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_density_extremes() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        assert!(random_spins(&mut rng, 100, 1.0).iter().all(|&s| s == 1));
        assert!(random_spins(&mut rng, 100, 0.0).iter().all(|&s| s == -1));
    }

    #[test]
    fn test_density_fraction() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);
        let spins = random_spins(&mut rng, 20_000, 0.25);
        let up = spins.iter().filter(|&&s| s == 1).count() as f64 / spins.len() as f64;
        assert!((up - 0.25).abs() < 0.02, "fraction of up spins was {up}");
    }
}
