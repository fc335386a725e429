use std::sync::atomic::AtomicBool;
use std::time::Instant;

use ising_sim::{run_beta_scan, LatticeSimulator, Parameters, RunConfig};

const L: usize = 128;
const N_BETAS: usize = 16;
const N_SWEEPS: usize = 200;

fn main() {
    let params = Parameters::new(L, N_SWEEPS, 0.44);

    let betas: Vec<f64> = (0..N_BETAS)
        .map(|i| 0.2 + 0.5 * i as f64 / (N_BETAS - 1) as f64)
        .collect();

    let config = RunConfig {
        warmup_sweeps: N_SWEEPS / 4,
        autocorrelation_max_lag: Some(50),
    };
    let interrupted = AtomicBool::new(false);

    println!(
        "Lattice: {}x{}  |  Betas: {}  |  Sweeps: {}",
        L, L, N_BETAS, N_SWEEPS
    );
    println!("{}", "-".repeat(70));

    let mut sim = LatticeSimulator::seeded(params, 42).unwrap();
    let t0 = Instant::now();
    let n_records = sim.advance().count();
    let elapsed = t0.elapsed().as_secs_f64();
    println!(
        "Single chain: {:.3} s  |  {:.3} ms/sweep  |  {} records",
        elapsed,
        elapsed / N_SWEEPS as f64 * 1000.0,
        n_records
    );

    let t0 = Instant::now();
    let summaries = run_beta_scan(&params, &betas, 42, &config, &interrupted, &|_| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();
    println!(
        "Scan: {:.3} s  |  {:.3} ms/sweep/chain",
        elapsed,
        elapsed / (N_SWEEPS * N_BETAS) as f64 * 1000.0
    );

    for s in &summaries {
        println!(
            "beta={:.3}  |m|={:.4}  U={:.4}  tau={:.1}",
            s.beta,
            s.abs_mag,
            s.binder(),
            s.mag2_tau.unwrap_or(f64::NAN)
        );
    }
}
