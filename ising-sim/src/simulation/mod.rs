pub mod macro_steps;
pub mod simulator;

pub use macro_steps::{MacroStepRecord, MacroSteps};
pub use simulator::LatticeSimulator;

use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use rayon::prelude::*;

use crate::config::{Parameters, RunConfig};
use crate::error::{Result, SimError};
use crate::statistics::{Observer, RunSummary};

/// Drain one [`LatticeSimulator::advance`] call into a [`RunSummary`].
///
/// `interrupted` is checked before every sweep; once set the run stops at
/// that sweep boundary with [`SimError::Interrupted`], leaving `sim` usable.
/// `on_sweep` sees every record before it is folded into the summary
/// (progress bars, stats export).
pub fn run_observed<R: Rng>(
    sim: &mut LatticeSimulator<R>,
    config: &RunConfig,
    interrupted: &AtomicBool,
    on_sweep: &mut dyn FnMut(&MacroStepRecord),
) -> Result<RunSummary> {
    let params = *sim.params();
    config.check(&params)?;

    let mut observer = Observer::new(params, config);
    let mut records = sim.advance();
    loop {
        if interrupted.load(Ordering::Relaxed) {
            return Err(SimError::Interrupted);
        }
        let Some(record) = records.next() else {
            break;
        };
        on_sweep(&record);
        observer.observe(&record);
    }

    let summary = observer.finish(sim.acceptance_rate());
    tracing::info!(
        beta = summary.beta,
        mag = summary.mag,
        abs_mag = summary.abs_mag,
        energy = summary.energy,
        acceptance = summary.acceptance_rate,
        "run finished"
    );
    Ok(summary)
}

/// Run one independent chain per `beta` in parallel and summarize each.
///
/// Chain `k` runs `params.with_beta(betas[k])` on a `Xoshiro256StarStar`
/// seeded with `base_seed + k` (wrapping), so a scan is reproducible for a
/// fixed seed regardless of thread scheduling. Results come back in `betas`
/// order. `on_sweep` is shared by all chains and may run concurrently.
pub fn run_beta_scan(
    params: &Parameters,
    betas: &[f64],
    base_seed: u64,
    config: &RunConfig,
    interrupted: &AtomicBool,
    on_sweep: &(dyn Fn(&MacroStepRecord) + Sync),
) -> Result<Vec<RunSummary>> {
    tracing::info!(
        n_chains = betas.len(),
        size = params.size,
        steps = params.steps,
        "starting beta scan"
    );

    betas
        .par_iter()
        .enumerate()
        .map(|(k, &beta)| {
            let seed = base_seed.wrapping_add(k as u64);
            let mut sim = LatticeSimulator::seeded(params.with_beta(beta), seed)?;
            run_observed(&mut sim, config, interrupted, &mut |record| on_sweep(record))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_observed_counts_records() {
        let params = Parameters::new(4, 12, 0.2);
        let mut sim = LatticeSimulator::seeded(params, 4).unwrap();
        let config = RunConfig {
            warmup_sweeps: 2,
            autocorrelation_max_lag: Some(2),
        };
        let interrupted = AtomicBool::new(false);
        let mut seen = Vec::new();
        let summary = run_observed(&mut sim, &config, &interrupted, &mut |record| {
            seen.push(record.step);
        })
        .unwrap();
        assert_eq!(seen, (1..=12).map(|k| k * 16).collect::<Vec<_>>());
        assert_eq!(summary.n_records, 10);
        assert!(summary.mag2_tau.is_some());
        assert!(summary.acceptance_rate > 0.0 && summary.acceptance_rate <= 1.0);
    }

    #[test]
    fn test_run_observed_rejects_full_warmup() {
        let params = Parameters::new(4, 3, 0.2);
        let mut sim = LatticeSimulator::seeded(params, 4).unwrap();
        let config = RunConfig {
            warmup_sweeps: 3,
            autocorrelation_max_lag: None,
        };
        let res = run_observed(&mut sim, &config, &AtomicBool::new(false), &mut |_| {});
        assert!(matches!(res, Err(SimError::InvalidConfiguration(_))));
        assert_eq!(sim.total_micro_steps(), 0);
    }

    #[test]
    fn test_interrupted_run_stops_at_boundary() {
        let params = Parameters::new(4, 50, 0.2);
        let mut sim = LatticeSimulator::seeded(params, 4).unwrap();
        let res = run_observed(
            &mut sim,
            &RunConfig::default(),
            &AtomicBool::new(true),
            &mut |_| {},
        );
        assert!(matches!(res, Err(SimError::Interrupted)));
        assert_eq!(sim.total_micro_steps(), 0);
    }

    #[test]
    fn test_flag_set_from_callback_stops_after_that_sweep() {
        let params = Parameters::new(4, 50, 0.2);
        let mut sim = LatticeSimulator::seeded(params, 4).unwrap();
        let interrupted = AtomicBool::new(false);
        let res = run_observed(&mut sim, &RunConfig::default(), &interrupted, &mut |record| {
            if record.sweep() == 3 {
                interrupted.store(true, Ordering::Relaxed);
            }
        });
        assert!(matches!(res, Err(SimError::Interrupted)));
        assert_eq!(sim.total_micro_steps(), 3 * 16);
    }

    #[test]
    fn test_beta_scan_order_and_reproducibility() {
        let params = Parameters::new(6, 20, 0.0);
        let betas = [0.1, 0.3, 0.6, 1.0];
        let config = RunConfig::default();
        let interrupted = AtomicBool::new(false);
        let a = run_beta_scan(&params, &betas, 99, &config, &interrupted, &|_| {}).unwrap();
        let b = run_beta_scan(&params, &betas, 99, &config, &interrupted, &|_| {}).unwrap();
        assert_eq!(a.len(), betas.len());
        for (s, &beta) in a.iter().zip(betas.iter()) {
            assert_eq!(s.beta, beta);
            assert_eq!(s.n_records, 20);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_beta_scan_propagates_errors() {
        let params = Parameters::new(4, 5, 0.0);
        let config = RunConfig::default();
        let interrupted = AtomicBool::new(false);
        let res = run_beta_scan(&params, &[0.5, -1.0], 1, &config, &interrupted, &|_| {});
        assert!(matches!(res, Err(SimError::InvalidParameters(_))));
    }
}
