//! Command-line driver for `ising-sim`.
//!
//! `run` drives one chain and can export `sweep,magnetization` lines; `scan`
//! runs one chain per inverse temperature in parallel and prints one summary
//! row each. `--time-limit` stops either at the next sweep boundary.

mod cli;
mod deadline;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::{run_beta_scan, run_observed, LatticeSimulator, SimError};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, RunArgs, ScanArgs};
use deadline::Deadline;
use error::Result;
use output::{StatsWriter, SCAN_HEADER};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ising=info,ising_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let res = match cli.command {
        Command::Run(args) => run(args),
        Command::Scan(args) => scan(args),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn progress_bar(len: u64, message: &'static str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{msg} [{bar:40.magenta}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(message);
    pb
}

fn run(args: RunArgs) -> Result<()> {
    let seed = args.model.seed.unwrap_or_else(rand::random);
    let params = args.model.parameters(args.beta);
    let config = args.model.run_config();
    tracing::info!(
        seed,
        size = params.size,
        steps = params.steps,
        beta = params.beta,
        "starting run"
    );

    let mut sim = LatticeSimulator::seeded(params, seed)?;
    config.check(&params)?;
    let mut stats = match args.model.output_stats.as_deref() {
        Some(path) => Some(StatsWriter::open(Some(path))?),
        None => None,
    };

    let deadline = Deadline::new(args.model.time_limit());
    let pb = progress_bar(params.steps as u64, "sweeps", args.quiet);
    let mut write_err = None;
    let res = run_observed(&mut sim, &config, deadline.flag(), &mut |record| {
        pb.inc(1);
        deadline.tick();
        if write_err.is_none() {
            if let Some(w) = stats.as_mut() {
                write_err = w.record(record).err();
            }
        }
    });
    pb.finish_and_clear();

    if let Some(e) = write_err {
        return Err(e);
    }
    if let Some(w) = stats {
        w.finish()?;
    }

    let summary = match res {
        Err(SimError::Interrupted) => {
            tracing::warn!(
                sweeps = sim.total_micro_steps() / sim.n_spins() as u64,
                "time limit reached, stopping early"
            );
            return Ok(());
        }
        res => res?,
    };
    tracing::info!(
        mag = summary.mag,
        abs_mag = summary.abs_mag,
        energy = summary.energy,
        binder = summary.binder(),
        susceptibility = summary.susceptibility(),
        specific_heat = summary.specific_heat(),
        tau_m2 = summary.mag2_tau,
        acceptance = summary.acceptance_rate,
        "run summary"
    );
    Ok(())
}

fn scan(args: ScanArgs) -> Result<()> {
    let seed = args.model.seed.unwrap_or_else(rand::random);
    let params = args.model.parameters(args.betas[0]);
    let config = args.model.run_config();
    tracing::info!(seed, n_chains = args.betas.len(), "starting scan");

    let total = (args.betas.len() * params.steps) as u64;
    let pb = progress_bar(total, "sweeps", args.quiet);
    let deadline = Deadline::new(args.model.time_limit());
    let summaries = run_beta_scan(&params, &args.betas, seed, &config, deadline.flag(), &|_| {
        pb.inc(1);
        deadline.tick();
    });
    pb.finish_and_clear();
    if deadline.expired() {
        tracing::warn!("time limit reached, scan abandoned");
    }
    let summaries = summaries?;

    let mut out = StatsWriter::open(args.model.output_stats.as_deref())?;
    out.header(SCAN_HEADER)?;
    for s in &summaries {
        out.summary_row(s)?;
    }
    out.finish()
}
