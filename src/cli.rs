use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use ising_sim::{Parameters, RunConfig};

/// Metropolis simulation of the 2-D Ising model on a periodic lattice
#[derive(Parser, Debug)]
#[command(name = "ising", version)]
#[command(about = "Run single-spin-flip Metropolis simulations of the 2-D Ising model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one chain and stream `sweep,magnetization` lines
    Run(RunArgs),
    /// Run one chain per inverse temperature in parallel and tabulate the results
    Scan(ScanArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Size of the lattice (N x N)
    #[arg(long)]
    pub size: usize,

    /// Number of full-lattice sweeps
    #[arg(long)]
    pub steps: usize,

    /// Coupling constant J
    #[arg(short = 'J', default_value_t = 1.0, allow_negative_numbers = true)]
    pub j: f64,

    /// External magnetic field B
    #[arg(short = 'B', default_value_t = 0.0, allow_negative_numbers = true)]
    pub b: f64,

    /// Initial +1 spin density
    #[arg(long, default_value_t = 0.5)]
    pub density: f64,

    /// Random seed for deterministic runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sweeps excluded from the summary averages
    #[arg(long, default_value_t = 0)]
    pub warmup: usize,

    /// Largest lag of the m² autocorrelation used for τ
    #[arg(long)]
    pub max_lag: Option<usize>,

    /// Output stats file name
    #[arg(long)]
    pub output_stats: Option<PathBuf>,

    /// Stop at the next sweep boundary once this many seconds have passed
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<u64>,
}

impl ModelArgs {
    pub fn parameters(&self, beta: f64) -> Parameters {
        Parameters::new(self.size, self.steps, beta)
            .with_coupling(self.j)
            .with_field(self.b)
            .with_density(self.density)
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            warmup_sweeps: self.warmup,
            autocorrelation_max_lag: self.max_lag,
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit.map(Duration::from_secs)
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Inverse temperature
    #[arg(long, allow_negative_numbers = true)]
    pub beta: f64,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Comma-separated inverse temperatures, e.g. 0.3,0.44,0.6
    #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
    pub betas: Vec<f64>,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_defaults() {
        let cli = Cli::parse_from([
            "ising", "run", "--size", "16", "--beta", "0.44", "--steps", "100",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let p = args.model.parameters(args.beta);
        assert_eq!(p, Parameters::new(16, 100, 0.44));
        assert_eq!(args.model.run_config(), RunConfig::default());
        assert!(args.model.output_stats.is_none());
        assert!(args.model.time_limit().is_none());
    }

    #[test]
    fn parses_time_limit() {
        let cli = Cli::parse_from([
            "ising", "run", "--size", "8", "--steps", "10", "--beta", "0.3", "--time-limit", "90",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.model.time_limit(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn parses_scan_with_model_flags() {
        let cli = Cli::parse_from([
            "ising", "scan", "--size", "8", "--steps", "50", "--betas", "0.2,0.4,0.6", "-J", "-1",
            "-B", "0.1", "--density", "0.9", "--seed", "7", "--warmup", "10", "--max-lag", "5",
        ]);
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.betas, vec![0.2, 0.4, 0.6]);
        let p = args.model.parameters(0.4);
        assert_eq!(p.j, -1.0);
        assert_eq!(p.b, 0.1);
        assert_eq!(p.density, 0.9);
        assert_eq!(args.model.seed, Some(7));
        assert_eq!(
            args.model.run_config(),
            RunConfig {
                warmup_sweeps: 10,
                autocorrelation_max_lag: Some(5),
            }
        );
    }

    #[test]
    fn run_requires_beta() {
        assert!(Cli::try_parse_from(["ising", "run", "--size", "4", "--steps", "1"]).is_err());
    }
}
