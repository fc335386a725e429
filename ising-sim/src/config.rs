use validator::{Validate, ValidationError};

use crate::error::SimError;

fn validate_parameters(p: &Parameters) -> Result<(), ValidationError> {
    if p.size < 1 {
        return Err(ValidationError::new("size must be >= 1"));
    }
    if p.steps < 1 {
        return Err(ValidationError::new("steps must be >= 1"));
    }
    let n_trials = p.size.checked_mul(p.size).and_then(|n| n.checked_mul(p.steps));
    if n_trials.is_none() {
        return Err(ValidationError::new("steps * size² must fit in usize"));
    }
    if !(0.0..=1.0).contains(&p.density) {
        return Err(ValidationError::new("density must be in [0, 1]"));
    }
    if !p.beta.is_finite() || p.beta < 0.0 {
        return Err(ValidationError::new("beta must be finite and >= 0"));
    }
    if !p.j.is_finite() {
        return Err(ValidationError::new("J must be finite"));
    }
    if !p.b.is_finite() {
        return Err(ValidationError::new("B must be finite"));
    }
    Ok(())
}

/// Physical and run-length parameters of one simulation.
///
/// `steps` counts full-lattice sweeps, i.e. `steps * size²` single-spin
/// trials per [`advance`](crate::LatticeSimulator::advance) call.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
#[validate(schema(function = "validate_parameters"))]
pub struct Parameters {
    /// Lattice side length; the lattice holds `size * size` spins.
    pub size: usize,
    /// Number of sweeps (emitted records) per `advance` call.
    pub steps: usize,
    /// Probability that an initial spin is +1.
    pub density: f64,
    /// Inverse temperature.
    pub beta: f64,
    /// Nearest-neighbor coupling.
    pub j: f64,
    /// Uniform external field.
    pub b: f64,
}

impl Parameters {
    /// Parameters with `J = 1`, `B = 0` and a half-filled initial lattice.
    pub fn new(size: usize, steps: usize, beta: f64) -> Self {
        Self {
            size,
            steps,
            density: 0.5,
            beta,
            j: 1.0,
            b: 0.0,
        }
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_coupling(mut self, j: f64) -> Self {
        self.j = j;
        self
    }

    pub fn with_field(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Number of spins, `size²`.
    pub fn n_spins(&self) -> usize {
        self.size * self.size
    }
}

fn validate_run_config(cfg: &RunConfig) -> Result<(), ValidationError> {
    if cfg.autocorrelation_max_lag == Some(0) {
        return Err(ValidationError::new("autocorrelation_max_lag must be >= 1"));
    }
    Ok(())
}

/// How a driver turns the record stream into a [`RunSummary`].
///
/// [`RunSummary`]: crate::statistics::RunSummary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Validate)]
#[validate(schema(function = "validate_run_config"))]
pub struct RunConfig {
    /// Leading records excluded from the averages; must be < `steps`.
    pub warmup_sweeps: usize,
    /// Largest lag of the m² autocorrelation; `None` skips it.
    pub autocorrelation_max_lag: Option<usize>,
}

impl RunConfig {
    /// Validate against the run length of `params`.
    pub fn check(&self, params: &Parameters) -> crate::Result<()> {
        self.validate()?;
        if self.warmup_sweeps >= params.steps {
            return Err(SimError::InvalidConfiguration(format!(
                "warmup_sweeps ({}) must be < steps ({})",
                self.warmup_sweeps, params.steps
            )));
        }
        Ok(())
    }
}
