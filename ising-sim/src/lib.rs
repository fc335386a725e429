//! Single-spin-flip Metropolis Monte Carlo for the 2-D Ising model.
//!
//! A [`LatticeSimulator`] owns a `size × size` torus of ±1 spins together
//! with its running energy and magnetization. [`LatticeSimulator::advance`]
//! lazily yields one [`MacroStepRecord`] per full lattice sweep; what to do
//! with the snapshots (render, export, average) is left to the caller.

pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{Parameters, RunConfig};
pub use error::{Result, SimError};
pub use geometry::SquareTorus;
pub use mcmc::{metropolis_accept, FlipOutcome};
pub use simulation::{
    run_beta_scan, run_observed, LatticeSimulator, MacroStepRecord, MacroSteps,
};
pub use statistics::{Observer, RunSummary};
