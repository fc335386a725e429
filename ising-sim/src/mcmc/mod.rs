pub mod sweep;

pub use sweep::{metropolis_accept, metropolis_step, FlipOutcome};
