//! Discrete-time boid flocking with sequential and data-parallel ticks.
//!
//! A [`FlockSimulation`] owns a fixed population of [`Agent`]s. Each call to
//! [`FlockSimulation::tick`] steers every agent by separation, alignment and
//! cohesion against its neighbors, integrates one step, applies the boundary
//! policy and records how long the update took.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod math;
pub mod models;
pub mod sim;
pub mod timing;

pub use algorithms::neighbors::neighbors_within;
pub use config::{BoundaryPolicy, Bounds, FlockParams, SimulationConfig};
pub use error::SimulationError;
pub use math::Vector2D;
pub use models::agent::Agent;
pub use sim::{ExecutionMode, FlockSimulation, TickReport, ViewSync};
pub use timing::TickTimings;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

/// Build a randomly initialized flock of `count` agents inside `bounds`,
/// with every other setting at its default.
pub fn initialize_population(count: usize, bounds: Bounds) -> Result<FlockSimulation, SimulationError> {
    FlockSimulation::new(SimulationConfig { agent_count: count, bounds, ..SimulationConfig::default() })
}
