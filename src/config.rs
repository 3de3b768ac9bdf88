use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

pub const DEFAULT_AGENT_COUNT: usize = 100;
pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;
pub const DEFAULT_MAX_SPEED: f64 = 3.0;
pub const DEFAULT_SEPARATION_RADIUS: f64 = 25.0;
pub const DEFAULT_ALIGNMENT_RADIUS: f64 = 50.0;
pub const DEFAULT_COHESION_RADIUS: f64 = 50.0;
pub const DEFAULT_SEPARATION_WEIGHT: f64 = 2.5;
pub const DEFAULT_ALIGNMENT_WEIGHT: f64 = 1.0;
pub const DEFAULT_COHESION_WEIGHT: f64 = 1.0;
pub const DEFAULT_ALIGNMENT_GAIN: f64 = 0.1;
pub const DEFAULT_COHESION_GAIN: f64 = 0.005;
pub const DEFAULT_INITIAL_SPEED: f64 = 2.0;
pub const DEFAULT_TIMING_WINDOW: usize = 100;

/// Steering constants shared by every agent in a flock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    pub max_speed: f64,
    pub separation_radius: f64,
    pub alignment_radius: f64,
    pub cohesion_radius: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    /// Applied inside the alignment rule, before `alignment_weight`.
    pub alignment_gain: f64,
    /// Applied inside the cohesion rule, before `cohesion_weight`.
    pub cohesion_gain: f64,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            separation_radius: DEFAULT_SEPARATION_RADIUS,
            alignment_radius: DEFAULT_ALIGNMENT_RADIUS,
            cohesion_radius: DEFAULT_COHESION_RADIUS,
            separation_weight: DEFAULT_SEPARATION_WEIGHT,
            alignment_weight: DEFAULT_ALIGNMENT_WEIGHT,
            cohesion_weight: DEFAULT_COHESION_WEIGHT,
            alignment_gain: DEFAULT_ALIGNMENT_GAIN,
            cohesion_gain: DEFAULT_COHESION_GAIN,
        }
    }
}

impl FlockParams {
    /// Radius handed to the neighbor query before each agent update.
    pub fn neighbor_radius(&self) -> f64 {
        self.alignment_radius.max(self.cohesion_radius)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(SimulationError::InvalidConfig("max_speed must be positive"));
        }
        let radii = [self.separation_radius, self.alignment_radius, self.cohesion_radius];
        if radii.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(SimulationError::InvalidConfig(
                "interaction radii must be finite and non-negative",
            ));
        }
        let gains = [
            self.separation_weight,
            self.alignment_weight,
            self.cohesion_weight,
            self.alignment_gain,
            self.cohesion_gain,
        ];
        if gains.iter().any(|g| !g.is_finite()) {
            return Err(SimulationError::InvalidConfig("steering weights must be finite"));
        }
        Ok(())
    }
}

/// Size of the simulated canvas. Positions live in `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SimulationError::InvalidConfig("bounds.width must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SimulationError::InvalidConfig("bounds.height must be positive"));
        }
        Ok(())
    }
}

/// What happens to an agent that leaves the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Re-enter from the opposite edge.
    #[default]
    Wrap,
    /// Clamp to the edge and invert the perpendicular velocity component.
    Reflect,
}

/// Everything needed to build a [`FlockSimulation`](crate::FlockSimulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub agent_count: usize,
    pub bounds: Bounds,
    pub params: FlockParams,
    pub boundary: BoundaryPolicy,
    /// Optional RNG seed for reproducible populations.
    pub rng_seed: Option<u64>,
    /// Size of a dedicated worker pool; `None` uses rayon's global pool.
    pub worker_threads: Option<usize>,
    /// Number of recent tick durations kept for the rolling average.
    pub timing_window: usize,
    /// Initial velocity components are drawn from `[-initial_speed, initial_speed)`.
    pub initial_speed: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            agent_count: DEFAULT_AGENT_COUNT,
            bounds: Bounds::default(),
            params: FlockParams::default(),
            boundary: BoundaryPolicy::default(),
            rng_seed: None,
            worker_threads: None,
            timing_window: DEFAULT_TIMING_WINDOW,
            initial_speed: DEFAULT_INITIAL_SPEED,
        }
    }
}

impl SimulationConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        self.bounds.validate()?;
        self.params.validate()?;
        if self.timing_window == 0 {
            return Err(SimulationError::InvalidConfig("timing_window must be positive"));
        }
        if self.worker_threads == Some(0) {
            return Err(SimulationError::InvalidConfig("worker_threads must be positive"));
        }
        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return Err(SimulationError::InvalidConfig(
                "initial_speed must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Returns the configured RNG seed, generating one from entropy if absent.
    pub fn resolved_seed(&self) -> u64 {
        self.rng_seed.unwrap_or_else(rand::random)
    }

    pub(crate) fn seeded_rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }
}
