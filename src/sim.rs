use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::algorithms::neighbors::neighbors_within_into;
use crate::config::{BoundaryPolicy, Bounds, FlockParams, SimulationConfig};
use crate::error::SimulationError;
use crate::math::Vector2D;
use crate::models::agent::{random_population, Agent};
use crate::timing::{Stopwatch, TickTimings};

/// How one tick walks the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Agents are updated in place, in population order. Later agents see the
    /// already-updated state of earlier ones.
    #[default]
    Sequential,
    /// Agents are updated concurrently into a staging buffer from the pre-tick
    /// state, then the buffers are swapped.
    Parallel,
}

impl ExecutionMode {
    pub fn label(self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "Serial",
            ExecutionMode::Parallel => "Parallel",
        }
    }
}

/// Receives every agent's position once per tick, after the update phase.
/// This is where a rendering shell moves its shapes.
pub trait ViewSync {
    fn sync(&mut self, index: usize, position: &Vector2D);
}

// Convenience: any FnMut(index, position) works as a sync target
impl<F> ViewSync for F
where
    F: FnMut(usize, &Vector2D),
{
    fn sync(&mut self, index: usize, position: &Vector2D) {
        (self)(index, position)
    }
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub positions: Vec<Vector2D>,
    /// Wall-clock time of the update phase only.
    pub elapsed: Duration,
    /// Mode that actually ran.
    pub mode: ExecutionMode,
    /// Mean over the rolling window, in milliseconds.
    pub average_ms: f64,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Average Frame Time: {:.2} ms ({})", self.average_ms, self.mode.label())
    }
}

/// Owns the flock and steps it on demand.
///
/// Nothing here runs on its own schedule: callers invoke [`tick`](Self::tick)
/// whenever they want the next frame.
#[derive(Debug)]
pub struct FlockSimulation {
    agents: Vec<Agent>,
    staging: Vec<Agent>,          // write target of the parallel phase
    neighbor_buf: Vec<usize>,     // reused by the sequential phase
    bounds: Bounds,
    params: FlockParams,
    boundary: BoundaryPolicy,
    mode: ExecutionMode,
    timings: TickTimings,
    seed: Option<u64>,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
    #[cfg(not(feature = "parallel"))]
    fallback_logged: bool,
    #[cfg(test)]
    fault_at: Option<usize>, // agent index whose parallel update panics
}

impl FlockSimulation {
    /// Build a flock of `config.agent_count` agents with random positions and velocities.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let seed = config.resolved_seed();
        let mut rng = SimulationConfig::seeded_rng(seed);
        let agents = random_population(&mut rng, config.agent_count, &config.bounds, config.initial_speed);
        let mut sim = Self::from_agents(config, agents)?;
        sim.seed = Some(seed);
        debug!(
            agents = sim.len(),
            width = sim.bounds.width,
            height = sim.bounds.height,
            boundary = ?sim.boundary,
            seed,
            "initialized flock"
        );
        Ok(sim)
    }

    /// Build a flock from explicit agents. `config.agent_count` is ignored.
    pub fn from_agents(config: SimulationConfig, agents: Vec<Agent>) -> Result<Self, SimulationError> {
        config.validate()?;

        #[cfg(feature = "parallel")]
        let pool = match config.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("rflock-worker-{i}"))
                    .build()?;
                debug!(threads, "built dedicated worker pool");
                Some(pool)
            }
            None => None,
        };

        let staging = agents.clone();
        Ok(Self {
            agents,
            staging,
            neighbor_buf: Vec::new(),
            bounds: config.bounds,
            params: config.params,
            boundary: config.boundary,
            mode: ExecutionMode::default(),
            timings: TickTimings::new(config.timing_window),
            seed: config.rng_seed,
            #[cfg(feature = "parallel")]
            pool,
            #[cfg(not(feature = "parallel"))]
            fallback_logged: false,
            #[cfg(test)]
            fault_at: None,
        })
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn timings(&self) -> &TickTimings {
        &self.timings
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Seed the population was drawn from, if known.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn positions(&self) -> Vec<Vector2D> {
        self.agents.iter().map(|a| a.position).collect()
    }

    /// Mean tick duration in milliseconds over the rolling window; 0 before the first tick.
    pub fn average_recent_tick_duration(&self) -> f64 {
        self.timings.average_millis()
    }

    /// Persist a mode for [`step`](Self::step). Starts a fresh timing window.
    pub fn set_mode(&mut self, mode: ExecutionMode) {
        info!(from = ?self.mode, to = ?mode, "switching execution mode");
        self.mode = mode;
        self.timings.clear();
    }

    /// Swap steering constants between ticks.
    pub fn set_params(&mut self, params: FlockParams) -> Result<(), SimulationError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// One tick in the persisted mode.
    pub fn step(&mut self) -> Result<TickReport, SimulationError> {
        self.tick(self.mode)
    }

    /// One tick in `mode`.
    pub fn tick(&mut self, mode: ExecutionMode) -> Result<TickReport, SimulationError> {
        self.tick_with(mode, &mut |_: usize, _: &Vector2D| {})
    }

    /// One tick in `mode`, then hand every new position to `sync`.
    ///
    /// Only the update phase is timed. An empty flock returns an empty report
    /// and leaves the timing window untouched.
    pub fn tick_with<S>(&mut self, mode: ExecutionMode, sync: &mut S) -> Result<TickReport, SimulationError>
    where
        S: ViewSync + ?Sized,
    {
        let mode = self.effective_mode(mode);
        if self.agents.is_empty() {
            return Ok(TickReport {
                positions: Vec::new(),
                elapsed: Duration::ZERO,
                mode,
                average_ms: self.timings.average_millis(),
            });
        }

        let watch = Stopwatch::start();
        match mode {
            ExecutionMode::Sequential => self.update_sequential(),
            ExecutionMode::Parallel => self.update_parallel()?,
        }
        let elapsed = watch.elapsed();
        self.timings.record(elapsed);

        for (i, agent) in self.agents.iter().enumerate() {
            sync.sync(i, &agent.position);
        }

        let average_ms = self.timings.average_millis();
        trace!(?mode, ?elapsed, average_ms, "tick");
        Ok(TickReport { positions: self.positions(), elapsed, mode, average_ms })
    }

    #[cfg(feature = "parallel")]
    fn effective_mode(&mut self, mode: ExecutionMode) -> ExecutionMode {
        mode
    }

    #[cfg(not(feature = "parallel"))]
    fn effective_mode(&mut self, mode: ExecutionMode) -> ExecutionMode {
        if mode == ExecutionMode::Parallel && !self.fallback_logged {
            tracing::warn!("built without the `parallel` feature; running ticks sequentially");
            self.fallback_logged = true;
        }
        ExecutionMode::Sequential
    }

    fn update_sequential(&mut self) {
        let radius = self.params.neighbor_radius();
        let mut neighbors = std::mem::take(&mut self.neighbor_buf);
        for i in 0..self.agents.len() {
            neighbors_within_into(radius, i, &self.agents, &mut neighbors);
            let mut agent = self.agents[i];
            agent.update(&self.agents, &neighbors, &self.params, &self.bounds, self.boundary);
            self.agents[i] = agent;
        }
        self.neighbor_buf = neighbors;
    }

    /// Fan out over contiguous chunks of the staging buffer. Each worker owns
    /// its chunk exclusively and reads the whole pre-tick population. A panic
    /// in any worker aborts the tick before the buffers are swapped.
    #[cfg(feature = "parallel")]
    fn update_parallel(&mut self) -> Result<(), SimulationError> {
        use std::panic::{self, AssertUnwindSafe};

        #[cfg(test)]
        let fault_at = self.fault_at;
        let Self { agents, staging, params, bounds, boundary, pool, .. } = self;
        staging.clear();
        staging.extend_from_slice(agents);

        let threads = pool.as_ref().map_or_else(rayon::current_num_threads, |p| p.current_num_threads());
        let chunk_size = (agents.len() / threads).max(1);
        let current: &[Agent] = agents;
        let targets: &mut [Agent] = staging;
        let (params, bounds, boundary) = (*params, *bounds, *boundary);
        let radius = params.neighbor_radius();

        let update_one = move |i: usize, slot: &mut Agent, neighbors: &mut Vec<usize>| {
            #[cfg(test)]
            if fault_at == Some(i) {
                panic!("injected fault at agent {i}");
            }
            neighbors_within_into(radius, i, current, neighbors);
            slot.update(current, neighbors, &params, &bounds, boundary);
        };
        let mut work = move || update_chunks(targets, chunk_size, update_one);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match pool.as_ref() {
            Some(pool) => pool.install(work),
            None => work(),
        }));
        if let Err(payload) = outcome {
            return Err(SimulationError::WorkerPanicked(panic_message(&*payload)));
        }

        std::mem::swap(agents, staging);
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn update_parallel(&mut self) -> Result<(), SimulationError> {
        self.update_sequential();
        Ok(())
    }
}

#[cfg(feature = "parallel")]
fn update_chunks<F>(targets: &mut [Agent], chunk_size: usize, update_one: F)
where
    F: Fn(usize, &mut Agent, &mut Vec<usize>) + Sync,
{
    use rayon::prelude::*;

    targets.par_chunks_mut(chunk_size).enumerate().for_each(|(chunk_idx, chunk)| {
        let mut neighbors = Vec::new();
        for (offset, slot) in chunk.iter_mut().enumerate() {
            update_one(chunk_idx * chunk_size + offset, slot, &mut neighbors);
        }
    });
}

#[cfg(feature = "parallel")]
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
