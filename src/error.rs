use thiserror::Error;

/// Errors raised while building or stepping a flock.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// The configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The dedicated worker pool could not be created.
    #[cfg(feature = "parallel")]
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// A worker faulted during the parallel update phase. The population is
    /// left at its pre-tick state.
    #[error("parallel update aborted: {0}")]
    WorkerPanicked(String),
}
