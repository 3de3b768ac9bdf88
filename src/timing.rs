use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window over the most recent tick durations, in milliseconds.
/// Oldest entries are evicted first once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct TickTimings {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl TickTimings {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { samples: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.record_millis(elapsed.as_secs_f64() * 1_000.0);
    }

    pub fn record_millis(&mut self, millis: f64) {
        self.samples.push_back(millis);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Arithmetic mean of the retained samples; 0 when nothing has been recorded.
    pub fn average_millis(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Samples from oldest to newest.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

/// Wall-clock stopwatch. `std::time::Instant` panics on wasm32, so the
/// browser clock is used there instead.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    start_ms: f64,
}

impl Stopwatch {
    pub(crate) fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
            #[cfg(target_arch = "wasm32")]
            start_ms: js_sys::Date::now(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.start.elapsed()
        }
        #[cfg(target_arch = "wasm32")]
        {
            let ms = (js_sys::Date::now() - self.start_ms).max(0.0);
            Duration::from_secs_f64(ms / 1_000.0)
        }
    }
}
