#![cfg(target_arch = "wasm32")]

use crate::config::{FlockParams, SimulationConfig};
use crate::math::Vector2D;
use crate::sim::{ExecutionMode, FlockSimulation, TickReport};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn flock_defaults() -> JsValue {
    let params = FlockParams::default();
    serde_wasm_bindgen::to_value(&params).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub fn simulation_defaults() -> JsValue {
    let config = SimulationConfig::default();
    serde_wasm_bindgen::to_value(&config).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub struct WasmFlock {
    sim: FlockSimulation,
    last: Option<TickReport>,
}

#[wasm_bindgen]
impl WasmFlock {
    #[wasm_bindgen(constructor)]
    pub fn new(agent_count: usize, width: f64, height: f64, seed: u64) -> Result<WasmFlock, JsValue> {
        let mut config = SimulationConfig { agent_count, rng_seed: Some(seed), ..SimulationConfig::default() };
        config.bounds.width = width;
        config.bounds.height = height;
        let sim = FlockSimulation::new(config).map_err(to_js)?;
        Ok(WasmFlock { sim, last: None })
    }

    /// Build from a config object shaped like `SimulationConfig`:
    /// {
    ///   agent_count?: number,
    ///   bounds?: { width, height },
    ///   params?: { max_speed?, separation_radius?, ... },
    ///   boundary?: "wrap" | "reflect",
    ///   rng_seed?: number,
    /// }
    #[wasm_bindgen(js_name = "newFromConfig")]
    pub fn new_from_config(config: JsValue) -> Result<WasmFlock, JsValue> {
        let config: SimulationConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
        let sim = FlockSimulation::new(config).map_err(to_js)?;
        Ok(WasmFlock { sim, last: None })
    }

    pub fn len(&self) -> usize {
        self.sim.len()
    }

    #[wasm_bindgen(js_name = "setParallel")]
    pub fn set_parallel(&mut self, enabled: bool) {
        self.sim.set_mode(mode_for(enabled));
        self.last = None;
    }

    /// Step once in the persisted mode and return flat `[x0, y0, x1, y1, ...]`.
    pub fn step(&mut self) -> Result<Vec<f32>, JsValue> {
        let report = self.sim.step().map_err(to_js)?;
        Ok(self.remember(report))
    }

    /// Step once in the given mode and return flat `[x0, y0, x1, y1, ...]`.
    pub fn tick(&mut self, parallel: bool) -> Result<Vec<f32>, JsValue> {
        let report = self.sim.tick(mode_for(parallel)).map_err(to_js)?;
        Ok(self.remember(report))
    }

    pub fn positions(&self) -> Vec<f32> {
        flatten(&self.sim.positions())
    }

    #[wasm_bindgen(js_name = "averageTickMs")]
    pub fn average_tick_ms(&self) -> f64 {
        self.sim.average_recent_tick_duration()
    }

    /// Status line for the shell, e.g. `Average Frame Time: 0.42 ms (Serial)`.
    /// Labels the mode the last tick actually ran in.
    pub fn status(&self) -> String {
        match &self.last {
            Some(report) => report.to_string(),
            None => format!(
                "Average Frame Time: {:.2} ms ({})",
                self.sim.average_recent_tick_duration(),
                self.sim.mode().label()
            ),
        }
    }

    pub fn set_flock_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params: FlockParams = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("invalid flock params: {}", e)))?;
        self.sim.set_params(params).map_err(to_js)
    }
}

impl WasmFlock {
    fn remember(&mut self, report: TickReport) -> Vec<f32> {
        let flat = flatten(&report.positions);
        self.last = Some(report);
        flat
    }
}

fn mode_for(parallel: bool) -> ExecutionMode {
    if parallel { ExecutionMode::Parallel } else { ExecutionMode::Sequential }
}

fn flatten(positions: &[Vector2D]) -> Vec<f32> {
    let mut out = Vec::with_capacity(positions.len() * 2);
    for p in positions {
        out.push(p.x as f32);
        out.push(p.y as f32);
    }
    out
}

fn to_js(err: crate::error::SimulationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
