//! WebAssembly bindings for the sandbox.
//!
//! Provides a thin wrapper around `Simulation` for browser environments.

use wasm_bindgen::prelude::*;

use crate::{
    compute::{Simulation, Tool},
    schema::{CellKind, Seed, SimulationConfig},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// WebAssembly wrapper for the sandbox simulation.
#[wasm_bindgen]
pub struct WasmSimulation {
    sim: Simulation,
}

#[wasm_bindgen]
impl WasmSimulation {
    /// Create new simulation from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing SimulationConfig
    /// * `seed_json` - JSON string containing Seed
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, seed_json: &str) -> Result<WasmSimulation, JsValue> {
        let config = SimulationConfig::from_json_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        let seed: Seed = serde_json::from_str(seed_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid seed JSON: {e}")))?;

        let sim = Simulation::new(config, &seed)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        Ok(WasmSimulation { sim })
    }

    /// Perform one simulation step.
    #[wasm_bindgen]
    pub fn step(&mut self) {
        self.sim.step();
    }

    /// Run multiple simulation steps.
    #[wasm_bindgen]
    pub fn run(&mut self, steps: u64) {
        self.sim.run(steps);
    }

    /// Run steps, then refresh colors and light.
    #[wasm_bindgen]
    pub fn frame(&mut self, steps: u64) {
        self.sim.frame(steps);
    }

    #[wasm_bindgen(js_name = updateColor)]
    pub fn update_color(&mut self) {
        self.sim.update_color();
    }

    #[wasm_bindgen(js_name = updateLight)]
    pub fn update_light(&mut self) {
        self.sim.update_light();
    }

    /// Paint a cell kind (by type byte) around world `(x, y)`.
    #[wasm_bindgen]
    pub fn paint(&mut self, x: i32, y: i32, kind: u8) -> Result<(), JsValue> {
        let kind = CellKind::try_from(kind).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.sim.paint(x, y, Tool::Paint(kind));
        Ok(())
    }

    /// Erase around world `(x, y)`.
    #[wasm_bindgen]
    pub fn erase(&mut self, x: i32, y: i32) {
        self.sim.paint(x, y, Tool::Erase);
    }

    #[wasm_bindgen(js_name = setBrushSize)]
    pub fn set_brush_size(&mut self, size: f32) -> Result<(), JsValue> {
        self.sim
            .set_brush_size(size)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Empty the world.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.sim.clear();
    }

    /// Reset simulation with new seed.
    #[wasm_bindgen]
    pub fn reset(&mut self, seed_json: &str) -> Result<(), JsValue> {
        let seed: Seed = serde_json::from_str(seed_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid seed JSON: {e}")))?;
        self.sim.reset(&seed);
        Ok(())
    }

    /// RGB color buffer (3 bytes per cell, top row first).
    #[wasm_bindgen(js_name = getColors)]
    pub fn get_colors(&self) -> Vec<u8> {
        self.sim.grid().colors.clone()
    }

    /// Light level buffer (1 byte per cell, top row first).
    #[wasm_bindgen(js_name = getLight)]
    pub fn get_light(&self) -> Vec<u8> {
        self.sim.grid().light.clone()
    }

    /// Cell type buffer (1 byte per cell, top row first).
    #[wasm_bindgen(js_name = getCells)]
    pub fn get_cells(&self) -> Vec<u8> {
        self.sim.grid().cells.clone()
    }

    /// Get simulation statistics as JSON.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.sim.stats())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get total water mass.
    #[wasm_bindgen(js_name = totalMass)]
    pub fn total_mass(&self) -> f32 {
        self.sim.grid().total_mass()
    }

    /// Get current step count.
    #[wasm_bindgen(js_name = getStep)]
    pub fn get_step(&self) -> u64 {
        self.sim.step_count()
    }

    /// Get grid width.
    #[wasm_bindgen(js_name = getWidth)]
    pub fn get_width(&self) -> usize {
        self.sim.grid().width
    }

    /// Get grid height.
    #[wasm_bindgen(js_name = getHeight)]
    pub fn get_height(&self) -> usize {
        self.sim.grid().height
    }
}
