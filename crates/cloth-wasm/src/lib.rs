use cloth_core::{ClothConfig, ClothSimulator, ClothVertex};
use wasm_bindgen::prelude::*;

/// Browser-facing cloth driver.
///
/// Steps the simulator once per frame and keeps a GPU-ready vertex buffer
/// and a static index buffer that JS reads straight out of wasm memory.
#[wasm_bindgen]
pub struct ClothWorld {
    sim: ClothSimulator,
    vertex_buffer: Vec<ClothVertex>,
    index_buffer: Vec<u32>,
}

#[wasm_bindgen]
impl ClothWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(grid_size: usize) -> Result<ClothWorld, JsValue> {
        let sim = ClothSimulator::new(ClothConfig::with_grid_size(grid_size))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        web_sys::console::log_1(
            &format!(
                "WASM ClothWorld created: {}x{} particles, {} constraints",
                grid_size,
                grid_size,
                sim.constraints().len()
            )
            .into(),
        );

        Ok(ClothWorld {
            vertex_buffer: sim.vertices(),
            index_buffer: sim.indices(),
            sim,
        })
    }

    /// Advance one frame with the stored time step. Returns elapsed ms.
    #[wasm_bindgen]
    pub fn step(&mut self) -> f32 {
        let start = js_sys::Date::now();
        self.sim.advance();
        self.write_vertex_output();
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    /// Restart from the flat cloth, syncing the time step to `fps` when known.
    #[wasm_bindgen]
    pub fn reset(&mut self, fps: f32) {
        if fps > 0.0 {
            if let Err(e) = self.sim.set_time_step(1.0 / fps) {
                web_sys::console::warn_1(&e.to_string().into());
            }
        }
        self.sim.initialize();
        self.write_vertex_output();
    }

    #[wasm_bindgen]
    pub fn set_gravity(&mut self, x: f32, y: f32, z: f32) -> Result<(), JsValue> {
        self.sim
            .set_gravity(glam::Vec3::new(x, y, z))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn set_iterations(&mut self, iterations: u32) -> Result<(), JsValue> {
        self.sim
            .set_iterations(iterations)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn set_pin_anchor(&mut self, pin: bool) {
        self.sim.set_pin_anchor(pin);
    }

    #[wasm_bindgen]
    pub fn time_step(&self) -> f32 {
        self.sim.time_step()
    }

    /// `[x, y, z]` of the centre particle, for the camera look-at.
    #[wasm_bindgen]
    pub fn anchor_position(&self) -> Vec<f32> {
        self.sim.anchor_position().to_array().to_vec()
    }

    /// `[x, y, z, radius]` of the collision sphere, for drawing it.
    #[wasm_bindgen]
    pub fn sphere(&self) -> Vec<f32> {
        let sphere = self.sim.sphere();
        let c = sphere.center;
        vec![c.x, c.y, c.z, sphere.radius]
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.sim.particle_count()
    }

    #[wasm_bindgen]
    pub fn get_vertex_buffer_ptr(&self) -> *const f32 {
        self.vertex_buffer.as_ptr() as *const f32
    }

    #[wasm_bindgen]
    pub fn get_vertex_buffer_byte_length(&self) -> usize {
        bytemuck::cast_slice::<ClothVertex, u8>(&self.vertex_buffer).len()
    }

    #[wasm_bindgen]
    pub fn get_index_buffer_ptr(&self) -> *const u32 {
        self.index_buffer.as_ptr()
    }

    #[wasm_bindgen]
    pub fn index_count(&self) -> usize {
        self.index_buffer.len()
    }
}

impl ClothWorld {
    fn write_vertex_output(&mut self) {
        if let Err(e) = self.sim.fill_vertex_buffer(&mut self.vertex_buffer) {
            web_sys::console::error_1(&e.to_string().into());
        }
    }
}
