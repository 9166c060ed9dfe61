//! signwright
//!
//! A live 3D configurator for a wooden sign. The user picks the wood, the
//! size, whether the sign stands on a pole and up to four lines of text; the
//! sign is rebuilt and redrawn after every change. Runs natively and in the
//! browser.
//!
//! High-level modules
//! - `sign`: configuration values, label typesetting, prism geometry and the
//!   rebuild logic that keeps the shown sign in step with the configuration
//! - `configurator`: the flow that connects keyboard, sign model and assets
//! - `controls`: key mapping and the four-line text editor
//! - `backdrop`: white, in-game and gradient backgrounds
//! - `camera`: damped orbit camera, projection and uniforms
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: engine data models (meshes, instances, textures)
//! - `flow`: high level flow control (event loop, lifecycle hooks)
//! - `pipelines`: the textured model pipeline and the backdrop pipeline
//! - `resources`: helpers to load assets and create GPU resources
//! - `render`: render composition for efficient pipeline reuse
//! - `settings` / `error`: startup configuration and the error taxonomy
//!

pub mod backdrop;
pub mod camera;
pub mod configurator;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod settings;
pub mod sign;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    configurator::run(settings::Settings::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}
