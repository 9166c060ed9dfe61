//! Render pipelines owned by the [`Context`](crate::context::Context).
//!
//! - `basic` draws unlit textured models (plank and pole faces)
//! - `backdrop` draws a full-screen image behind the scene

pub mod backdrop;
pub mod basic;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub backdrop: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(device, config, camera_bind_group_layout),
            backdrop: backdrop::mk_backdrop_pipeline(device, config),
        }
    }
}
