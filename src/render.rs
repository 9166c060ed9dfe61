//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which flows use to describe what
//! they want drawn this frame. The engine sorts the requests into batches per
//! pipeline: backdrops first, then textured models.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering (model + instance buffer)
//! - [`Flat<'a>`] contains data for full-screen textured quads (vertex + index buffers)
//!

use crate::data_structures::{model::Model, scene_graph::SceneNode};

/// Data for instanced object rendering: a model and its instance buffer.
///
/// The instance buffer holds one model matrix per instance.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Data for flat rendering: vertex and index buffers with a texture bind group.
///
/// Vertices are given in clip space, so a flat quad ignores the camera.
#[derive(Clone)]
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub group: &'a wgpu::BindGroup,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Defaults(Vec<Instanced>)` renders a batch of opaque instanced objects
/// - `Backdrop(Flat)` renders a full-screen image behind everything else
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
///
pub enum Render<'a> {
    None,
    Defaults(Vec<Instanced<'a>>),
    Backdrop(Flat<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Sort this request into the per-pipeline batches.
    pub(crate) fn batch(self, basics: &mut Vec<Instanced<'a>>, backdrops: &mut Vec<Flat<'a>>) {
        match self {
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Backdrop(flat) => backdrops.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.batch(basics, backdrops)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(sn: &'a dyn SceneNode) -> Self {
        Render::Defaults(sn.get_render())
    }
}
