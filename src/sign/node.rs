//! GPU side of a rendered sign.
//!
//! A [`SignNode`] is a container group in the scene graph. Showing a
//! blueprint replaces every child wholesale: one model node for the plank and,
//! if present, one for the pole, each with a mesh per face.

use crate::{
    data_structures::{
        model::{Material, Mesh, Model},
        scene_graph::{ContainerNode, ModelNode, SceneNode},
        texture::Texture,
    },
    render::Render,
    resources::texture::diffuse_layout,
    sign::{
        blueprint::{FaceMaterial, PrismBlueprint, SignBlueprint},
        prism::prism_faces,
    },
};

const WOOD_MATERIAL: usize = 0;
const LABEL_MATERIAL: usize = 1;

pub struct SignNode {
    group: ContainerNode,
}

impl Default for SignNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SignNode {
    pub fn new() -> Self {
        Self {
            group: ContainerNode::new(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.group.get_children().is_empty()
    }

    /// Remove plank and pole. Their GPU buffers are released with them.
    pub fn discard(&mut self) {
        self.group.clear_children();
    }

    /// Replace whatever is shown with `blueprint`.
    pub fn show(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, blueprint: &SignBlueprint) {
        self.discard();
        let wood = Texture::from_rgba(
            device,
            queue,
            &blueprint.wood,
            &format!("wood_{}", blueprint.wood_texture),
            wgpu::AddressMode::Repeat,
        );
        let label = Texture::from_rgba(
            device,
            queue,
            &blueprint.label.image,
            "sign_label",
            wgpu::AddressMode::ClampToEdge,
        );

        let plank = prism_node(device, "plank", &blueprint.plank, &wood, &label);
        self.group.add_child(Box::new(plank));
        if let Some(pole) = &blueprint.pole {
            self.group
                .add_child(Box::new(prism_node(device, "pole", pole, &wood, &label)));
        }
        self.group.update_world_transform_all();
        self.group.write_to_buffers(queue, device);
    }

    pub fn render(&self) -> Render<'_> {
        if self.is_empty() {
            return Render::None;
        }
        Render::from(&self.group as &dyn SceneNode)
    }
}

fn prism_node(
    device: &wgpu::Device,
    name: &str,
    prism: &PrismBlueprint,
    wood: &Texture,
    label: &Texture,
) -> ModelNode {
    let layout = diffuse_layout(device);
    let mut materials = vec![Material::new(
        device,
        &format!("{}_wood", name),
        wood.clone(),
        &layout,
    )];
    if prism.uses_label() {
        materials.push(Material::new(
            device,
            &format!("{}_label", name),
            label.clone(),
            &layout,
        ));
    }

    let meshes = prism_faces(prism.dimensions)
        .iter()
        .map(|face| {
            let material = match prism.faces[face.face.index()] {
                FaceMaterial::Wood => WOOD_MATERIAL,
                FaceMaterial::Label => LABEL_MATERIAL,
            };
            Mesh::new(
                device,
                &format!("{}_{:?}", name, face.face),
                &face.vertices,
                &face.indices,
                material,
            )
        })
        .collect();

    let mut node = ModelNode::from_model(1, device, Model { meshes, materials });
    node.set_local_transform(0, prism.transform.clone());
    node
}
