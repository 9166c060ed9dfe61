//! The pure half of a rebuild: configuration plus wood image in, a complete
//! description of the plank, the pole and the label surface out.
//!
//! Nothing here touches the GPU, so two blueprints built from the same input
//! compare equal and can be checked in plain unit tests.

use std::{f32::consts::FRAC_PI_2, sync::Arc};

use cgmath::{Quaternion, Rad, Rotation3, Vector3};
use image::RgbaImage;

use crate::{
    data_structures::instance::Instance,
    sign::{
        config::{SignConfiguration, SignSize, WoodTexture},
        label::{ComposedLabel, compose_label},
        prism::{FACE_COUNT, Face, PrismDimensions},
        typeset::Typesetter,
    },
};

pub const PLANK: PrismDimensions = PrismDimensions::new(2.0, 0.2, 1.0);
pub const POLE: PrismDimensions = PrismDimensions::new(0.2, 0.2, 1.0);
/// After the sign rotation this face looks at the camera.
pub const LABEL_FACE: Face = Face::NegY;
/// Tilt around the plank's own z axis, in radians.
pub const TILT: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceMaterial {
    Wood,
    Label,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrismBlueprint {
    pub dimensions: PrismDimensions,
    pub transform: Instance,
    pub faces: [FaceMaterial; FACE_COUNT],
}

impl PrismBlueprint {
    pub fn uses_label(&self) -> bool {
        self.faces.contains(&FaceMaterial::Label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignBlueprint {
    pub wood_texture: WoodTexture,
    pub wood: Arc<RgbaImage>,
    pub label: ComposedLabel,
    pub plank: PrismBlueprint,
    pub pole: Option<PrismBlueprint>,
}

/// Rotation shared by plank and pole: a quarter turn back around x, then the
/// tilt around z.
pub fn sign_rotation() -> Quaternion<f32> {
    Quaternion::from_angle_x(Rad(-FRAC_PI_2)) * Quaternion::from_angle_z(Rad(TILT))
}

pub fn scale_for(size: SignSize, base_scale: f32) -> f32 {
    base_scale * size.factor()
}

/// Build everything a rebuild needs from `config` and an already loaded wood
/// image. The label surface is kept within `max_texture_side` on both axes.
pub fn build_blueprint(
    config: &SignConfiguration,
    wood: Arc<RgbaImage>,
    base_scale: f32,
    magnification: u32,
    max_texture_side: u32,
    typesetter: &mut dyn Typesetter,
) -> SignBlueprint {
    let label = compose_label(
        &wood,
        magnification,
        max_texture_side,
        config.text.lines(),
        typesetter,
    );
    let scale = scale_for(config.size, base_scale);
    let rotation = sign_rotation();

    let mut plank_faces = [FaceMaterial::Wood; FACE_COUNT];
    plank_faces[LABEL_FACE.index()] = FaceMaterial::Label;
    let plank = PrismBlueprint {
        dimensions: PLANK,
        transform: Instance {
            rotation,
            ..Instance::default()
        }
        .with_uniform_scale(scale),
        faces: plank_faces,
    };

    let pole = config.show_pole.then(|| PrismBlueprint {
        dimensions: POLE,
        transform: Instance {
            position: Vector3::new(0.0, -scale, 0.0),
            rotation,
            ..Instance::default()
        }
        .with_uniform_scale(scale),
        faces: [FaceMaterial::Wood; FACE_COUNT],
    });

    SignBlueprint {
        wood_texture: config.wood,
        wood,
        label,
        plank,
        pole,
    }
}
