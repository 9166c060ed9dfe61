//! What is drawn behind the sign.
//!
//! The white backdrop is just the clear colour. The other two are full-screen
//! quads: a blurred in-game screenshot loaded from the assets and a radial
//! gradient generated on the CPU.

use std::{fmt, str::FromStr};

use image::{Rgba, RgbaImage};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::model::Material,
    error::SignError,
    pipelines::backdrop::{FULL_SCREEN_INDICES, FULL_SCREEN_QUAD},
    render::{Flat, Render},
    resources::texture::material_from_image,
};

/// Edge length of the generated gradient image.
pub const GRADIENT_SIZE: u32 = 512;

const GRADIENT_STOPS: [(f32, [u8; 3]); 2] = [(0.08, [238, 211, 174]), (1.0, [148, 233, 200])];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Backdrop {
    #[default]
    White,
    InGame,
    Gradient,
}

impl Backdrop {
    pub const ALL: [Backdrop; 3] = [Backdrop::White, Backdrop::InGame, Backdrop::Gradient];

    pub fn id(&self) -> &'static str {
        match self {
            Backdrop::White => "white",
            Backdrop::InGame => "in game",
            Backdrop::Gradient => "gradient",
        }
    }

    /// The backdrop after this one, wrapping around.
    pub fn next(&self) -> Backdrop {
        let idx = Backdrop::ALL.iter().position(|b| b == self).unwrap_or(0);
        Backdrop::ALL[(idx + 1) % Backdrop::ALL.len()]
    }
}

impl FromStr for Backdrop {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backdrop::ALL
            .into_iter()
            .find(|backdrop| backdrop.id() == s)
            .ok_or_else(|| SignError::UnknownBackdrop(s.to_string()))
    }
}

impl fmt::Display for Backdrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A `size` x `size` radial gradient centred in the image, reaching its
/// outer colour at half the edge length.
pub fn radial_gradient(size: u32) -> RgbaImage {
    let centre = size as f32 / 2.0;
    let radius = centre.max(f32::EPSILON);
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - centre;
        let dy = y as f32 + 0.5 - centre;
        let t = (dx * dx + dy * dy).sqrt() / radius;
        gradient_colour(t)
    })
}

fn gradient_colour(t: f32) -> Rgba<u8> {
    let [(start, inner), (end, outer)] = GRADIENT_STOPS;
    let f = ((t - start) / (end - start)).clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
    Rgba([
        mix(inner[0], outer[0]),
        mix(inner[1], outer[1]),
        mix(inner[2], outer[2]),
        255,
    ])
}

/// A backdrop image uploaded as a full-screen quad.
pub struct BackdropQuad {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    material: Material,
}

impl BackdropQuad {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, image: &RgbaImage, name: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&FULL_SCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", name)),
            contents: bytemuck::cast_slice(&FULL_SCREEN_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let material =
            material_from_image(device, queue, image, name, wgpu::AddressMode::ClampToEdge);
        Self {
            vertex,
            index,
            material,
        }
    }

    pub fn render(&self) -> Render<'_> {
        Render::Backdrop(Flat {
            vertex: &self.vertex,
            index: &self.index,
            group: &self.material.bind_group,
            amount: FULL_SCREEN_INDICES.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_visits_every_backdrop_once() {
        let mut seen = vec![Backdrop::White];
        let mut current = Backdrop::White.next();
        while current != Backdrop::White {
            seen.push(current);
            current = current.next();
        }
        assert_eq!(seen, Backdrop::ALL);
    }

    #[test]
    fn ids_parse_back_and_unknown_is_rejected() {
        for backdrop in Backdrop::ALL {
            assert_eq!(backdrop.id().parse::<Backdrop>().unwrap(), backdrop);
        }
        assert!(matches!(
            "sunset".parse::<Backdrop>(),
            Err(SignError::UnknownBackdrop(id)) if id == "sunset"
        ));
    }

    #[test]
    fn gradient_centre_and_corner_colours() {
        let image = radial_gradient(GRADIENT_SIZE);
        assert_eq!(image.dimensions(), (GRADIENT_SIZE, GRADIENT_SIZE));
        let centre = GRADIENT_SIZE / 2;
        assert_eq!(*image.get_pixel(centre, centre), Rgba([238, 211, 174, 255]));
        // Corners lie beyond the radius and take the outer stop.
        assert_eq!(*image.get_pixel(0, 0), Rgba([148, 233, 200, 255]));
        assert_eq!(
            *image.get_pixel(GRADIENT_SIZE - 1, GRADIENT_SIZE - 1),
            Rgba([148, 233, 200, 255])
        );
    }

    #[test]
    fn gradient_is_radially_symmetric() {
        let image = radial_gradient(64);
        for (x, y) in [(5, 20), (10, 40), (31, 2)] {
            let pixel = image.get_pixel(x, y);
            assert_eq!(pixel, image.get_pixel(63 - x, y));
            assert_eq!(pixel, image.get_pixel(x, 63 - y));
            assert_eq!(pixel, image.get_pixel(y, x));
        }
    }

    #[test]
    fn gradient_moves_towards_the_outer_stop() {
        let image = radial_gradient(GRADIENT_SIZE);
        let row = GRADIENT_SIZE / 2;
        let reds: Vec<u8> = (0..=row).rev().map(|x| image.get_pixel(x, row)[0]).collect();
        assert!(reds.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
