//! CPU geometry for axis-aligned rectangular prisms.
//!
//! Faces come out in the order +x, −x, +y, −y, +z, −z, one quad per face, so
//! each can be given its own material. Winding is counter-clockwise seen from
//! outside the box, and texture coordinates put the image's top row at the
//! face's "up" edge.

use crate::data_structures::model::ModelVertex;

pub const FACE_COUNT: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; FACE_COUNT] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrismDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl PrismDimensions {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceGeometry {
    pub face: Face,
    pub vertices: [ModelVertex; 4],
    pub indices: [u32; 6],
}

/// Axis assignment for one face: which coordinate the quad's u and v run
/// along, which one it is offset on, and in which direction.
struct Plane {
    u: usize,
    v: usize,
    w: usize,
    u_dir: f32,
    v_dir: f32,
    extent_u: f32,
    extent_v: f32,
    offset_w: f32,
}

fn planes(dims: PrismDimensions) -> [Plane; FACE_COUNT] {
    let PrismDimensions {
        width,
        height,
        depth,
    } = dims;
    let plane = |u, v, w, u_dir, v_dir, extent_u, extent_v, offset_w| Plane {
        u,
        v,
        w,
        u_dir,
        v_dir,
        extent_u,
        extent_v,
        offset_w,
    };
    [
        plane(2, 1, 0, -1.0, -1.0, depth, height, width),
        plane(2, 1, 0, 1.0, -1.0, depth, height, -width),
        plane(0, 2, 1, 1.0, 1.0, width, depth, height),
        plane(0, 2, 1, 1.0, -1.0, width, depth, -height),
        plane(0, 1, 2, 1.0, -1.0, width, height, depth),
        plane(0, 1, 2, -1.0, -1.0, width, height, -depth),
    ]
}

/// Build the six faces of a prism centered on the origin.
pub fn prism_faces(dims: PrismDimensions) -> [FaceGeometry; FACE_COUNT] {
    let planes = planes(dims);
    std::array::from_fn(|idx| {
        let plane = &planes[idx];
        let mut normal = [0.0; 3];
        normal[plane.w] = plane.offset_w.signum();
        let vertices = std::array::from_fn(|corner| {
            let (ix, iy) = ((corner % 2) as f32, (corner / 2) as f32);
            let mut position = [0.0; 3];
            position[plane.u] = (ix * plane.extent_u - plane.extent_u / 2.0) * plane.u_dir;
            position[plane.v] = (iy * plane.extent_v - plane.extent_v / 2.0) * plane.v_dir;
            position[plane.w] = plane.offset_w / 2.0;
            ModelVertex {
                position,
                tex_coords: [ix, iy],
                normal,
            }
        });
        FaceGeometry {
            face: Face::ALL[idx],
            vertices,
            indices: [0, 2, 1, 2, 3, 1],
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    fn vec(p: [f32; 3]) -> Vector3<f32> {
        Vector3::new(p[0], p[1], p[2])
    }

    #[test]
    fn normals_point_outward_in_face_order() {
        let faces = prism_faces(PrismDimensions::new(2.0, 0.2, 1.0));
        let expected = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        for (face, normal) in faces.iter().zip(expected) {
            assert_eq!(face.vertices[0].normal, normal, "{:?}", face.face);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        for face in prism_faces(PrismDimensions::new(2.0, 0.2, 1.0)) {
            for tri in face.indices.chunks(3) {
                let a = vec(face.vertices[tri[0] as usize].position);
                let b = vec(face.vertices[tri[1] as usize].position);
                let c = vec(face.vertices[tri[2] as usize].position);
                let facing = (b - a).cross(c - a);
                let normal = vec(face.vertices[0].normal);
                assert!(facing.dot(normal) > 0.0, "{:?} winds inward", face.face);
            }
        }
    }

    #[test]
    fn vertices_lie_on_the_box_surface() {
        let dims = PrismDimensions::new(0.2, 0.2, 1.0);
        for face in prism_faces(dims) {
            for vertex in face.vertices.iter() {
                let [x, y, z] = vertex.position;
                assert!((x.abs() - 0.1).abs() < 1e-6);
                assert!((y.abs() - 0.1).abs() < 1e-6);
                assert!((z.abs() - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn texture_covers_each_face_once() {
        for face in prism_faces(PrismDimensions::new(2.0, 0.2, 1.0)) {
            let mut uvs: Vec<[f32; 2]> = face.vertices.iter().map(|v| v.tex_coords).collect();
            uvs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(uvs, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
        }
    }

    #[test]
    fn bottom_face_reads_left_to_right_with_top_row_at_positive_z() {
        let faces = prism_faces(PrismDimensions::new(2.0, 0.2, 1.0));
        let bottom = &faces[Face::NegY.index()];
        for vertex in bottom.vertices.iter() {
            let [u, v] = vertex.tex_coords;
            let [x, _, z] = vertex.position;
            assert_eq!(u == 0.0, x < 0.0);
            assert_eq!(v == 0.0, z > 0.0);
        }
    }
}
