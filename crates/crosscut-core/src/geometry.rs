//! Primitive mesh builders.
//!
//! All solids are centered on the origin with Y as the vertical axis and
//! counter-clockwise winding facing outward. Faceted solids carry flat face
//! normals; the cone family carries smooth slant normals. Edge meshes are
//! line lists drawn over the translucent surfaces.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::presets::ObjectKind;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    TriangleList,
    LineList,
}

/// CPU-side mesh: the renderer uploads this once and afterwards only sees an
/// opaque buffer handle plus the element count.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Option<Vec<u16>>,
    pub topology: Topology,
}

impl MeshData {
    pub fn element_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertices.len() as u32,
        }
    }
}

/// Corner order shared by the box-like builders:
/// bit 0 = +x, bit 1 = +y, bit 2 = +z.
const BOX_FACE_INDICES: [[usize; 4]; 6] = [
    [3, 7, 5, 1], // right
    [6, 2, 0, 4], // left
    [6, 7, 3, 2], // top
    [0, 1, 5, 4], // bottom
    [7, 6, 4, 5], // front
    [2, 3, 1, 0], // back
];

const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1], [1, 3], [3, 2], [2, 0], // -z face loop
    [4, 5], [5, 7], [7, 6], [6, 4], // +z face loop
    [0, 4], [1, 5], [3, 7], [2, 6], // connecting edges
];

fn box_corners(half_x: f32, half_y: f32, half_z: f32) -> [Vec3; 8] {
    [
        Vec3::new(-half_x, -half_y, -half_z),
        Vec3::new(half_x, -half_y, -half_z),
        Vec3::new(-half_x, half_y, -half_z),
        Vec3::new(half_x, half_y, -half_z),
        Vec3::new(-half_x, -half_y, half_z),
        Vec3::new(half_x, -half_y, half_z),
        Vec3::new(-half_x, half_y, half_z),
        Vec3::new(half_x, half_y, half_z),
    ]
}

fn quad_faces(corners: &[Vec3; 8], normals: &[Vec3; 6]) -> MeshData {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (f, face) in BOX_FACE_INDICES.iter().enumerate() {
        for &corner in face {
            vertices.push(Vertex {
                position: corners[corner].to_array(),
                normal: normals[f].to_array(),
            });
        }
        let offset = (4 * f) as u16;
        indices.extend_from_slice(&[offset, offset + 1, offset + 2, offset, offset + 2, offset + 3]);
    }
    MeshData {
        vertices,
        indices: Some(indices),
        topology: Topology::TriangleList,
    }
}

pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let corners = box_corners(width / 2.0, height / 2.0, depth / 2.0);
    let normals = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    quad_faces(&corners, &normals)
}

pub fn cube(size: f32) -> MeshData {
    cuboid(size, size, size)
}

/// Truncated rectangular pyramid; a cuboid with the top face shrunk. Also
/// covers cubes (`top == bottom`) and pyramids (`top == 0`).
pub fn truncated_pyramid(
    top_len: f32,
    top_wid: f32,
    bottom_len: f32,
    bottom_wid: f32,
    height: f32,
) -> MeshData {
    let (tx, tz) = (top_len / 2.0, top_wid / 2.0);
    let (bx, bz) = (bottom_len / 2.0, bottom_wid / 2.0);
    let hy = height / 2.0;
    let slant_xy = (bx - tx).atan2(height);
    let slant_yz = (bz - tz).atan2(height);
    let corners = [
        Vec3::new(-bx, -hy, -bz),
        Vec3::new(bx, -hy, -bz),
        Vec3::new(-tx, hy, -tz),
        Vec3::new(tx, hy, -tz),
        Vec3::new(-bx, -hy, bz),
        Vec3::new(bx, -hy, bz),
        Vec3::new(-tx, hy, tz),
        Vec3::new(tx, hy, tz),
    ];
    let normals = [
        Vec3::new(slant_xy.cos(), slant_xy.sin(), 0.0),
        Vec3::new(-slant_xy.cos(), slant_xy.sin(), 0.0),
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::new(0.0, slant_yz.sin(), slant_yz.cos()),
        Vec3::new(0.0, slant_yz.sin(), -slant_yz.cos()),
    ];
    quad_faces(&corners, &normals)
}

fn triangular_corners(top_len: f32, bottom_len: f32, height: f32) -> [Vec3; 6] {
    let theta = std::f32::consts::PI / 6.0;
    let tx = top_len / 2.0;
    let tz = tx * theta.tan();
    let bx = bottom_len / 2.0;
    let bz = bx * theta.tan();
    let hy = height / 2.0;
    [
        Vec3::new(-bx, -hy, bz),
        Vec3::new(bx, -hy, bz),
        Vec3::new(0.0, -hy, -bz * 2.0),
        Vec3::new(-tx, hy, tz),
        Vec3::new(tx, hy, tz),
        Vec3::new(0.0, hy, -tz * 2.0),
    ]
}

/// Truncated regular triangular pyramid; covers triangular prisms
/// (`top == bottom`) and triangular pyramids (`top == 0`).
pub fn truncated_triangular_pyramid(top_len: f32, bottom_len: f32, height: f32) -> MeshData {
    let theta = std::f32::consts::PI / 6.0;
    let tx = top_len / 2.0;
    let bx = bottom_len / 2.0;
    let slant = ((bx - tx) * theta.tan()).atan2(height);
    let corners = triangular_corners(top_len, bottom_len, height);
    // Triangle caps then three quads; counter-clockwise facing outward.
    let faces: [(&[usize], Vec3); 5] = [
        (&[3, 4, 5], Vec3::Y),
        (&[0, 2, 1], Vec3::NEG_Y),
        (&[0, 1, 4, 3], Vec3::new(0.0, slant.sin(), slant.cos())),
        (
            &[1, 2, 5, 4],
            Vec3::new(
                slant.cos() * theta.cos(),
                slant.sin(),
                -slant.cos() * theta.sin(),
            ),
        ),
        (
            &[2, 0, 3, 5],
            Vec3::new(
                -slant.cos() * theta.cos(),
                slant.sin(),
                -slant.cos() * theta.sin(),
            ),
        ),
    ];
    let mut vertices = Vec::with_capacity(18);
    let mut indices = Vec::with_capacity(24);
    for (face, normal) in faces {
        let offset = vertices.len() as u16;
        for &corner in face {
            vertices.push(Vertex {
                position: corners[corner].to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[offset, offset + 1, offset + 2]);
        if face.len() == 4 {
            indices.extend_from_slice(&[offset, offset + 2, offset + 3]);
        }
    }
    MeshData {
        vertices,
        indices: Some(indices),
        topology: Topology::TriangleList,
    }
}

/// Truncated cone with caps; covers cylinders (`top_r == bottom_r`) and
/// cones (`top_r == 0`). Rings run bottom cap, wall bottom, wall top, top
/// cap, with degenerate center rings closing the caps.
pub fn truncated_cone(top_r: f32, bottom_r: f32, height: f32, radial_divides: u32) -> MeshData {
    let radial = radial_divides.max(3);
    let slant = (bottom_r - top_r).atan2(height);
    let (sin_slant, cos_slant) = slant.sin_cos();

    let mut vertices = Vec::new();
    // Ring roles: -2/-1 bottom cap (center, rim), 0..=1 the wall, 2/3 top cap
    // (rim, center).
    for i in -2i32..=3 {
        let (y, ring_radius, normal_kind) = match i {
            -2 => (-height / 2.0, 0.0, RingNormal::Down),
            -1 => (-height / 2.0, bottom_r, RingNormal::Down),
            2 => (height / 2.0, top_r, RingNormal::Up),
            3 => (height / 2.0, 0.0, RingNormal::Up),
            _ => {
                let v = i as f32;
                (
                    height * v - height / 2.0,
                    bottom_r + (top_r - bottom_r) * v,
                    RingNormal::Wall,
                )
            }
        };
        for j in 0..=radial {
            let theta = j as f32 * std::f32::consts::TAU / radial as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = match normal_kind {
                RingNormal::Down => [0.0, -1.0, 0.0],
                RingNormal::Up => [0.0, 1.0, 0.0],
                RingNormal::Wall => [sin_theta * cos_slant, sin_slant, cos_theta * cos_slant],
            };
            vertices.push(Vertex {
                position: [sin_theta * ring_radius, y, cos_theta * ring_radius],
                normal,
            });
        }
    }

    let ring_stride = radial + 1;
    let mut indices = Vec::with_capacity((radial * 5 * 2 * 3) as usize);
    for i in 0..5u32 {
        for j in 0..radial {
            let a = (ring_stride * i + j) as u16;
            let b = (ring_stride * i + j + 1) as u16;
            let c = (ring_stride * (i + 1) + j + 1) as u16;
            let d = (ring_stride * (i + 1) + j) as u16;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    MeshData {
        vertices,
        indices: Some(indices),
        topology: Topology::TriangleList,
    }
}

enum RingNormal {
    Down,
    Up,
    Wall,
}

/// The cutting-plane quad in the XZ plane, normal +Y.
pub fn plane_quad(width: f32, depth: f32) -> MeshData {
    let hx = width / 2.0;
    let hz = depth / 2.0;
    let up = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex { position: [-hx, 0.0, -hz], normal: up },
        Vertex { position: [hx, 0.0, -hz], normal: up },
        Vertex { position: [-hx, 0.0, hz], normal: up },
        Vertex { position: [hx, 0.0, hz], normal: up },
    ];
    MeshData {
        vertices,
        indices: Some(vec![0, 2, 1, 1, 2, 3]),
        topology: Topology::TriangleList,
    }
}

fn line_mesh(points: Vec<Vec3>, segments: &[[usize; 2]]) -> MeshData {
    let vertices = points
        .into_iter()
        .map(|p| Vertex {
            position: p.to_array(),
            normal: [0.0, 1.0, 0.0],
        })
        .collect();
    let indices = segments
        .iter()
        .flat_map(|[a, b]| [*a as u16, *b as u16])
        .collect();
    MeshData {
        vertices,
        indices: Some(indices),
        topology: Topology::LineList,
    }
}

pub fn cuboid_edges(width: f32, height: f32, depth: f32) -> MeshData {
    let corners = box_corners(width / 2.0, height / 2.0, depth / 2.0);
    line_mesh(corners.to_vec(), &BOX_EDGES)
}

pub fn prism_edges(top_len: f32, bottom_len: f32, height: f32) -> MeshData {
    let corners = triangular_corners(top_len, bottom_len, height);
    const EDGES: [[usize; 2]; 9] = [
        [0, 1], [1, 2], [2, 0],
        [3, 4], [4, 5], [5, 3],
        [0, 3], [1, 4], [2, 5],
    ];
    line_mesh(corners.to_vec(), &EDGES)
}

/// Rim circles of a truncated cone (the top rim is skipped for a sharp
/// cone, where an apex point replaces it).
pub fn cone_edges(top_r: f32, bottom_r: f32, height: f32, radial_divides: u32) -> MeshData {
    let radial = radial_divides.max(3) as usize;
    let mut points = Vec::new();
    let mut segments = Vec::new();
    let mut push_rim = |points: &mut Vec<Vec3>, segments: &mut Vec<[usize; 2]>, r: f32, y: f32| {
        let base = points.len();
        for j in 0..radial {
            let theta = j as f32 * std::f32::consts::TAU / radial as f32;
            points.push(Vec3::new(theta.sin() * r, y, theta.cos() * r));
            segments.push([base + j, base + (j + 1) % radial]);
        }
    };
    push_rim(&mut points, &mut segments, bottom_r, -height / 2.0);
    if top_r > 0.0 {
        push_rim(&mut points, &mut segments, top_r, height / 2.0);
    }
    line_mesh(points, &segments)
}

const RADIAL_DIVIDES: u32 = 60;

/// The displayed solid for `kind`, sized from the characteristic `length`.
pub fn solid_mesh(kind: ObjectKind, length: f32) -> MeshData {
    match kind {
        ObjectKind::Cube => cube(length),
        ObjectKind::Cuboid => cuboid(length * 1.6, length, length),
        ObjectKind::Cylinder => truncated_cone(length / 2.0, length / 2.0, length, RADIAL_DIVIDES),
        ObjectKind::Cone => truncated_cone(0.0, length / 2.0, length, RADIAL_DIVIDES),
        ObjectKind::TruncatedCone => {
            truncated_cone(length / 4.0, length / 2.0, length, RADIAL_DIVIDES)
        }
        ObjectKind::Prism => truncated_triangular_pyramid(length, length, length),
    }
}

/// The wireframe companion to [`solid_mesh`].
pub fn edge_mesh(kind: ObjectKind, length: f32) -> MeshData {
    match kind {
        ObjectKind::Cube => cuboid_edges(length, length, length),
        ObjectKind::Cuboid => cuboid_edges(length * 1.6, length, length),
        ObjectKind::Cylinder => cone_edges(length / 2.0, length / 2.0, length, RADIAL_DIVIDES),
        ObjectKind::Cone => cone_edges(0.0, length / 2.0, length, RADIAL_DIVIDES),
        ObjectKind::TruncatedCone => cone_edges(length / 4.0, length / 2.0, length, RADIAL_DIVIDES),
        ObjectKind::Prism => prism_edges(length, length, length),
    }
}
