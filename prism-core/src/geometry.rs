//! Geometry for the rectangular prism and the coordinate axes.

use nalgebra::{Point3, Vector3};

/// RGBA colour, components in `[0, 1]`.
pub type Color = [f32; 4];

/// Face colours in face order: front, back, top, bottom, right, left.
pub const DEFAULT_FACE_COLORS: [Color; 6] = [
    [1.0, 0.0, 0.0, 1.0], // front: red
    [0.0, 1.0, 0.0, 1.0], // back: green
    [0.0, 0.0, 1.0, 1.0], // top: blue
    [1.0, 1.0, 0.0, 1.0], // bottom: yellow
    [1.0, 0.0, 1.0, 1.0], // right: magenta
    [0.0, 1.0, 1.0, 1.0], // left: cyan
];

/// Unit-cube corners per face, counter-clockwise seen from outside.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // Front
    [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    // Back
    [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
    // Top
    [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
    // Bottom
    [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    // Right
    [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
    // Left
    [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
];

const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
];

/// A 3D vertex with position, normal and colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Color,
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], color: Color) -> Self {
        Self {
            position: Point3::from(position),
            normal: Vector3::from(normal),
            color,
        }
    }
}

/// A triangle face resolved from an indexed mesh
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Indexed triangle mesh, laid out the way the GPU buffers expect it
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Axis-aligned box centred on the origin with one colour per face.
    ///
    /// Each face has its own four vertices so normals and colours stay flat.
    pub fn prism(width: f32, height: f32, depth: f32, face_colors: &[Color; 6]) -> Self {
        let half = [width / 2.0, height / 2.0, depth / 2.0];
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, corners) in FACE_CORNERS.iter().enumerate() {
            let base = vertices.len() as u16;
            for corner in corners {
                let position = [corner[0] * half[0], corner[1] * half[1], corner[2] * half[2]];
                vertices.push(Vertex::new(position, FACE_NORMALS[face], face_colors[face]));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    pub fn positions(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.normal.x, v.normal.y, v.normal.z])
            .collect()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.color).collect()
    }

    /// Iterate the indexed faces as standalone triangles
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            Triangle::new(
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            )
        })
    }
}

/// Line segments for the X (red), Y (green) and Z (blue) axes.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLines {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl AxisLines {
    pub fn new(length: f32) -> Self {
        let mut positions = Vec::with_capacity(18);
        let mut colors = Vec::with_capacity(24);
        for axis in 0..3 {
            let mut start = [0.0; 3];
            let mut end = [0.0; 3];
            start[axis] = -length;
            end[axis] = length;
            positions.extend_from_slice(&start);
            positions.extend_from_slice(&end);

            let mut color = [0.0, 0.0, 0.0, 1.0];
            color[axis] = 1.0;
            colors.extend_from_slice(&color);
            colors.extend_from_slice(&color);
        }
        Self { positions, colors }
    }

    pub fn vertex_count(&self) -> i32 {
        (self.positions.len() / 3) as i32
    }
}
