//! ASCII rasterizer for terminal rendering

use std::convert::Infallible;
use std::io::Write;

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use prism_core::config::ProjectionConfig;
use prism_core::{DirectionalLight, Mesh, Projection, Renderer, SceneConfig, Transform, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const EMPTY_CELL: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts the prism to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cell_buffer: Vec<Cell>,
    mesh: Mesh,
    light: DirectionalLight,
    lighting_enabled: bool,
    projection: ProjectionConfig,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, config: &SceneConfig) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cell_buffer: vec![EMPTY_CELL; size],
            mesh: config.prism.mesh(),
            light: config.lighting.light(),
            lighting_enabled: config.lighting.enabled,
            projection: config.projection.clone(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let size = width * height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.cell_buffer = vec![EMPTY_CELL; size];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cell_buffer.fill(EMPTY_CELL);
    }

    /// Character at a cell, `None` outside the buffer.
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cell_buffer[y * self.width + x].character)
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_view: &Matrix4<f32>,
        normal_matrix: &Matrix4<f32>,
        projection: &Projection,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match projection.project_to_screen(
                &vertex.position,
                model_view,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Shade with the eye-space face normal
        let normal = normal_matrix.transform_vector(&triangle.vertices[0].normal);
        let factor = self.light.shade(&normal, self.lighting_enabled);
        let brightness = ((factor[0] + factor[1] + factor[2]) / 3.0).clamp(0.0, 1.0);

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);

        let base = triangle.vertices[0].color;
        let channel = |i: usize| ((base[i] * factor[i]).clamp(0.0, 1.0) * 255.0) as u8;
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index],
            color: Color::Rgb {
                r: channel(0),
                g: channel(1),
                b: channel(2),
            },
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cell_buffer[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    /// Write the frame buffer to the terminal, one row per line
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            let mut current = None;
            for x in 0..self.width {
                let cell = self.cell_buffer[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.character))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    type Error = Infallible;

    fn viewport_size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    fn projection(&self) -> Projection {
        self.projection
            .projection(self.width as f32, self.height as f32 * CELL_ASPECT)
    }

    fn draw(&mut self, view: &Matrix4<f32>) -> Result<(), Infallible> {
        self.clear();

        let projection = self.projection();
        let normal_matrix = Transform::normal_matrix(view);
        let triangles: Vec<Triangle> = self.mesh.triangles().collect();
        for triangle in &triangles {
            self.render_triangle(triangle, view, &normal_matrix, &projection);
        }
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
