//! WebGL2 renderer for the prism and its optional axis lines.

use nalgebra::Matrix4;
use prism_core::config::ProjectionConfig;
use prism_core::{
    AxisLines, DirectionalLight, Projection, Renderer, SceneConfig, Surface, Transform,
};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer};

use crate::error::WebError;
use crate::shaders::ShaderProgram;

/// A canvas seen as a pointer surface, in CSS pixels.
pub struct CanvasSurface<'a>(pub &'a HtmlCanvasElement);

impl Surface for CanvasSurface<'_> {
    fn client_size(&self) -> (f64, f64) {
        (self.0.client_width() as f64, self.0.client_height() as f64)
    }
}

struct MeshBuffers {
    position: WebGlBuffer,
    normal: WebGlBuffer,
    color: WebGlBuffer,
    indices: WebGlBuffer,
    index_count: i32,
}

struct AxisBuffers {
    position: WebGlBuffer,
    color: WebGlBuffer,
    vertex_count: i32,
}

pub struct SceneRenderer {
    gl: Gl,
    canvas: HtmlCanvasElement,
    program: ShaderProgram,
    prism: MeshBuffers,
    axes: AxisBuffers,
    light: DirectionalLight,
    lighting_enabled: bool,
    axes_visible: bool,
    background: [f32; 3],
    projection: ProjectionConfig,
}

impl SceneRenderer {
    /// Acquire a WebGL2 context on the canvas and upload the scene buffers.
    pub fn new(canvas: HtmlCanvasElement, config: &SceneConfig) -> Result<Self, WebError> {
        let gl = canvas
            .get_context("webgl2")?
            .ok_or(WebError::ContextUnavailable)?
            .dyn_into::<Gl>()
            .map_err(|_| WebError::ContextUnavailable)?;

        let program = ShaderProgram::new(&gl)?;

        let mesh = config.prism.mesh();
        let prism = MeshBuffers {
            position: upload_f32(&gl, &mesh.positions())?,
            normal: upload_f32(&gl, &mesh.normals())?,
            color: upload_f32(&gl, &mesh.colors())?,
            indices: upload_indices(&gl, &mesh.indices)?,
            index_count: mesh.indices.len() as i32,
        };

        let lines = AxisLines::new(config.display.axis_length);
        let axes = AxisBuffers {
            position: upload_f32(&gl, &lines.positions)?,
            color: upload_f32(&gl, &lines.colors)?,
            vertex_count: lines.vertex_count(),
        };

        log::info!(
            "WebGL2 renderer ready: {} prism indices, {} axis vertices",
            prism.index_count,
            axes.vertex_count
        );

        Ok(Self {
            gl,
            canvas,
            program,
            prism,
            axes,
            light: config.lighting.light(),
            lighting_enabled: config.lighting.enabled,
            axes_visible: config.display.draw_axes,
            background: config.display.background,
            projection: config.projection.clone(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn set_lighting(&mut self, enabled: bool) {
        self.lighting_enabled = enabled;
    }

    pub fn set_axes_visible(&mut self, visible: bool) {
        self.axes_visible = visible;
    }

    /// Match the drawing buffer to the displayed size in device pixels.
    fn resize_canvas(&self) {
        let ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let (width, height) = backing_size(CanvasSurface(&self.canvas).client_size(), ratio);
        if self.canvas.width() != width || self.canvas.height() != height {
            log::debug!("canvas backing store resized to {width}x{height}");
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }

    fn bind_attribute(&self, location: u32, buffer: &WebGlBuffer, components: i32) {
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl
            .vertex_attrib_pointer_with_i32(location, components, Gl::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(location);
    }

    fn draw_prism(&self) {
        let program = &self.program;
        self.bind_attribute(program.position, &self.prism.position, 3);
        self.bind_attribute(program.normal, &self.prism.normal, 3);
        self.bind_attribute(program.color, &self.prism.color, 4);

        self.gl.uniform1i(
            program.lighting_enabled.as_ref(),
            i32::from(self.lighting_enabled),
        );
        self.gl
            .bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&self.prism.indices));
        self.gl.draw_elements_with_i32(
            Gl::TRIANGLES,
            self.prism.index_count,
            Gl::UNSIGNED_SHORT,
            0,
        );
    }

    fn draw_axes(&self) {
        let program = &self.program;
        self.bind_attribute(program.position, &self.axes.position, 3);
        self.bind_attribute(program.color, &self.axes.color, 4);
        // Lines carry no normals
        self.gl.disable_vertex_attrib_array(program.normal);
        self.gl.vertex_attrib3f(program.normal, 0.0, 0.0, 1.0);

        self.gl.uniform1i(program.lighting_enabled.as_ref(), 0);
        self.gl.draw_arrays(Gl::LINES, 0, self.axes.vertex_count);
    }
}

impl Renderer for SceneRenderer {
    type Error = WebError;

    fn viewport_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn projection(&self) -> Projection {
        let (width, height) = CanvasSurface(&self.canvas).client_size();
        self.projection.projection(width as f32, height as f32)
    }

    fn draw(&mut self, view: &Matrix4<f32>) -> Result<(), WebError> {
        self.resize_canvas();
        let gl = &self.gl;
        let (width, height) = self.viewport_size();
        gl.viewport(0, 0, width as i32, height as i32);

        let [r, g, b] = self.background;
        gl.clear_color(r, g, b, 1.0);
        gl.clear_depth(1.0);
        gl.enable(Gl::DEPTH_TEST);
        gl.depth_func(Gl::LEQUAL);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let program = &self.program;
        gl.use_program(Some(&program.program));

        let projection = self.projection().matrix();
        let normal = Transform::normal_matrix(view);
        gl.uniform_matrix4fv_with_f32_array(
            program.projection_matrix.as_ref(),
            false,
            projection.as_slice(),
        );
        gl.uniform_matrix4fv_with_f32_array(program.model_view_matrix.as_ref(), false, view.as_slice());
        gl.uniform_matrix4fv_with_f32_array(program.normal_matrix.as_ref(), false, normal.as_slice());
        gl.uniform3fv_with_f32_array(program.ambient_light.as_ref(), &self.light.ambient);
        gl.uniform3fv_with_f32_array(program.light_color.as_ref(), &self.light.color);
        gl.uniform3fv_with_f32_array(
            program.light_direction.as_ref(),
            self.light.unit_direction().as_slice(),
        );

        self.draw_prism();
        if self.axes_visible {
            self.draw_axes();
        }
        Ok(())
    }
}

/// Drawing-buffer size for a displayed size and device pixel ratio.
pub fn backing_size((width, height): (f64, f64), pixel_ratio: f64) -> (u32, u32) {
    let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
    (
        (width * ratio).floor().max(1.0) as u32,
        (height * ratio).floor().max(1.0) as u32,
    )
}

fn upload_f32(gl: &Gl, data: &[f32]) -> Result<WebGlBuffer, WebError> {
    let buffer = gl.create_buffer().ok_or(WebError::Buffer)?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    let array = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::STATIC_DRAW);
    Ok(buffer)
}

fn upload_indices(gl: &Gl, data: &[u16]) -> Result<WebGlBuffer, WebError> {
    let buffer = gl.create_buffer().ok_or(WebError::Buffer)?;
    gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffer));
    let array = js_sys::Uint16Array::from(data);
    gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &array, Gl::STATIC_DRAW);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_size_scales_by_pixel_ratio() {
        assert_eq!(backing_size((640.0, 480.0), 1.0), (640, 480));
        assert_eq!(backing_size((640.0, 480.0), 2.0), (1280, 960));
        assert_eq!(backing_size((333.3, 100.0), 1.5), (499, 150));
    }

    #[test]
    fn test_backing_size_never_collapses() {
        assert_eq!(backing_size((0.0, 0.0), 2.0), (1, 1));
        assert_eq!(backing_size((100.0, 50.0), 0.0), (100, 50));
    }
}
