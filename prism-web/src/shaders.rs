//! GLSL sources and the program wrapper that resolves their locations.

use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader, WebGlUniformLocation};

use crate::error::WebError;

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec4 aVertexPosition;
in vec3 aVertexNormal;
in vec4 aVertexColor;

uniform mat4 uModelViewMatrix;
uniform mat4 uProjectionMatrix;
uniform mat4 uNormalMatrix;

uniform bool uLightingEnabled;
uniform vec3 uAmbientLight;
uniform vec3 uLightColor;
uniform vec3 uLightDirection;

out lowp vec4 vColor;
out highp vec3 vLighting;

void main() {
    gl_Position = uProjectionMatrix * uModelViewMatrix * aVertexPosition;
    vColor = aVertexColor;

    if (uLightingEnabled) {
        highp vec3 normal = normalize((uNormalMatrix * vec4(aVertexNormal, 0.0)).xyz);
        highp float directional = max(dot(normal, normalize(uLightDirection)), 0.0);
        vLighting = uAmbientLight + uLightColor * directional;
    } else {
        vLighting = vec3(1.0);
    }
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

in lowp vec4 vColor;
in highp vec3 vLighting;

out vec4 fragColor;

void main() {
    fragColor = vec4(vColor.rgb * vLighting, vColor.a);
}
"#;

/// Attribute names, in the order they are looked up.
pub const ATTRIBUTES: [&str; 3] = ["aVertexPosition", "aVertexNormal", "aVertexColor"];

/// Linked program plus every location the renderer touches.
pub struct ShaderProgram {
    pub program: WebGlProgram,
    pub position: u32,
    pub normal: u32,
    pub color: u32,
    pub projection_matrix: Option<WebGlUniformLocation>,
    pub model_view_matrix: Option<WebGlUniformLocation>,
    pub normal_matrix: Option<WebGlUniformLocation>,
    pub lighting_enabled: Option<WebGlUniformLocation>,
    pub ambient_light: Option<WebGlUniformLocation>,
    pub light_color: Option<WebGlUniformLocation>,
    pub light_direction: Option<WebGlUniformLocation>,
}

impl ShaderProgram {
    pub fn new(gl: &Gl) -> Result<Self, WebError> {
        let vertex = compile_shader(gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(gl, &vertex, &fragment)?;

        // The program keeps what it needs once linked
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));

        let [position, normal, color] = ATTRIBUTES;
        Ok(Self {
            position: attribute(gl, &program, position)?,
            normal: attribute(gl, &program, normal)?,
            color: attribute(gl, &program, color)?,
            projection_matrix: gl.get_uniform_location(&program, "uProjectionMatrix"),
            model_view_matrix: gl.get_uniform_location(&program, "uModelViewMatrix"),
            normal_matrix: gl.get_uniform_location(&program, "uNormalMatrix"),
            lighting_enabled: gl.get_uniform_location(&program, "uLightingEnabled"),
            ambient_light: gl.get_uniform_location(&program, "uAmbientLight"),
            light_color: gl.get_uniform_location(&program, "uLightColor"),
            light_direction: gl.get_uniform_location(&program, "uLightDirection"),
            program,
        })
    }
}

fn attribute(gl: &Gl, program: &WebGlProgram, name: &'static str) -> Result<u32, WebError> {
    let location = gl.get_attrib_location(program, name);
    u32::try_from(location).map_err(|_| WebError::MissingAttribute(name))
}

/// Create a shader of the given type, upload the source and compile it.
pub fn compile_shader(gl: &Gl, shader_type: u32, source: &str) -> Result<WebGlShader, WebError> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| WebError::ShaderCompile("unable to create shader object".to_string()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown error creating shader".to_string());
        gl.delete_shader(Some(&shader));
        Err(WebError::ShaderCompile(info))
    }
}

pub fn link_program(
    gl: &Gl,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, WebError> {
    let program = gl
        .create_program()
        .ok_or_else(|| WebError::ProgramLink("unable to create program object".to_string()))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown error creating program".to_string());
        gl.delete_program(Some(&program));
        Err(WebError::ProgramLink(info))
    }
}
