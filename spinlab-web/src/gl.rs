/// WebGL2 plumbing: the shader program, uploaded meshes and the frontend
/// that submits them.
use std::convert::Infallible;
use std::rc::Rc;

use js_sys::{Float32Array, Uint32Array};
use nalgebra::Matrix4;
use spinlab_core::{Frontend, Mesh, SetupError, ShaderStage};
use web_sys::{
    WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader, WebGlUniformLocation,
    WebGlVertexArrayObject,
};

pub const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

uniform mat4 u_view_projection;
uniform mat4 u_model;

out vec4 v_color;

void main() {
    v_color = a_color;
    gl_Position = u_view_projection * u_model * vec4(a_position, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;

const POSITION_LOCATION: u32 = 0;
const COLOR_LOCATION: u32 = 1;

/// Position (3) followed by RGBA color (4)
pub const FLOATS_PER_VERTEX: usize = 7;

pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

/// Flatten a mesh's vertex buffer into the layout the vertex shader expects
pub fn interleave(mesh: &Mesh) -> Vec<f32> {
    let mut data = Vec::with_capacity(mesh.vertices.len() * FLOATS_PER_VERTEX);
    for vertex in &mesh.vertices {
        data.extend_from_slice(vertex.position.coords.as_slice());
        data.extend_from_slice(&vertex.color);
    }
    data
}

/// A linked program together with the uniforms the frontend sets per draw
pub struct ShaderProgram {
    program: WebGlProgram,
    model: WebGlUniformLocation,
    view_projection: WebGlUniformLocation,
}

impl ShaderProgram {
    pub fn new(gl: &Gl, vertex_source: &str, fragment_source: &str) -> Result<Self, SetupError> {
        let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment = compile_shader(gl, ShaderStage::Fragment, fragment_source)?;

        let program = gl
            .create_program()
            .ok_or(SetupError::Resource("shader program"))?;
        gl.attach_shader(&program, &vertex);
        gl.attach_shader(&program, &fragment);
        gl.link_program(&program);

        // The program keeps what it needs once linked
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));

        let linked = gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            log::error!("program link failed: {}", info);
            return Err(SetupError::ProgramLink(info));
        }

        let model = gl
            .get_uniform_location(&program, "u_model")
            .ok_or(SetupError::Resource("u_model uniform"))?;
        let view_projection = gl
            .get_uniform_location(&program, "u_view_projection")
            .ok_or(SetupError::Resource("u_view_projection uniform"))?;

        Ok(Self {
            program,
            model,
            view_projection,
        })
    }

    /// The demo's fixed shader pair
    pub fn standard(gl: &Gl) -> Result<Self, SetupError> {
        Self::new(gl, VERTEX_SHADER, FRAGMENT_SHADER)
    }
}

fn compile_shader(gl: &Gl, stage: ShaderStage, source: &str) -> Result<WebGlShader, SetupError> {
    let kind = match stage {
        ShaderStage::Vertex => Gl::VERTEX_SHADER,
        ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or(SetupError::Resource("shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        log::error!("{} shader compile failed: {}", stage, info);
        Err(SetupError::ShaderCompile { stage, log: info })
    }
}

/// Geometry living on the GPU: a vertex array with its vertex and index
/// buffers, and the program it is drawn with
#[derive(Clone)]
pub struct GpuMesh {
    vao: WebGlVertexArrayObject,
    index_count: i32,
    program: Rc<ShaderProgram>,
}

impl GpuMesh {
    pub fn upload(gl: &Gl, mesh: &Mesh, program: Rc<ShaderProgram>) -> Result<Self, SetupError> {
        let vao = gl
            .create_vertex_array()
            .ok_or(SetupError::Resource("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = gl
            .create_buffer()
            .ok_or(SetupError::Resource("vertex buffer"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));
        let vertices = Float32Array::from(interleave(mesh).as_slice());
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &vertices, Gl::STATIC_DRAW);

        let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as i32;
        gl.vertex_attrib_pointer_with_i32(POSITION_LOCATION, 3, Gl::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        gl.vertex_attrib_pointer_with_i32(
            COLOR_LOCATION,
            4,
            Gl::FLOAT,
            false,
            stride,
            (3 * std::mem::size_of::<f32>()) as i32,
        );
        gl.enable_vertex_attrib_array(COLOR_LOCATION);

        let index_buffer = gl
            .create_buffer()
            .ok_or(SetupError::Resource("index buffer"))?;
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        let indices = Uint32Array::from(mesh.indices.as_slice());
        gl.buffer_data_with_array_buffer_view(
            Gl::ELEMENT_ARRAY_BUFFER,
            &indices,
            Gl::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            index_count: mesh.indices.len() as i32,
            program,
        })
    }
}

/// Submits draws to a WebGL2 context. Presentation happens when control
/// returns to the browser, so `present` only ends the frame on our side.
pub struct WebGlFrontend {
    gl: Gl,
    view_projection: Matrix4<f32>,
    close: bool,
}

impl WebGlFrontend {
    pub fn new(gl: Gl, view_projection: Matrix4<f32>, depth_test: bool, blend: bool) -> Self {
        if depth_test {
            gl.enable(Gl::DEPTH_TEST);
            gl.depth_func(Gl::LESS);
        }
        if blend {
            gl.enable(Gl::BLEND);
            gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        }
        let [r, g, b, a] = CLEAR_COLOR;
        gl.clear_color(r, g, b, a);

        Self {
            gl,
            view_projection,
            close: false,
        }
    }

    pub fn set_view_projection(&mut self, view_projection: Matrix4<f32>) {
        self.view_projection = view_projection;
    }

    /// Clear the drawing buffer for a new frame
    pub fn begin_frame(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    pub fn request_close(&mut self) {
        self.close = true;
    }

    pub fn close_pending(&self) -> bool {
        self.close
    }
}

impl Frontend for WebGlFrontend {
    type Geometry = GpuMesh;
    type Error = Infallible;

    fn close_requested(&mut self) -> Result<bool, Infallible> {
        Ok(self.close)
    }

    fn draw(&mut self, geometry: &GpuMesh, model: &Matrix4<f32>) {
        let program = &geometry.program;
        self.gl.use_program(Some(&program.program));
        self.gl.uniform_matrix4fv_with_f32_array(
            Some(&program.view_projection),
            false,
            self.view_projection.as_slice(),
        );
        self.gl
            .uniform_matrix4fv_with_f32_array(Some(&program.model), false, model.as_slice());

        self.gl.bind_vertex_array(Some(&geometry.vao));
        self.gl
            .draw_elements_with_i32(Gl::TRIANGLES, geometry.index_count, Gl::UNSIGNED_INT, 0);
        self.gl.bind_vertex_array(None);
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.gl.flush();
        Ok(())
    }
}
