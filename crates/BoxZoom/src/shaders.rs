//! # Shader Sources
//!
//! The shared shader-source entry for the overlay fill quad, plus the
//! preprocessor-define plumbing the pipeline consumes. Compilation and linking
//! belong to the host's [`RasterPipeline`](crate::overlay::RasterPipeline).

/// A vertex/fragment source pair from the shader library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    pub name: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
}

/// Flat-colored quad. Vertices arrive pre-normalized to clip space, so the
/// model-view uniform stays identity.
pub const FILL_QUAD: ShaderSource = ShaderSource {
    name: "fill_quad",
    vertex: "\
uniform mat4 u_matrix;
attribute vec2 a_pos;

void main() {
    gl_Position = u_matrix * vec4(a_pos, 0.0, 1.0);
}
",
    fragment: "\
precision mediump float;

uniform vec4 u_color;
uniform float u_opacity;

void main() {
    gl_FragColor = u_color * u_opacity;
}
",
};

/// Prepends `#define` lines to a shader source.
pub fn apply_defines(source: &str, defines: &[String]) -> String {
    let mut out = String::with_capacity(source.len() + defines.len() * 24);
    for define in defines {
        out.push_str("#define ");
        out.push_str(define);
        out.push('\n');
    }
    out.push_str(source);
    out
}
