//! Built-in programs for passes that cover the whole target.

/// Vertex stage emitting a fullscreen quad from `vertex_index` (6 vertices,
/// no vertex buffer). Outputs clip position and a top-left-origin `uv`.
pub const FULLSCREEN_VERTEX_WGSL: &str = r#"
struct FullscreenOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vert_main(@builtin(vertex_index) index: u32) -> FullscreenOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
    );
    let p = corners[index];

    var out: FullscreenOut;
    out.position = vec4<f32>(p, 0.0, 1.0);
    out.uv = vec2<f32>((p.x + 1.0) * 0.5, (1.0 - p.y) * 0.5);
    return out;
}
"#;

/// Vertices drawn by a fullscreen pass.
pub const FULLSCREEN_VERTEX_COUNT: u32 = 6;

/// Variable names the texture presentation program expects in its group.
pub const FRAME_TEXTURE_VAR: &str = "frame_texture";
pub const FRAME_SAMPLER_VAR: &str = "frame_sampler";

/// Fragment stage sampling `frame_texture` with `frame_sampler`.
pub const FULLSCREEN_TEXTURE_WGSL: &str = r#"
struct FullscreenIn {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@fragment
fn frag_main(frag: FullscreenIn) -> @location(0) vec4<f32> {
    return textureSample(frame_texture, frame_sampler, frag.uv);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_program_uses_declared_names() {
        assert!(FULLSCREEN_TEXTURE_WGSL.contains(FRAME_TEXTURE_VAR));
        assert!(FULLSCREEN_TEXTURE_WGSL.contains(FRAME_SAMPLER_VAR));
    }

    #[test]
    fn vertex_program_has_one_corner_per_vertex() {
        let n = FULLSCREEN_VERTEX_WGSL.matches("vec2<f32>(").count();
        // six corners plus the uv constructor
        assert_eq!(n as u32, FULLSCREEN_VERTEX_COUNT + 1);
    }
}
