/// WGSL shader that blits the CPU frame texture onto the surface.
///
/// Draws a four-vertex triangle strip with no vertex buffer. `uniforms.scale`
/// shrinks the quad on one axis to letterbox the frame at its own aspect ratio.
pub const PRESENT_SHADER: &str = r#"
struct Uniforms {
    scale: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(0) @binding(1)
var frame_texture: texture_2d<f32>;

@group(0) @binding(2)
var frame_sampler: sampler;

struct PresentOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_present(@builtin(vertex_index) index: u32) -> PresentOutput {
    let x = f32(index & 1u);
    let y = f32((index >> 1u) & 1u);

    var out: PresentOutput;
    out.uv = vec2<f32>(x, y);
    out.clip_position = vec4<f32>(
        (x * 2.0 - 1.0) * uniforms.scale.x,
        (1.0 - y * 2.0) * uniforms.scale.y,
        0.0,
        1.0,
    );
    return out;
}

@fragment
fn fs_present(in: PresentOutput) -> @location(0) vec4<f32> {
    let color = textureSample(frame_texture, frame_sampler, in.uv);
    return vec4<f32>(color.rgb, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_declares_entry_points() {
        assert!(PRESENT_SHADER.contains("fn vs_present"));
        assert!(PRESENT_SHADER.contains("fn fs_present"));
        assert!(PRESENT_SHADER.contains("@binding(2)"));
    }
}
