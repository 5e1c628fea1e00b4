//! WGSL sources for the canvas and present passes.

/// Shapes drawn into the trail texture.
///
/// Positions arrive in pixels with the origin at the top-left and are mapped
/// to clip space here. Circles carry a unit-disc `uv`; everything else has
/// `uv == 0` and is never discarded.
pub const CANVAS_SHADER: &str = r#"
struct Globals {
    viewport: vec2<f32>,
    _pad: vec2<f32>,
    background: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let ndc = in.position / globals.viewport * 2.0 - vec2<f32>(1.0, 1.0);
    out.clip_position = vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
    out.uv = in.uv;
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if dot(in.uv, in.uv) > 1.0 {
        discard;
    }
    return in.color;
}
"#;

/// Composites the premultiplied trail texture over the background.
pub const PRESENT_SHADER: &str = r#"
struct Globals {
    viewport: vec2<f32>,
    _pad: vec2<f32>,
    background: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(0) @binding(1)
var trail: texture_2d<f32>;

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    // One triangle covering the screen.
    let x = f32((index << 1u) & 2u) * 2.0 - 1.0;
    let y = f32(index & 2u) * 2.0 - 1.0;
    return vec4<f32>(x, y, 0.0, 1.0);
}

@fragment
fn fs_main(@builtin(position) frag: vec4<f32>) -> @location(0) vec4<f32> {
    let size = vec2<i32>(textureDimensions(trail));
    let texel = clamp(vec2<i32>(frag.xy), vec2<i32>(0, 0), size - vec2<i32>(1, 1));
    let src = textureLoad(trail, texel, 0);
    let rgb = globals.background.rgb * (1.0 - src.a) + src.rgb;
    return vec4<f32>(rgb, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use naga::front::wgsl;
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    fn validate(source: &str) -> Result<(), String> {
        let module = wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;
        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .map_err(|e| format!("{e:?}"))?;
        Ok(())
    }

    #[test]
    fn test_canvas_shader_is_valid() {
        if let Err(e) = validate(CANVAS_SHADER) {
            panic!("canvas shader failed validation:\n{e}");
        }
    }

    #[test]
    fn test_present_shader_is_valid() {
        if let Err(e) = validate(PRESENT_SHADER) {
            panic!("present shader failed validation:\n{e}");
        }
    }

    #[test]
    fn test_entry_points() {
        for source in [CANVAS_SHADER, PRESENT_SHADER] {
            let module = wgsl::parse_str(source).unwrap();
            let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["vs_main", "fs_main"]);
        }
    }
}
