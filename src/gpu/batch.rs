//! Draw list tessellation.
//!
//! Every [`DrawCommand`] becomes two triangles. Consecutive shapes that share a
//! blend mode end up in the same [`Batch`], so a frame of sparks costs one
//! draw call per blend switch rather than one per spark.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, Vec2, Vec3};

use crate::draw::DrawCommand;
use crate::visuals::BlendMode;

/// Vertex uploaded to the canvas pipelines.
///
/// `uv` is the position inside the unit disc for circles and zero for
/// everything else; the fragment shader discards outside the disc.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in pixels, origin at the top-left.
    pub position: [f32; 2],
    /// Disc coordinate.
    pub uv: [f32; 2],
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

impl Vertex {
    /// Attribute layout matching the canvas shader.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    /// Buffer layout for one vertex per step.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A run of vertices drawn with one blend mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Compositing mode.
    pub blend: BlendMode,
    /// Vertex range in the frame's vertex buffer.
    pub vertices: Range<u32>,
}

/// Tessellate `commands` into `vertices`, grouping runs into `batches`.
///
/// Both outputs are appended to. Empty batches are never emitted. Shapes
/// before the first `SetBlend` use [`BlendMode::SourceOver`].
pub fn tessellate(commands: &[DrawCommand], vertices: &mut Vec<Vertex>, batches: &mut Vec<Batch>) {
    let mut blend = BlendMode::default();
    let mut start = vertices.len() as u32;

    for command in commands {
        match *command {
            DrawCommand::SetBlend(mode) => {
                if mode != blend {
                    flush(blend, &mut start, vertices.len() as u32, batches);
                    blend = mode;
                }
            }
            DrawCommand::FillRect { min, max, color, alpha } => {
                let min = min.as_vec2();
                let max = max.as_vec2();
                push_quad(
                    vertices,
                    [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
                    [Vec2::ZERO; 4],
                    rgba(color, alpha),
                );
            }
            DrawCommand::StrokeLine { from, to, width, color, alpha } => {
                let delta = to - from;
                let length = delta.length();
                // Zero-length segments have no direction and draw nothing.
                if length <= f64::EPSILON {
                    continue;
                }
                let normal = (DVec2::new(-delta.y, delta.x) / length * (width as f64 * 0.5)).as_vec2();
                let from = from.as_vec2();
                let to = to.as_vec2();
                push_quad(
                    vertices,
                    [from + normal, to + normal, to - normal, from - normal],
                    [Vec2::ZERO; 4],
                    rgba(color, alpha),
                );
            }
            DrawCommand::FillCircle { center, radius, color, alpha } => {
                let c = center.as_vec2();
                let r = radius;
                push_quad(
                    vertices,
                    [
                        c + Vec2::new(-r, -r),
                        c + Vec2::new(r, -r),
                        c + Vec2::new(r, r),
                        c + Vec2::new(-r, r),
                    ],
                    [
                        Vec2::new(-1.0, -1.0),
                        Vec2::new(1.0, -1.0),
                        Vec2::new(1.0, 1.0),
                        Vec2::new(-1.0, 1.0),
                    ],
                    rgba(color, alpha),
                );
            }
        }
    }

    flush(blend, &mut start, vertices.len() as u32, batches);
}

fn flush(blend: BlendMode, start: &mut u32, end: u32, batches: &mut Vec<Batch>) {
    if end > *start {
        batches.push(Batch {
            blend,
            vertices: *start..end,
        });
    }
    *start = end;
}

#[inline]
fn rgba(color: Vec3, alpha: f32) -> [f32; 4] {
    color.extend(alpha.clamp(0.0, 1.0)).to_array()
}

fn push_quad(vertices: &mut Vec<Vertex>, corners: [Vec2; 4], uvs: [Vec2; 4], color: [f32; 4]) {
    for i in [0, 1, 2, 0, 2, 3] {
        vertices.push(Vertex {
            position: corners[i].to_array(),
            uv: uvs[i].to_array(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(from: DVec2, to: DVec2) -> DrawCommand {
        DrawCommand::StrokeLine {
            from,
            to,
            width: 2.0,
            color: Vec3::ONE,
            alpha: 0.5,
        }
    }

    #[test]
    fn test_batches_follow_blend_switches() {
        let commands = vec![
            DrawCommand::SetBlend(BlendMode::DestinationOut),
            DrawCommand::FillRect {
                min: DVec2::ZERO,
                max: DVec2::new(10.0, 10.0),
                color: Vec3::ZERO,
                alpha: 0.2,
            },
            DrawCommand::SetBlend(BlendMode::Lighter),
            line(DVec2::ZERO, DVec2::new(5.0, 0.0)),
            line(DVec2::ZERO, DVec2::new(0.0, 5.0)),
        ];

        let mut vertices = Vec::new();
        let mut batches = Vec::new();
        tessellate(&commands, &mut vertices, &mut batches);

        assert_eq!(vertices.len(), 18);
        assert_eq!(
            batches,
            vec![
                Batch { blend: BlendMode::DestinationOut, vertices: 0..6 },
                Batch { blend: BlendMode::Lighter, vertices: 6..18 },
            ]
        );
    }

    #[test]
    fn test_zero_length_line_is_skipped() {
        let mut vertices = Vec::new();
        let mut batches = Vec::new();
        tessellate(&[line(DVec2::ONE, DVec2::ONE)], &mut vertices, &mut batches);
        assert!(vertices.is_empty());
        assert!(batches.is_empty());
    }

    #[test]
    fn test_line_has_butt_caps() {
        let mut vertices = Vec::new();
        let mut batches = Vec::new();
        tessellate(&[line(DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0))], &mut vertices, &mut batches);

        // Half-width 1 around the segment, no extension past its ends.
        for v in &vertices {
            assert!(v.position[0] == 0.0 || v.position[0] == 10.0);
            assert_eq!(v.position[1].abs(), 1.0);
            assert_eq!(v.color, [1.0, 1.0, 1.0, 0.5]);
        }
    }

    #[test]
    fn test_circle_quad_spans_unit_disc() {
        let mut vertices = Vec::new();
        let mut batches = Vec::new();
        let circle = DrawCommand::FillCircle {
            center: DVec2::new(50.0, 50.0),
            radius: 4.0,
            color: Vec3::ONE,
            alpha: 1.0,
        };
        tessellate(&[circle], &mut vertices, &mut batches);

        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert_eq!(v.uv[0].abs(), 1.0);
            assert_eq!((v.position[0] - 50.0).abs(), 4.0);
        }
        assert_eq!(batches[0].blend, BlendMode::SourceOver);
    }

    #[test]
    fn test_switching_back_to_source_over_starts_a_batch() {
        let mut vertices = Vec::new();
        let mut batches = Vec::new();
        let dot = DrawCommand::FillCircle {
            center: DVec2::ZERO,
            radius: 1.0,
            color: Vec3::ONE,
            alpha: 1.0,
        };
        let commands = [
            DrawCommand::SetBlend(BlendMode::Lighter),
            dot.clone(),
            DrawCommand::SetBlend(BlendMode::SourceOver),
            dot,
        ];
        tessellate(&commands, &mut vertices, &mut batches);

        let modes: Vec<BlendMode> = batches.iter().map(|b| b.blend).collect();
        assert_eq!(modes, vec![BlendMode::Lighter, BlendMode::SourceOver]);
        assert_eq!(batches[1].vertices, 6..12);
    }
}
