//! Draw instructions emitted by the engine each tick.
//!
//! The engine never touches the GPU. It records a flat list of canvas-style
//! commands, and a backend (the wgpu [`Renderer`](crate::gpu::Renderer) in the
//! binary, a plain `Vec` in tests) consumes them in order.

use glam::{DVec2, Vec3};

use crate::visuals::BlendMode;

/// One canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Change the compositing mode for everything that follows.
    SetBlend(BlendMode),
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Top-left corner in pixels.
        min: DVec2,
        /// Bottom-right corner in pixels.
        max: DVec2,
        /// Fill color.
        color: Vec3,
        /// Fill opacity.
        alpha: f32,
    },
    /// Stroke a straight segment with butt caps.
    StrokeLine {
        /// Segment start.
        from: DVec2,
        /// Segment end.
        to: DVec2,
        /// Stroke width in pixels.
        width: f32,
        /// Stroke color.
        color: Vec3,
        /// Stroke opacity.
        alpha: f32,
    },
    /// Fill a disc.
    FillCircle {
        /// Disc center.
        center: DVec2,
        /// Disc radius in pixels.
        radius: f32,
        /// Fill color.
        color: Vec3,
        /// Fill opacity.
        alpha: f32,
    },
}

/// An ordered list of draw commands for one frame.
///
/// The list is cleared and refilled every tick; its allocation is reused.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all commands, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Append a command.
    #[inline]
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Commands in submission order.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Count of commands matching a predicate. Mostly useful in tests.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}
