//! A single firework spark.

use glam::{DVec2, Vec3};

/// One spark of a burst.
///
/// Sparks are plain values owned by the engine's live list. After spawning,
/// only the kinematic state (`position`, `previous`, `velocity`) and `alpha`
/// change; color, size and the per-tick coefficients are fixed for life.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position in pixels.
    pub position: DVec2,
    /// Position one tick ago. The spark is drawn as a streak from here.
    pub previous: DVec2,
    /// Velocity in pixels per tick.
    pub velocity: DVec2,
    /// Opacity in `(0, 1]`.
    pub alpha: f64,
    /// RGB color, `0.0..=1.0`.
    pub color: Vec3,
    /// Stroke width in pixels.
    pub size: f64,
    /// Per-tick multiplicative velocity damping, in `(0, 1)`.
    pub friction: f64,
    /// Per-tick downward velocity increment.
    pub gravity: f64,
    /// Per-tick alpha decrement.
    pub decay: f64,
    /// Whether this spark may flash a white dot.
    pub sparkle: bool,
}

impl Particle {
    /// Advance one tick: damp, fall, move, fade.
    ///
    /// Returns `true` while the spark is still visible (`alpha > 0`).
    #[inline]
    pub fn integrate(&mut self) -> bool {
        self.previous = self.position;
        self.velocity *= self.friction;
        self.velocity.y += self.gravity;
        self.position += self.velocity;
        self.alpha -= self.decay;
        self.alpha > 0.0
    }

    /// Whether the spark has faded out.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }
}
