//! Burst spawning.
//!
//! A burst is a batch of sparks radiating from one origin. There are two
//! kinds: the ordinary bursts that pop up on their own, and the single big
//! finale burst. The constants below are the whole difference between them.
//!
//! | | normal | big |
//! |---|---|---|
//! | count | 100..=150 | 600 |
//! | speed | `[0, 4..10)` | `[1, 16)` |
//! | color | one per burst | random per spark |
//! | size | `[0.5, 2.0)` | `[0.5, 3.5)` |
//! | friction | 0.96 | 0.975 |
//! | decay | `[0.005, 0.017)` | `[0.002, 0.007)` |

use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use glam::{DVec2, Vec3};
use rand::Rng;

use crate::particle::Particle;
use crate::visuals::{parse_hex_color, PALETTE};

/// Spark count range for a normal burst.
pub const NORMAL_COUNT: RangeInclusive<usize> = 100..=150;
/// Spark count of the big burst.
pub const BIG_COUNT: usize = 600;

/// Lowest speed cap for a normal burst; the cap is drawn from `[min, min + span)`.
pub const NORMAL_FORCE_MIN: f64 = 4.0;
/// Width of the normal speed-cap range.
pub const NORMAL_FORCE_SPAN: f64 = 6.0;
/// Speed cap of the big burst.
pub const BIG_FORCE: f64 = 15.0;
/// Added to every big-burst speed so no spark hangs at the origin.
pub const BIG_SPEED_FLOOR: f64 = 1.0;

/// Minimum stroke width.
pub const SIZE_MIN: f64 = 0.5;
/// Stroke width span for normal bursts.
pub const NORMAL_SIZE_SPAN: f64 = 1.5;
/// Stroke width span for the big burst.
pub const BIG_SIZE_SPAN: f64 = 3.0;

/// Friction of normal sparks.
pub const NORMAL_FRICTION: f64 = 0.96;
/// Friction of big-burst sparks.
pub const BIG_FRICTION: f64 = 0.975;
/// Gravity for every spark.
pub const GRAVITY: f64 = 0.07;

/// Minimum per-tick fade of normal sparks.
pub const NORMAL_DECAY_MIN: f64 = 0.005;
/// Fade span of normal sparks.
pub const NORMAL_DECAY_SPAN: f64 = 0.012;
/// Minimum per-tick fade of big-burst sparks.
pub const BIG_DECAY_MIN: f64 = 0.002;
/// Fade span of big-burst sparks.
pub const BIG_DECAY_SPAN: f64 = 0.005;

/// Sparks with a draw above this threshold get the sparkle flag (~70%).
pub const SPARKLE_THRESHOLD: f64 = 0.3;

/// Which kind of burst to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BurstKind {
    /// An ordinary burst.
    #[default]
    Normal,
    /// The finale: 600 multi-colored sparks with a long fade.
    Big,
}

impl BurstKind {
    /// `true` for [`BurstKind::Big`].
    #[inline]
    pub fn is_big(self) -> bool {
        matches!(self, BurstKind::Big)
    }
}

/// Color choice for a burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BurstColor {
    /// Every spark gets this color.
    Single(Vec3),
    /// Each spark picks independently from [`PALETTE`].
    Palette,
}

impl BurstColor {
    /// A single-color burst from a `#RRGGBB` string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        parse_hex_color(hex).map(BurstColor::Single)
    }

    /// The color used when a kind does not decide for itself.
    ///
    /// Big bursts always pick per spark, whatever was asked for.
    fn resolve<R: Rng + ?Sized>(self, kind: BurstKind, rng: &mut R) -> Vec3 {
        match (kind, self) {
            (BurstKind::Normal, BurstColor::Single(color)) => color,
            _ => random_palette_color(rng),
        }
    }
}

/// Pick a uniformly random palette color.
#[inline]
pub fn random_palette_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}

/// Spawn one burst into `out`. Returns the number of sparks added.
///
/// The random draws per spark are angle, speed, color (big only), size,
/// decay and sparkle, in that order, so a seeded generator always yields
/// the same burst.
pub fn spawn_burst<R: Rng + ?Sized>(
    rng: &mut R,
    origin: DVec2,
    color: BurstColor,
    kind: BurstKind,
    out: &mut Vec<Particle>,
) -> usize {
    let (count, force) = match kind {
        BurstKind::Normal => (
            rng.gen_range(NORMAL_COUNT),
            NORMAL_FORCE_MIN + rng.gen::<f64>() * NORMAL_FORCE_SPAN,
        ),
        BurstKind::Big => (BIG_COUNT, BIG_FORCE),
    };

    out.reserve(count);
    for _ in 0..count {
        let angle = rng.gen::<f64>() * TAU;
        let speed = match kind {
            BurstKind::Normal => rng.gen::<f64>() * force,
            BurstKind::Big => rng.gen::<f64>() * force + BIG_SPEED_FLOOR,
        };
        let spark_color = color.resolve(kind, rng);

        let (size_span, friction, decay_min, decay_span) = match kind {
            BurstKind::Normal => (NORMAL_SIZE_SPAN, NORMAL_FRICTION, NORMAL_DECAY_MIN, NORMAL_DECAY_SPAN),
            BurstKind::Big => (BIG_SIZE_SPAN, BIG_FRICTION, BIG_DECAY_MIN, BIG_DECAY_SPAN),
        };
        let size = rng.gen::<f64>() * size_span + SIZE_MIN;
        let decay = rng.gen::<f64>() * decay_span + decay_min;
        let sparkle = rng.gen::<f64>() > SPARKLE_THRESHOLD;

        out.push(Particle {
            position: origin,
            previous: origin,
            velocity: DVec2::from_angle(angle) * speed,
            alpha: 1.0,
            color: spark_color,
            size,
            friction,
            gravity: GRAVITY,
            decay,
            sparkle,
        });
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_normal_burst_shape() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut out = Vec::new();
        let color = PALETTE[2];
        let n = spawn_burst(&mut rng, DVec2::new(100.0, 100.0), BurstColor::Single(color), BurstKind::Normal, &mut out);

        assert!(NORMAL_COUNT.contains(&n));
        assert_eq!(out.len(), n);

        let max_speed = out.iter().map(|p| p.velocity.length()).fold(0.0, f64::max);
        assert!(max_speed < NORMAL_FORCE_MIN + NORMAL_FORCE_SPAN);

        for p in &out {
            assert_eq!(p.color, color);
            assert_eq!(p.position, DVec2::new(100.0, 100.0));
            assert_eq!(p.previous, p.position);
            assert_eq!(p.alpha, 1.0);
            assert_eq!(p.friction, NORMAL_FRICTION);
            assert_eq!(p.gravity, GRAVITY);
            assert!((0.5..2.0).contains(&p.size));
            assert!((0.005..0.017).contains(&p.decay));
        }
    }

    #[test]
    fn test_big_burst_shape() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut out = Vec::new();
        let n = spawn_burst(&mut rng, DVec2::ZERO, BurstColor::Single(PALETTE[0]), BurstKind::Big, &mut out);

        assert_eq!(n, BIG_COUNT);
        for p in &out {
            let speed = p.velocity.length();
            assert!((1.0 - 1e-9..16.0).contains(&speed), "speed {speed}");
            assert!(PALETTE.contains(&p.color));
            assert_eq!(p.friction, BIG_FRICTION);
            assert!((0.5..3.5).contains(&p.size));
            assert!((0.002..0.007).contains(&p.decay));
        }

        // 600 independent picks from 10 colors never land on one color
        let first = out[0].color;
        assert!(out.iter().any(|p| p.color != first));
    }

    #[test]
    fn test_sparkle_ratio_is_roughly_seventy_percent() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut out = Vec::new();
        for _ in 0..10 {
            spawn_burst(&mut rng, DVec2::ZERO, BurstColor::Palette, BurstKind::Big, &mut out);
        }
        let ratio = out.iter().filter(|p| p.sparkle).count() as f64 / out.len() as f64;
        assert!((0.65..0.75).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_same_seed_same_burst() {
        let spawn = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut out = Vec::new();
            spawn_burst(&mut rng, DVec2::new(100.0, 100.0), BurstColor::Single(PALETTE[0]), BurstKind::Normal, &mut out);
            out
        };
        assert_eq!(spawn(42), spawn(42));
        assert_ne!(spawn(42), spawn(43));
    }
}
