//! The fireworks engine: spawn, integrate, cull, draw.
//!
//! [`FireworksEngine`] owns every live spark. Each call to
//! [`tick`](FireworksEngine::tick) advances the show by one display frame and
//! records what to draw into a [`DrawList`]. Sound is not played here directly;
//! the engine calls a [`SoundCues`] sink so the audio side stays swappable
//! (a real [`SoundEngine`](crate::audio::SoundEngine), or `()` for silence).
//!
//! ```
//! use fireworks::{DrawList, FireworksEngine};
//!
//! let mut engine = FireworksEngine::seeded(42, 1280.0, 720.0);
//! let mut draw = DrawList::new();
//!
//! engine.trigger_big(&mut (), None, None);
//! assert_eq!(engine.live_count(), 600);
//!
//! let stats = engine.tick(&mut (), &mut draw);
//! assert_eq!(stats.expired, 0);
//! ```

use std::time::Duration;

use glam::DVec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ParticleConfig;
use crate::draw::{DrawCommand, DrawList};
use crate::particle::Particle;
use crate::spawn::{random_palette_color, spawn_burst, BurstColor, BurstKind};
use crate::visuals::{BlendMode, BACKGROUND, PALETTE, WHITE};

/// Chance per tick that a sparkling spark flashes its white dot.
pub const SPARKLE_CHANCE: f64 = 0.2;

/// Default origin of the big burst, as a fraction of the viewport.
pub const BIG_ORIGIN: DVec2 = DVec2::new(0.5, 0.4);

/// Sound hooks the engine fires when a burst is spawned.
///
/// Implemented by [`SoundEngine`](crate::audio::SoundEngine). The unit type
/// implements it as silence.
pub trait SoundCues {
    /// The rising whistle, played immediately.
    fn launch(&mut self);

    /// The explosion, played `delay` after the launch.
    fn burst(&mut self, big: bool, delay: Duration);
}

impl SoundCues for () {
    fn launch(&mut self) {}
    fn burst(&mut self, _big: bool, _delay: Duration) {}
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Sparks added by a spontaneous burst.
    pub spawned: usize,
    /// Sparks that faded out and were removed.
    pub expired: usize,
    /// Sparks dropped to respect the soft cap since the previous tick,
    /// including those evicted by bursts spawned between ticks.
    pub evicted: usize,
    /// Sparks alive after the tick.
    pub live: usize,
}

/// Particle fireworks simulation.
///
/// Generic over its random source so tests can pin a seed; production code
/// uses [`FireworksEngine::new`], which seeds [`SmallRng`] from entropy.
pub struct FireworksEngine<R: Rng = SmallRng> {
    particles: Vec<Particle>,
    rng: R,
    viewport: DVec2,
    paused: bool,
    config: ParticleConfig,
    evicted: usize,
}

impl FireworksEngine<SmallRng> {
    /// Create an engine for a `width` x `height` viewport, seeded from entropy.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_rng(SmallRng::from_entropy(), width, height)
    }

    /// Create an engine with a fixed seed.
    pub fn seeded(seed: u64, width: f64, height: f64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), width, height)
    }

    /// Create an engine from configuration, honoring its optional seed.
    pub fn from_config(config: &ParticleConfig, width: f64, height: f64) -> Self {
        let engine = match config.seed {
            Some(seed) => Self::seeded(seed, width, height),
            None => Self::new(width, height),
        };
        engine.with_config(config.clone())
    }
}

impl<R: Rng> FireworksEngine<R> {
    /// Create an engine that draws all randomness from `rng`.
    pub fn with_rng(rng: R, width: f64, height: f64) -> Self {
        Self {
            particles: Vec::new(),
            rng,
            viewport: DVec2::new(width, height),
            paused: false,
            config: ParticleConfig::default(),
            evicted: 0,
        }
    }

    /// Replace the simulation settings.
    pub fn with_config(mut self, config: ParticleConfig) -> Self {
        self.config = config;
        self
    }

    /// Current settings.
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Live sparks, in no particular order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live sparks.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    /// Viewport size in pixels.
    #[inline]
    pub fn viewport(&self) -> DVec2 {
        self.viewport
    }

    /// Track a new viewport size. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.viewport = DVec2::new(width, height);
        }
    }

    /// Whether spontaneous bursts are suppressed.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suppress (or allow) spontaneous bursts.
    ///
    /// Sparks already in flight keep moving either way.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Spawn one burst at `origin` and fire its sound cues.
    ///
    /// Returns the number of sparks added.
    pub fn spawn<C: SoundCues + ?Sized>(
        &mut self,
        cues: &mut C,
        origin: DVec2,
        color: BurstColor,
        kind: BurstKind,
    ) -> usize {
        cues.launch();
        cues.burst(kind.is_big(), self.config.burst_sound_delay());

        let before = self.particles.len();
        let added = spawn_burst(&mut self.rng, origin, color, kind, &mut self.particles);
        log::debug!(
            "{:?} burst of {} at ({:.0}, {:.0}), {} live",
            kind,
            added,
            origin.x,
            origin.y,
            self.particles.len()
        );

        self.enforce_cap(before);
        added
    }

    /// Spawn the finale burst.
    ///
    /// Missing coordinates default to the horizontal center and 40% down.
    pub fn trigger_big<C: SoundCues + ?Sized>(&mut self, cues: &mut C, x: Option<f64>, y: Option<f64>) {
        let default = self.viewport * BIG_ORIGIN;
        let origin = DVec2::new(x.unwrap_or(default.x), y.unwrap_or(default.y));
        self.spawn(cues, origin, BurstColor::Single(PALETTE[0]), BurstKind::Big);
    }

    /// Advance the show by one frame and record its drawing.
    ///
    /// `draw` is cleared first.
    pub fn tick<C: SoundCues + ?Sized>(&mut self, cues: &mut C, draw: &mut DrawList) -> TickStats {
        draw.clear();

        // Fade what is already there instead of clearing it.
        draw.push(DrawCommand::SetBlend(BlendMode::DestinationOut));
        draw.push(DrawCommand::FillRect {
            min: DVec2::ZERO,
            max: self.viewport,
            color: BACKGROUND,
            alpha: self.config.fade_alpha,
        });

        let mut spawned = 0;
        if !self.paused && self.rng.gen::<f64>() < self.config.spawn_probability {
            let origin = DVec2::new(
                self.rng.gen::<f64>() * self.viewport.x,
                self.rng.gen::<f64>() * self.viewport.y * 0.5,
            );
            let color = random_palette_color(&mut self.rng);
            spawned = self.spawn(cues, origin, BurstColor::Single(color), BurstKind::Normal);
        }

        draw.push(DrawCommand::SetBlend(BlendMode::Lighter));

        let mut expired = 0;
        let mut i = self.particles.len();
        while i > 0 {
            i -= 1;

            // Everything past `i` has already been visited, so pulling the
            // last element into the hole never skips a spark.
            if !self.particles[i].integrate() {
                self.particles.swap_remove(i);
                expired += 1;
                continue;
            }

            let p = &self.particles[i];
            let alpha = p.alpha as f32;
            draw.push(DrawCommand::StrokeLine {
                from: p.previous,
                to: p.position,
                width: p.size as f32,
                color: p.color,
                alpha,
            });

            if p.sparkle && self.rng.gen::<f64>() > 1.0 - SPARKLE_CHANCE {
                draw.push(DrawCommand::FillCircle {
                    center: p.position,
                    radius: (p.size * 2.0) as f32,
                    color: WHITE,
                    alpha,
                });
            }
        }

        TickStats {
            spawned,
            expired,
            evicted: std::mem::take(&mut self.evicted),
            live: self.particles.len(),
        }
    }

    /// Drop random sparks until the soft cap holds, oldest ones first.
    ///
    /// `fresh_from` is the index where the newest burst begins.
    fn enforce_cap(&mut self, fresh_from: usize) {
        let Some(cap) = self.config.max_particles else {
            return;
        };
        if self.particles.len() <= cap {
            return;
        }

        let mut older = fresh_from;
        let mut evicted = 0;
        while self.particles.len() > cap {
            if older > 0 {
                // Keep [0, older) made of pre-existing sparks only.
                let victim = self.rng.gen_range(0..older);
                older -= 1;
                self.particles.swap(victim, older);
                self.particles.swap_remove(older);
            } else {
                let victim = self.rng.gen_range(0..self.particles.len());
                self.particles.swap_remove(victim);
            }
            evicted += 1;
        }

        self.evicted += evicted;
        log::warn!("Particle cap {} reached, evicted {} sparks", cap, evicted);
    }
}
