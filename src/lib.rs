//! # Fireworks
//!
//! A 2D particle fireworks show with procedurally synthesized sound.
//!
//! The crate is split the same way a frame is:
//!
//! - [`FireworksEngine`] owns the sparks. Each [`tick`](FireworksEngine::tick)
//!   maybe spawns a burst, integrates every spark, removes the faded ones and
//!   records canvas instructions into a [`DrawList`].
//! - [`SoundEngine`](audio::SoundEngine) plays short synthesized effects on a
//!   separate audio clock. The engine reaches it through the [`SoundCues`]
//!   trait, so tests can pass `()` (silence) or a recorder instead.
//! - [`gpu::Renderer`] turns a [`DrawList`] into pixels with wgpu, and
//!   [`window::run`] ties it all to a winit window.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fireworks::config::ShowConfig;
//!
//! fn main() -> Result<(), fireworks::ShowError> {
//!     fireworks::window::run(ShowConfig::default())
//! }
//! ```
//!
//! ## Headless use
//!
//! The simulation never touches the GPU, so it runs anywhere:
//!
//! ```
//! use fireworks::prelude::*;
//!
//! let mut engine = FireworksEngine::seeded(7, 800.0, 600.0);
//! let mut draw = DrawList::new();
//! engine.set_paused(true);
//!
//! engine.spawn(&mut (), DVec2::new(400.0, 200.0), BurstColor::Single(PALETTE[3]), BurstKind::Normal);
//! for _ in 0..400 {
//!     engine.tick(&mut (), &mut draw);
//! }
//! // Normal sparks fade within 200 ticks.
//! assert_eq!(engine.live_count(), 0);
//! ```
//!
//! ## Sparks
//!
//! | | normal burst | big burst |
//! |---|---|---|
//! | sparks | 100 to 150 | 600 |
//! | color | one palette color | random per spark |
//! | friction | 0.96 | 0.975 |
//! | lifetime | 59 to 200 ticks | 143 to 500 ticks |

pub mod audio;
pub mod config;
pub mod draw;
pub mod engine;
mod error;
pub mod gpu;
pub mod particle;
pub mod spawn;
pub mod visuals;
pub mod window;

pub use config::ShowConfig;
pub use draw::{DrawCommand, DrawList};
pub use engine::{FireworksEngine, SoundCues, TickStats};
pub use error::{AudioError, AudioResult, ConfigError, GpuError, ShowError};
pub use glam::{DVec2, Vec3};
pub use particle::Particle;
pub use spawn::{BurstColor, BurstKind};
pub use visuals::{BlendMode, BACKGROUND, PALETTE};

/// Convenient re-exports for common usage.
///
/// ```
/// use fireworks::prelude::*;
/// ```
pub mod prelude {
    pub use crate::audio::{Effect, SoundEngine};
    pub use crate::config::ShowConfig;
    pub use crate::draw::{DrawCommand, DrawList};
    pub use crate::engine::{FireworksEngine, SoundCues, TickStats};
    pub use crate::spawn::{BurstColor, BurstKind};
    pub use crate::visuals::{BlendMode, PALETTE};
    pub use crate::{DVec2, Vec3};
}
