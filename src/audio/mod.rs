//! Procedural sound effects.
//!
//! [`SoundEngine`] is the UI-thread handle. Every `play_*` call synthesizes
//! a fresh set of [`Voice`]s from a recipe in [`effects`] and hands them to
//! the [`Mixer`] over a lock-free queue; the mixer runs in the audio callback
//! and drops each voice once it has finished. No sound is ever stopped by
//! the caller. Sample memory released by the mixer is reclaimed here, on the
//! UI thread, by a `basedrop` collector.
//!
//! While the output is suspended nothing is queued: effects requested before
//! the first user gesture are skipped, not saved up.
//!
//! Audio is best-effort. If no output device can be opened the engine logs
//! a warning and every call becomes a silent no-op:
//!
//! ```no_run
//! use fireworks::audio::SoundEngine;
//! use fireworks::config::AudioConfig;
//!
//! let mut sound = SoundEngine::new(&AudioConfig::default());
//! sound.resume(); // from a user gesture
//! sound.play_click();
//! ```

#[cfg(feature = "audio-output")]
pub mod device;
pub mod effects;
pub mod filter;
pub mod mixer;
pub mod osc;
pub mod param;
pub mod voice;

use std::time::Duration;

use basedrop::Collector;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rtrb::{Producer, PushError};

use crate::config::AudioConfig;
use crate::engine::SoundCues;
use crate::error::{AudioError, AudioResult};

pub use effects::Effect;
pub use mixer::{Mixer, MixerCommand};
pub use param::AudioParam;
pub use voice::Voice;

/// Whether the output is producing sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Waiting for a user gesture.
    Suspended,
    /// Playing.
    Running,
}

enum Backend {
    #[cfg(feature = "audio-output")]
    Device(device::Output),
    /// The caller renders the mixer itself.
    Offline,
}

/// Handle for playing sound effects.
pub struct SoundEngine {
    backend: Option<Backend>,
    commands: Option<Producer<MixerCommand>>,
    state: ContextState,
    muted: bool,
    volume: f32,
    sample_rate: u32,
    rng: SmallRng,
    collector: Collector,
}

impl SoundEngine {
    /// Open the default output device.
    ///
    /// Failure is not fatal: it is logged and a silent engine is returned.
    pub fn new(config: &AudioConfig) -> Self {
        match Self::try_new(config) {
            Ok(engine) => engine,
            Err(e) => {
                log::warn!("Audio unavailable, continuing without sound: {}", e);
                Self::silent(config)
            }
        }
    }

    /// Open the default output device, reporting why it failed.
    pub fn try_new(config: &AudioConfig) -> AudioResult<Self> {
        if !config.enabled {
            return Err(AudioError::Disabled);
        }
        Self::open_device(config)
    }

    #[cfg(feature = "audio-output")]
    fn open_device(config: &AudioConfig) -> AudioResult<Self> {
        let (output, commands) = device::open(config)?;
        let state = if config.start_suspended {
            ContextState::Suspended
        } else {
            ContextState::Running
        };
        Ok(Self {
            sample_rate: output.sample_rate(),
            backend: Some(Backend::Device(output)),
            commands: Some(commands),
            state,
            muted: false,
            volume: config.volume,
            rng: SmallRng::from_entropy(),
            collector: Collector::new(),
        })
    }

    #[cfg(not(feature = "audio-output"))]
    fn open_device(_config: &AudioConfig) -> AudioResult<Self> {
        Err(AudioError::Disabled)
    }

    /// An engine with no output. Every effect is a no-op.
    pub fn silent(config: &AudioConfig) -> Self {
        Self {
            backend: None,
            commands: None,
            state: ContextState::Suspended,
            muted: false,
            volume: config.volume,
            sample_rate: config.sample_rate,
            rng: SmallRng::from_entropy(),
            collector: Collector::new(),
        }
    }

    /// An engine wired to a [`Mixer`] the caller renders by hand.
    ///
    /// The engine starts running at unit volume.
    pub fn offline(sample_rate: u32, seed: u64) -> (Self, Mixer) {
        let (commands, consumer) = mixer::command_channel();
        let engine = Self {
            backend: Some(Backend::Offline),
            commands: Some(commands),
            state: ContextState::Running,
            muted: false,
            volume: 1.0,
            sample_rate,
            rng: SmallRng::seed_from_u64(seed),
            collector: Collector::new(),
        };
        (engine, Mixer::new(consumer, sample_rate, 1.0))
    }

    /// Whether an output is attached.
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Current context state.
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Whether effects are currently suppressed.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Start the output if it is suspended.
    ///
    /// Safe to call on every user gesture. Errors are logged.
    pub fn resume(&mut self) {
        if self.state == ContextState::Running {
            return;
        }
        match &self.backend {
            #[cfg(feature = "audio-output")]
            Some(Backend::Device(output)) => match output.play() {
                Ok(()) => {
                    log::info!("Audio resumed");
                    self.state = ContextState::Running;
                }
                Err(e) => log::error!("{}", e),
            },
            Some(Backend::Offline) => self.state = ContextState::Running,
            None => {}
        }
    }

    /// Pause the output until the next [`resume`](Self::resume).
    ///
    /// Voices already in the mixer pick up where they left off.
    pub fn suspend(&mut self) {
        if self.state == ContextState::Suspended {
            return;
        }
        match &self.backend {
            #[cfg(feature = "audio-output")]
            Some(Backend::Device(output)) => match output.pause() {
                Ok(()) => {
                    log::info!("Audio suspended");
                    self.state = ContextState::Suspended;
                }
                Err(e) => log::error!("{}", e),
            },
            Some(Backend::Offline) => self.state = ContextState::Suspended,
            None => {}
        }
    }

    /// Free sample buffers the mixer has finished with.
    ///
    /// Called on every scheduled effect; the front-end also calls it once
    /// per frame.
    pub fn collect_garbage(&mut self) {
        self.collector.collect();
    }

    /// Mute or unmute.
    ///
    /// The master gain glides to 0 or back to the configured volume, and
    /// effects requested while muted are not played at all.
    pub fn set_mute(&mut self, muted: bool) {
        self.muted = muted;
        let target = if muted { 0.0 } else { self.volume };
        self.send(MixerCommand::SetMaster { target });
    }

    /// Play `effect` after `delay` on the audio clock.
    ///
    /// Returns `false` when nothing was queued: no output, suspended, muted,
    /// or the command queue is full.
    pub fn schedule(&mut self, effect: Effect, delay: Duration) -> bool {
        if self.muted || self.state == ContextState::Suspended || self.commands.is_none() {
            return false;
        }
        self.collect_garbage();
        let gc = self.collector.handle();
        let voices = effects::build(effect, self.sample_rate as f32, &gc, &mut self.rng);
        self.send(MixerCommand::Play {
            voices,
            delay: delay.as_secs_f64(),
        })
    }

    /// Play `effect` now.
    #[inline]
    pub fn play(&mut self, effect: Effect) -> bool {
        self.schedule(effect, Duration::ZERO)
    }

    /// Launch whistle.
    pub fn play_launch(&mut self) {
        self.play(Effect::Launch);
    }

    /// Burst sizzle, with a low thump when `big`.
    pub fn play_firework(&mut self, big: bool) {
        self.play(Effect::Firework { big });
    }

    /// Faint neon buzz.
    pub fn play_neon_flicker(&mut self) {
        self.play(Effect::NeonFlicker);
    }

    /// UI click.
    pub fn play_click(&mut self) {
        self.play(Effect::Click);
    }

    /// Exit whoosh.
    pub fn play_whoosh(&mut self) {
        self.play(Effect::Whoosh);
    }

    fn send(&mut self, command: MixerCommand) -> bool {
        let Some(commands) = &mut self.commands else {
            return false;
        };
        match commands.push(command) {
            Ok(()) => true,
            Err(PushError::Full(_)) => {
                log::warn!("Audio command queue full, dropping sound");
                false
            }
        }
    }
}

impl SoundCues for SoundEngine {
    fn launch(&mut self) {
        self.play_launch();
    }

    fn burst(&mut self, big: bool, delay: Duration) {
        self.schedule(Effect::Firework { big }, delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_engine_ignores_everything() {
        let mut sound = SoundEngine::silent(&AudioConfig::default());
        assert!(!sound.is_available());
        assert!(!sound.play(Effect::Click));
        sound.resume();
        assert_eq!(sound.state(), ContextState::Suspended);
    }

    #[test]
    fn test_disabled_config_is_an_error() {
        let config = AudioConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(matches!(SoundEngine::try_new(&config), Err(AudioError::Disabled)));
        assert!(!SoundEngine::new(&config).is_available());
    }

    #[test]
    fn test_muted_engine_queues_nothing() {
        let (mut sound, mut mixer) = SoundEngine::offline(8000, 1);
        sound.set_mute(true);
        assert!(!sound.play(Effect::Whoosh));
        mixer.render_mono(8);
        assert_eq!(mixer.voice_count(), 0);
    }

    #[test]
    fn test_full_queue_drops_effects() {
        let (mut sound, _mixer) = SoundEngine::offline(8000, 1);
        let queued = (0..300).filter(|_| sound.play(Effect::Click)).count();
        assert_eq!(queued, mixer::COMMAND_QUEUE_CAPACITY);
    }

    #[test]
    fn test_suspended_engine_queues_nothing() {
        let (mut sound, mut mixer) = SoundEngine::offline(8000, 2);
        sound.suspend();
        assert_eq!(sound.state(), ContextState::Suspended);

        let queued = (0..300).filter(|_| sound.play(Effect::Launch)).count();
        assert_eq!(queued, 0);

        sound.resume();
        assert!(sound.play(Effect::Click));
        mixer.render_mono(1);
        assert_eq!(mixer.voice_count(), 1);
    }
}
