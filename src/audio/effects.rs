//! The sound effect recipes.
//!
//! Each [`Effect`] expands into a handful of [`Voice`]s whose curves are laid
//! out on the voice-local clock (0 = start). Nothing here touches a device, so
//! recipes can be rendered offline in tests.

use basedrop::Handle;
use rand::Rng;

use super::filter::{FilterKind, FilterStage};
use super::osc::{NoiseBuffer, Oscillator, Source, Waveform};
use super::param::AudioParam;
use super::voice::Voice;

/// Longest any effect sounds, in seconds.
pub const MAX_EFFECT_DURATION: f64 = 1.5;

/// A one-shot sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Rising whistle of a shell leaving the ground.
    Launch,
    /// The explosion; `big` is deeper, louder and longer with a low thump.
    Firework {
        /// Finale variant.
        big: bool,
    },
    /// A short faint buzz from a neon sign.
    NeonFlicker,
    /// UI click.
    Click,
    /// Layered rising sweep with a chime.
    Whoosh,
}

/// Build the voices for `effect`.
///
/// Noise buffers are allocated against `gc` so the audio thread never frees them.
pub fn build<R: Rng + ?Sized>(effect: Effect, sample_rate: f32, gc: &Handle, rng: &mut R) -> Vec<Voice> {
    match effect {
        Effect::Launch => vec![launch(sample_rate, gc, rng)],
        Effect::Firework { big } => firework(big, sample_rate, gc, rng),
        Effect::NeonFlicker => vec![neon_flicker(rng)],
        Effect::Click => vec![click()],
        Effect::Whoosh => whoosh(),
    }
}

// Hold `start` at 0, then ramp exponentially to `end` at `at`.
fn exp_curve(start: f32, end: f32, at: f64) -> AudioParam {
    let mut p = AudioParam::new(start);
    p.set_value_at(start, 0.0).exponential_ramp_to(end, at);
    p
}

fn launch<R: Rng + ?Sized>(sample_rate: f32, gc: &Handle, rng: &mut R) -> Voice {
    const DURATION: f64 = 0.5;

    let mut filter = FilterStage::new(FilterKind::Bandpass { q: 1.0 }, 400.0, sample_rate);
    filter.frequency = exp_curve(400.0, 2500.0, DURATION);

    let mut gain = AudioParam::new(0.05);
    gain.set_value_at(0.05, 0.0).linear_ramp_to(0.0, DURATION);

    let noise = NoiseBuffer::generate(gc, rng, DURATION, sample_rate);
    Voice::new(Source::Noise(noise), DURATION)
        .with_filter(filter)
        .with_gain(gain)
}

fn firework<R: Rng + ?Sized>(big: bool, sample_rate: f32, gc: &Handle, rng: &mut R) -> Vec<Voice> {
    let (duration, cutoff, q_db, volume) = if big {
        (1.5, 1200.0, 10.0, 0.4)
    } else {
        (0.8, 3000.0, 2.0, 0.15)
    };

    let mut filter = FilterStage::new(FilterKind::Lowpass { q_db }, cutoff, sample_rate);
    filter.frequency = exp_curve(cutoff, 40.0, duration);

    let noise = NoiseBuffer::generate(gc, rng, duration, sample_rate);
    let burst = Voice::new(Source::Noise(noise), duration)
        .with_filter(filter)
        .with_gain(exp_curve(volume, 0.001, duration));

    if !big {
        return vec![burst];
    }

    const THUMP: f64 = 0.4;
    let mut osc = Oscillator::new(Waveform::Sine, 60.0);
    osc.frequency = exp_curve(60.0, 30.0, THUMP);
    let thump = Voice::new(Source::Tone(osc), THUMP).with_gain(exp_curve(0.3, 0.001, THUMP));

    vec![burst, thump]
}

fn neon_flicker<R: Rng + ?Sized>(rng: &mut R) -> Voice {
    let freq = 1500.0 + rng.gen::<f32>() * 500.0;
    Voice::new(Source::Tone(Oscillator::new(Waveform::Sine, freq)), 0.05)
        .with_gain(exp_curve(0.008, 0.0001, 0.04))
}

fn click() -> Voice {
    const DURATION: f64 = 0.1;
    let mut osc = Oscillator::new(Waveform::Sine, 800.0);
    osc.frequency = exp_curve(800.0, 400.0, DURATION);
    Voice::new(Source::Tone(osc), DURATION).with_gain(exp_curve(0.05, 0.001, DURATION))
}

fn whoosh() -> Vec<Voice> {
    const DURATION: f64 = 1.2;
    const CHIME: f64 = 0.5;

    let layer = |waveform, from: f32, to: f32, level: f32, cents: f32| {
        let mut osc = Oscillator::new(waveform, from).with_detune(cents);
        osc.frequency = exp_curve(from, to, DURATION);
        Voice::new(Source::Tone(osc), DURATION).with_gain(exp_curve(level, 0.0001, DURATION))
    };

    let chime = Voice::new(Source::Tone(Oscillator::new(Waveform::Sine, 3000.0)), CHIME)
        .with_gain(exp_curve(0.02, 0.0001, CHIME));

    vec![
        layer(Waveform::Triangle, 150.0, 2000.0, 0.04, 0.0),
        layer(Waveform::Sine, 155.0, 2050.0, 0.03, 10.0),
        layer(Waveform::Sine, 800.0, 4000.0, 0.02, -5.0),
        chime,
    ]
}
