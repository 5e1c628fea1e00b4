//! Sound sources.
//!
//! Waveforms are pure functions of phase in `[0, 1)`; [`Oscillator`] carries
//! the running phase and an automated frequency.

use std::f32::consts::TAU;
use std::fmt;

use basedrop::{Handle, Shared};
use rand::Rng;

use super::param::AudioParam;

/// Sine wave, `[-1, 1]`.
#[inline]
pub fn sine(phase: f32) -> f32 {
    (phase * TAU).sin()
}

/// Triangle wave, `[-1, 1]`. Starts at zero and rises, like the sine.
#[inline]
pub fn triangle(phase: f32) -> f32 {
    let p = phase.fract();
    if p < 0.25 {
        4.0 * p
    } else if p < 0.75 {
        2.0 - 4.0 * p
    } else {
        4.0 * p - 4.0
    }
}

/// Periodic waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Pure tone.
    Sine,
    /// Odd harmonics rolling off at 12 dB/octave.
    Triangle,
}

impl Waveform {
    /// Evaluate at `phase`.
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => sine(phase),
            Waveform::Triangle => triangle(phase),
        }
    }
}

/// Frequency ratio for a detune in cents.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    2f32.powf(cents / 1200.0)
}

/// A periodic oscillator with an automated frequency.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    /// Frequency in Hz.
    pub frequency: AudioParam,
    ratio: f32,
    phase: f64,
}

impl Oscillator {
    /// An oscillator at `frequency` Hz.
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency: AudioParam::new(frequency),
            ratio: 1.0,
            phase: 0.0,
        }
    }

    /// Shift the pitch by `cents`.
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.ratio = cents_to_ratio(cents);
        self
    }

    /// Produce the sample at local time `t` and advance one frame.
    #[inline]
    pub fn next(&mut self, t: f64, sample_rate: f32) -> f32 {
        let out = self.waveform.sample(self.phase as f32);
        let freq = self.frequency.value_at(t) * self.ratio;
        self.phase = (self.phase + (freq / sample_rate) as f64).fract();
        out
    }
}

/// A buffer of uniform white noise in `[-1, 1]`, played once.
///
/// The samples live in a [`Shared`] allocation. Dropping a finished buffer
/// on the audio thread only enqueues it; the memory is freed when the owning
/// [`basedrop::Collector`] collects.
#[derive(Clone)]
pub struct NoiseBuffer {
    samples: Shared<Vec<f32>>,
    cursor: usize,
}

impl NoiseBuffer {
    /// Fill `duration` seconds of noise from `rng`.
    pub fn generate<R: Rng + ?Sized>(gc: &Handle, rng: &mut R, duration: f64, sample_rate: f32) -> Self {
        let len = (duration * sample_rate as f64).round() as usize;
        let samples: Vec<f32> = (0..len).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        Self {
            samples: Shared::new(gc, samples),
            cursor: 0,
        }
    }

    /// Length in frames.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Next sample, or silence once the buffer is exhausted.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let out = self.samples.get(self.cursor).copied().unwrap_or(0.0);
        self.cursor += 1;
        out
    }
}

// Shared doesn't implement Debug.
impl fmt::Debug for NoiseBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseBuffer")
            .field("len", &self.samples.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// What feeds a voice.
#[derive(Debug, Clone)]
pub enum Source {
    /// A one-shot noise buffer.
    Noise(NoiseBuffer),
    /// A periodic oscillator.
    Tone(Oscillator),
}

impl Source {
    /// Next sample at local time `t`.
    #[inline]
    pub fn next(&mut self, t: f64, sample_rate: f32) -> f32 {
        match self {
            Source::Noise(noise) => noise.next(),
            Source::Tone(osc) => osc.next(t, sample_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basedrop::Collector;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_triangle_shape() {
        assert_eq!(triangle(0.0), 0.0);
        assert_eq!(triangle(0.25), 1.0);
        assert_eq!(triangle(0.5), 0.0);
        assert_eq!(triangle(0.75), -1.0);
        assert!(triangle(0.999).abs() < 0.01);
    }

    #[test]
    fn test_cents() {
        assert_eq!(cents_to_ratio(0.0), 1.0);
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_oscillator_period() {
        // 1 Hz at 4 samples per second: 0, 1, 0, -1
        let mut osc = Oscillator::new(Waveform::Triangle, 1.0);
        let out: Vec<f32> = (0..4).map(|i| osc.next(i as f64 / 4.0, 4.0)).collect();
        assert_eq!(out, vec![0.0, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_noise_is_bounded_and_one_shot() {
        let collector = Collector::new();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut noise = NoiseBuffer::generate(&collector.handle(), &mut rng, 0.5, 1000.0);
        assert_eq!(noise.len(), 500);
        for _ in 0..500 {
            assert!((-1.0..=1.0).contains(&noise.next()));
        }
        assert_eq!(noise.next(), 0.0);
    }
}
