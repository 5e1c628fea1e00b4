//! Biquad filters.
//!
//! Coefficients use the RBJ cookbook formulas. Resonance for low-pass is
//! given in decibels the way browser audio APIs take it; band-pass takes a
//! plain linear Q.

use std::f32::consts::PI;

use super::param::AudioParam;

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    /// Feedforward coefficient b0.
    pub b0: f32,
    /// Feedforward coefficient b1.
    pub b1: f32,
    /// Feedforward coefficient b2.
    pub b2: f32,
    /// Feedback coefficient a1.
    pub a1: f32,
    /// Feedback coefficient a2.
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Low-pass at `cutoff` Hz with linear `q`.
    pub fn lowpass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let (sin_w, cos_w) = omega(cutoff, sample_rate);
        let alpha = sin_w / (2.0 * q);

        let b1 = 1.0 - cos_w;
        Self::normalize(b1 / 2.0, b1, b1 / 2.0, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
    }

    /// Band-pass (constant 0 dB peak) centered on `center` Hz.
    pub fn bandpass(center: f32, q: f32, sample_rate: f32) -> Self {
        let (sin_w, cos_w) = omega(center, sample_rate);
        let alpha = sin_w / (2.0 * q);

        Self::normalize(alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
    }

    fn normalize(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

// Frequencies outside (0, nyquist) blow the filter up.
fn omega(freq: f32, sample_rate: f32) -> (f32, f32) {
    let nyquist = sample_rate * 0.5;
    let freq = freq.clamp(1.0, nyquist * 0.999);
    let w = 2.0 * PI * freq / sample_rate;
    (w.sin(), w.cos())
}

/// Convert a resonance in dB to a linear Q.
#[inline]
pub fn db_to_q(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Biquad state, transposed direct form II.
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    z1: f32,
    z2: f32,
}

impl Biquad {
    /// A filter with the given coefficients and silent history.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Swap coefficients, keeping the history.
    #[inline]
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let out = c.b0 * input + self.z1;
        self.z1 = c.b1 * input - c.a1 * out + self.z2;
        self.z2 = c.b2 * input - c.a2 * out;
        out
    }
}

/// Filter response type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    /// Low-pass with resonance in dB.
    Lowpass { q_db: f32 },
    /// Band-pass with linear Q.
    Bandpass { q: f32 },
}

impl FilterKind {
    fn coeffs(self, freq: f32, sample_rate: f32) -> BiquadCoeffs {
        match self {
            FilterKind::Lowpass { q_db } => BiquadCoeffs::lowpass(freq, db_to_q(q_db), sample_rate),
            FilterKind::Bandpass { q } => BiquadCoeffs::bandpass(freq, q, sample_rate),
        }
    }
}

/// A biquad whose frequency is automated.
#[derive(Debug, Clone)]
pub struct FilterStage {
    kind: FilterKind,
    /// Cutoff or center frequency in Hz.
    pub frequency: AudioParam,
    biquad: Biquad,
}

impl FilterStage {
    /// A filter of `kind` starting at `frequency` Hz.
    pub fn new(kind: FilterKind, frequency: f32, sample_rate: f32) -> Self {
        Self {
            kind,
            frequency: AudioParam::new(frequency),
            biquad: Biquad::new(kind.coeffs(frequency, sample_rate)),
        }
    }

    /// Recompute coefficients from the frequency curve at time `t`.
    pub fn update(&mut self, t: f64, sample_rate: f32) {
        let freq = self.frequency.value_at(t);
        self.biquad.set_coeffs(self.kind.coeffs(freq, sample_rate));
    }

    /// Filter one sample with the current coefficients.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.biquad.process(input)
    }
}
