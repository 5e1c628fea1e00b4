//! One sounding chain: source, optional filter, gain.

use super::filter::FilterStage;
use super::osc::Source;
use super::param::AudioParam;

/// Frames between filter coefficient updates.
pub const CONTROL_BLOCK: u64 = 32;

/// A self-contained sound that ends on its own.
///
/// Times passed to [`next`](Voice::next) are seconds since the voice started.
#[derive(Debug, Clone)]
pub struct Voice {
    source: Source,
    filter: Option<FilterStage>,
    /// Output level.
    pub gain: AudioParam,
    stop_at: f64,
    frames: u64,
}

impl Voice {
    /// A voice playing `source` at unity gain until `stop_at` seconds.
    pub fn new(source: Source, stop_at: f64) -> Self {
        Self {
            source,
            filter: None,
            gain: AudioParam::new(1.0),
            stop_at,
            frames: 0,
        }
    }

    /// Route the source through `filter`.
    pub fn with_filter(mut self, filter: FilterStage) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Replace the gain curve.
    pub fn with_gain(mut self, gain: AudioParam) -> Self {
        self.gain = gain;
        self
    }

    /// Local time at which the voice falls silent for good.
    #[inline]
    pub fn stop_at(&self) -> f64 {
        self.stop_at
    }

    /// Whether the voice is done at local time `t`.
    #[inline]
    pub fn is_finished(&self, t: f64) -> bool {
        t >= self.stop_at
    }

    /// Render the sample at local time `t`.
    pub fn next(&mut self, t: f64, sample_rate: f32) -> f32 {
        if self.is_finished(t) {
            return 0.0;
        }

        let mut sample = self.source.next(t, sample_rate);
        if let Some(filter) = &mut self.filter {
            if self.frames % CONTROL_BLOCK == 0 {
                filter.update(t, sample_rate);
            }
            sample = filter.process(sample);
        }
        self.frames += 1;

        sample * self.gain.value_at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::osc::{Oscillator, Waveform};

    #[test]
    fn test_voice_is_silent_after_stop() {
        let mut v = Voice::new(Source::Tone(Oscillator::new(Waveform::Triangle, 1.0)), 1.0);
        assert!(!v.is_finished(0.5));
        assert!(v.is_finished(1.0));
        assert_eq!(v.next(1.0, 4.0), 0.0);
    }

    #[test]
    fn test_gain_scales_output() {
        let mut gain = AudioParam::new(0.0);
        gain.set_value_at(0.5, 0.0);
        let mut v = Voice::new(Source::Tone(Oscillator::new(Waveform::Triangle, 1.0)), 10.0).with_gain(gain);

        // triangle at phase 0, 0.25
        assert_eq!(v.next(0.0, 4.0), 0.0);
        assert_eq!(v.next(0.25, 4.0), 0.5);
    }
}
