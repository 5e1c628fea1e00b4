//! The audio-thread side of the sound engine.
//!
//! ```text
//! ┌──────────────┐  push()   ┌────────────────────┐  pop()   ┌──────────────────┐
//! │ SoundEngine  │──────────►│   MixerCommand     │─────────►│  Mixer (audio    │
//! │ (UI thread)  │           │  queue (SPSC, 256) │          │  callback thread)│
//! └──────────────┘           └────────────────────┘          └──────────────────┘
//! ```
//!
//! The mixer owns every playing voice. Nothing is shared; the UI thread only
//! ever sends commands.
//!
//! The voice list is allocated once, up front. Effects that would overflow it
//! are dropped rather than grown into, and noise buffers are `basedrop`
//! allocations, so the callback neither allocates nor frees sample memory.

use rtrb::{Consumer, Producer, RingBuffer};

use super::param::AudioParam;
use super::voice::Voice;

/// Capacity of the command queue.
pub const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Most voices the mixer plays at once.
pub const MAX_VOICES: usize = 128;

/// Time constant of master gain changes, in seconds.
pub const MASTER_TAU: f64 = 0.1;

/// Messages from the UI thread to the mixer.
#[derive(Debug)]
pub enum MixerCommand {
    /// Start `voices` together, `delay` seconds after the command is received.
    Play {
        /// Voices of one effect.
        voices: Vec<Voice>,
        /// Start offset in seconds.
        delay: f64,
    },
    /// Glide the master gain toward `target`.
    SetMaster {
        /// Target gain.
        target: f32,
    },
}

/// Create the command queue.
pub fn command_channel() -> (Producer<MixerCommand>, Consumer<MixerCommand>) {
    RingBuffer::new(COMMAND_QUEUE_CAPACITY)
}

struct Scheduled {
    start_frame: u64,
    voice: Voice,
}

impl Scheduled {
    // Local time of the voice at `frame`, or `None` before it starts.
    #[inline]
    fn local_time(&self, frame: u64, rate: f64) -> Option<f64> {
        frame
            .checked_sub(self.start_frame)
            .map(|elapsed| elapsed as f64 / rate)
    }
}

/// Mono voice mixer with a master gain.
pub struct Mixer {
    commands: Consumer<MixerCommand>,
    voices: Vec<Scheduled>,
    master: AudioParam,
    sample_rate: f32,
    frame: u64,
    dropped: u64,
}

impl Mixer {
    /// A mixer draining `commands`, starting at master gain `volume`.
    pub fn new(commands: Consumer<MixerCommand>, sample_rate: u32, volume: f32) -> Self {
        Self {
            commands,
            voices: Vec::with_capacity(MAX_VOICES),
            master: AudioParam::new(volume),
            sample_rate: sample_rate as f32,
            frame: 0,
            dropped: 0,
        }
    }

    /// Seconds rendered so far.
    #[inline]
    pub fn now(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    /// Output sample rate.
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Voices playing or waiting for their start time.
    #[inline]
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    /// Effects discarded because the voice list was full.
    #[inline]
    pub fn dropped_effects(&self) -> u64 {
        self.dropped
    }

    /// Current master gain.
    pub fn master_gain(&self) -> f32 {
        self.master.value_at(self.now())
    }

    fn drain_commands(&mut self) {
        let now = self.now();
        while let Ok(command) = self.commands.pop() {
            match command {
                MixerCommand::Play { voices, delay } => {
                    if self.voices.len() + voices.len() > MAX_VOICES {
                        self.dropped += 1;
                        continue;
                    }
                    // Start on a whole frame so voice-local time is exact.
                    let offset = (delay.max(0.0) * self.sample_rate as f64).round() as u64;
                    let start_frame = self.frame + offset;
                    for voice in voices {
                        self.voices.push(Scheduled { start_frame, voice });
                    }
                }
                MixerCommand::SetMaster { target } => {
                    self.master.cancel_and_hold_at(now);
                    self.master.set_target_at(target, now, MASTER_TAU);
                }
            }
        }
    }

    /// Render interleaved audio into `out` with `channels` channels.
    ///
    /// Every channel gets the same mono mix, clamped to `[-1, 1]`.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        self.drain_commands();

        let channels = channels.max(1);
        let rate = self.sample_rate as f64;
        for frame in out.chunks_mut(channels) {
            let now = self.frame as f64 / rate;

            let mut mix = 0.0;
            for scheduled in &mut self.voices {
                if let Some(t) = scheduled.local_time(self.frame, rate) {
                    mix += scheduled.voice.next(t, self.sample_rate);
                }
            }
            let sample = (mix * self.master.value_at(now)).clamp(-1.0, 1.0);
            frame.fill(sample);

            self.frame += 1;
        }

        self.retire_finished();
    }

    /// Render `frames` frames of mono output into a new buffer.
    pub fn render_mono(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.render(&mut out, 1);
        out
    }

    fn retire_finished(&mut self) {
        let rate = self.sample_rate as f64;
        let mut i = self.voices.len();
        while i > 0 {
            i -= 1;
            let scheduled = &self.voices[i];
            let done = scheduled
                .local_time(self.frame, rate)
                .is_some_and(|t| scheduled.voice.is_finished(t));
            if done {
                self.voices.swap_remove(i);
            }
        }
    }
}
