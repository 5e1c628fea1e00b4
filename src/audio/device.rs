//! cpal output stream.
//!
//! Opens the default output device, picks an f32 configuration close to the
//! preferred sample rate and moves a [`Mixer`] into the stream callback.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, Stream, StreamConfig, SupportedStreamConfig};
use rtrb::Producer;

use super::mixer::{command_channel, Mixer, MixerCommand};
use crate::config::AudioConfig;
use crate::error::{AudioError, AudioResult};

/// A live output stream. Dropping it stops audio.
pub struct Output {
    stream: Stream,
    sample_rate: u32,
    channels: u16,
}

impl Output {
    /// Sample rate negotiated with the device.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Device channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Start (or restart) the stream.
    pub fn play(&self) -> AudioResult<()> {
        self.stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))
    }

    /// Pause the stream. The mixer keeps its voices.
    pub fn pause(&self) -> AudioResult<()> {
        self.stream
            .pause()
            .map_err(|e| AudioError::StreamPause(e.to_string()))
    }
}

/// Open the default device and start a mixer on it.
///
/// Returns the stream and the producer end of the mixer's command queue. The
/// stream is left paused when `config.start_suspended` is set.
pub fn open(config: &AudioConfig) -> AudioResult<(Output, Producer<MixerCommand>)> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using audio device: {}", device_name);

    let supported = output_config(&device, config.sample_rate)?;
    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels();
    let stream_config: StreamConfig = supported.into();

    log::info!("Audio config: {} channels, {}Hz", channels, sample_rate);

    let (producer, consumer) = command_channel();
    let mut mixer = Mixer::new(consumer, sample_rate, config.volume);

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                mixer.render(data, channels as usize);
            },
            move |err| {
                log::error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

    // Some backends start playing as soon as the stream is built.
    if config.start_suspended {
        if let Err(e) = stream.pause() {
            log::debug!("Could not pause new audio stream: {}", e);
        }
    } else {
        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;
    }

    Ok((
        Output {
            stream,
            sample_rate,
            channels,
        },
        producer,
    ))
}

fn output_config(device: &cpal::Device, preferred_rate: u32) -> AudioResult<SupportedStreamConfig> {
    let supported: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| AudioError::Config(e.to_string()))?
        .filter(|c| c.sample_format() == SampleFormat::F32)
        .collect();

    let best = supported
        .iter()
        .find(|c| (c.min_sample_rate().0..=c.max_sample_rate().0).contains(&preferred_rate))
        .or_else(|| supported.first())
        .ok_or_else(|| AudioError::UnsupportedFormat("device offers no f32 output".to_string()))?;

    let rate = if (best.min_sample_rate().0..=best.max_sample_rate().0).contains(&preferred_rate) {
        SampleRate(preferred_rate)
    } else {
        let fallback = best.max_sample_rate();
        log::warn!(
            "Audio device doesn't support {}Hz, falling back to {}Hz",
            preferred_rate,
            fallback.0
        );
        fallback
    };

    Ok(best.clone().with_sample_rate(rate))
}
