//! Error types.
//!
//! Drawing and audio both fail the same way: the host has no usable device.
//! For drawing that is fatal ([`GpuError`] aborts start-up). For audio it is
//! not: [`SoundEngine`](crate::audio::SoundEngine) logs the [`AudioError`] and
//! turns every effect into a silent no-op.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface offers no texture format.
    #[error("GPU surface reports no supported texture formats")]
    NoSurfaceFormat,
}

/// Errors that can occur while opening the audio output.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Audio was turned off in the configuration or at build time.
    #[error("Audio output is disabled")]
    Disabled,

    /// No output device available.
    #[error("No audio output device found")]
    NoDevice,

    /// Failed to query the device configuration.
    #[error("Failed to get device config: {0}")]
    Config(String),

    /// The device only offers sample formats we do not render.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Failed to build the output stream.
    #[error("Failed to build audio stream: {0}")]
    StreamBuild(String),

    /// Failed to start the output stream.
    #[error("Failed to start audio stream: {0}")]
    StreamPlay(String),

    /// Failed to pause the output stream.
    #[error("Failed to pause audio stream: {0}")]
    StreamPause(String),
}

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`ShowConfig`](crate::config::ShowConfig).
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },
}

/// Errors that can occur when running the show.
#[derive(Error, Debug)]
pub enum ShowError {
    /// Failed to create event loop.
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;
