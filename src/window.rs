//! Window and event loop for the fireworks show.
//!
//! [`App`] drives everything from winit's redraw cycle: one engine tick and
//! one rendered frame per `RedrawRequested`, after which the next redraw is
//! requested immediately (vsync paces the loop).
//!
//! | Input | Action |
//! |---|---|
//! | Left click | Big burst at the cursor (also unlocks audio) |
//! | Space | Big burst at the default spot |
//! | P | Pause/resume spontaneous bursts |
//! | M | Mute/unmute |
//! | C | Click sound |
//! | N | Neon flicker sound |
//! | W | Whoosh sound |
//! | Escape | Quit |

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::audio::SoundEngine;
use crate::config::ShowConfig;
use crate::draw::DrawList;
use crate::engine::FireworksEngine;
use crate::error::ShowError;
use crate::gpu::Renderer;

/// Open a window and run the show until it is closed.
pub fn run(config: ShowConfig) -> Result<(), ShowError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// winit application state.
pub struct App {
    config: ShowConfig,
    engine: FireworksEngine,
    sound: SoundEngine,
    draw: DrawList,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    cursor: PhysicalPosition<f64>,
    error: Option<ShowError>,
}

impl App {
    /// Build the engines. The window is created once the event loop resumes.
    pub fn new(config: ShowConfig) -> Self {
        let engine = FireworksEngine::from_config(
            &config.particles,
            config.window.width as f64,
            config.window.height as f64,
        );
        let sound = SoundEngine::new(&config.audio);

        Self {
            config,
            engine,
            sound,
            draw: DrawList::new(),
            window: None,
            renderer: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ShowError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ShowError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        log::info!("Created window {}x{}", size.width, size.height);

        let renderer = pollster::block_on(Renderer::new(window.clone()))?;
        self.engine.resize(size.width as f64, size.height as f64);

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: &Key) {
        // Any key press counts as a gesture that may start audio.
        self.sound.resume();
        match key {
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Named(NamedKey::Space) => self.engine.trigger_big(&mut self.sound, None, None),
            Key::Character(c) => match c.to_ascii_lowercase().as_str() {
                "p" => {
                    let paused = !self.engine.is_paused();
                    self.engine.set_paused(paused);
                    log::info!("Show {}", if paused { "paused" } else { "resumed" });
                }
                "m" => {
                    let muted = !self.sound.is_muted();
                    self.sound.set_mute(muted);
                    log::info!("Sound {}", if muted { "muted" } else { "unmuted" });
                }
                "c" => self.sound.play_click(),
                "n" => self.sound.play_neon_flicker(),
                "w" => self.sound.play_whoosh(),
                _ => {}
            },
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let stats = self.engine.tick(&mut self.sound, &mut self.draw);
        if stats.spawned > 0 || stats.evicted > 0 {
            log::debug!("Tick: {:?}", stats);
        }
        self.sound.collect_garbage();

        if let Some(renderer) = &mut self.renderer {
            match renderer.render(&self.draw) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    renderer.resize(renderer.size());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.engine
                    .resize(physical_size.width as f64, physical_size.height as f64);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.sound.resume();
                self.engine
                    .trigger_big(&mut self.sound, Some(self.cursor.x), Some(self.cursor.y));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.on_key(event_loop, &logical_key);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Surface before window.
        self.renderer = None;
        self.window = None;
    }
}
