use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use grid_raycaster::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};
use grid_raycaster::{Config, Framebuffer, Game, GridMap, TextureAtlas};

mod input;

const MAP_ENV: &str = "RAYCASTER_MAP";
const ATLAS_ENV: &str = "RAYCASTER_ATLAS";

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    game: Game,

    // Internal buffer at the configured screen size
    fb: Framebuffer,
    scale_lut: ScaleLut,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    next_tick: Instant,
}

impl App {
    fn new(game: Game) -> Self {
        let config = game.config();
        let fb = Framebuffer::new(config.screen_width, config.screen_height);
        Self {
            window: None,
            surface: None,
            game,
            fb,
            scale_lut: ScaleLut::empty(),
            frame_counter: 0,
            last_fps_print: Instant::now(),
            next_tick: Instant::now(),
        }
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let config = self.game.config();
        let attributes = Window::default_attributes()
            .with_title("Grid Raycaster")
            .with_inner_size(LogicalSize::new(
                config.screen_width as f64,
                config.screen_height as f64,
            ));

        let window = Rc::new(event_loop.create_window(attributes).context("create window")?);
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        self.rebuild_lut(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.scale_lut = build_scale_lut(dst_w, dst_h, self.fb.width, self.fb.height);
    }

    fn redraw(&mut self, id: WindowId) -> anyhow::Result<()> {
        let (dw, dh) = match &self.window {
            Some(w) if w.id() == id => {
                let size = w.inner_size();
                (size.width as usize, size.height as usize)
            }
            _ => return Ok(()),
        };
        let (Some(w), Some(h)) = (NonZeroU32::new(dw as u32), NonZeroU32::new(dh as u32)) else {
            return Ok(()); // Minimized window, skip drawing
        };

        self.game.render(&mut self.fb);

        if self.scale_lut.dst_width() != dw || self.scale_lut.dst_height() != dh {
            self.rebuild_lut(dw, dh);
        }

        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface
            .resize(w, h)
            .map_err(|e| anyhow::anyhow!("resize surface: {e}"))?;
        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("surface buffer: {e}"))?;
        blit_nearest_stretch(&mut buf, dw, &self.fb.pixels, &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow::anyhow!("present frame: {e}"))?;

        // Log FPS
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_counter as f32 / elapsed;
            info!("FPS: {fps:.1}");
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_surface(event_loop) {
            error!("{e:#}");
            event_loop.exit();
            return;
        }
        self.next_tick = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else if let Some(intent) = input::intent_for(code) {
                    self.game.apply(intent);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(id) {
                    error!("{e:#}");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            let tick = self.game.config().tick;
            self.next_tick += tick;
            // Skip missed ticks instead of bursting
            if self.next_tick < now {
                self.next_tick = now + tick;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

fn load_game() -> anyhow::Result<Game> {
    let config = Config::default();
    config.validate().context("invalid configuration")?;

    let map = match std::env::var_os(MAP_ENV) {
        Some(path) => GridMap::load(&path).context("loading map")?,
        None => {
            info!("{MAP_ENV} not set, using demo map");
            GridMap::demo()
        }
    };

    let atlas = match std::env::var_os(ATLAS_ENV) {
        Some(path) => TextureAtlas::load(&path, config.cell_size).context("loading texture atlas")?,
        None => {
            let tiles = (map.max_wall_id() as usize).max(1);
            info!(tiles, "{ATLAS_ENV} not set, generating textures");
            TextureAtlas::procedural(config.cell_size, tiles)
        }
    };

    Ok(Game::new(config, map, atlas)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let game = load_game()?;
    info!(
        width = game.config().screen_width,
        height = game.config().screen_height,
        cols = game.map().cols(),
        rows = game.map().rows(),
        "starting"
    );

    let event_loop = EventLoop::new().context("create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(game);
    event_loop.run_app(&mut app).context("event loop")?;
    Ok(())
}
