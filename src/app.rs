//! The windowed turntable: winit event loop, GPU setup and the frame loop.
//!
//! ```no_run
//! use turntable::{AppConfig, MeshSource};
//!
//! fn main() -> Result<(), turntable::AppError> {
//!     turntable::run(AppConfig::new().title("Cube").mesh(MeshSource::Cube))
//! }
//! ```

use crate::composer::{FrameClock, FrameComposer};
use crate::geometry::{GeometryError, MeshSource};
use crate::gpu::{GpuContext, RenderError};
use crate::math::MathError;
use crate::mesh::Mesh;
use crate::renderer::{FrameOutcome, Renderer};
use crate::shading::Shading;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

/// Anything that stops the turntable.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Math(#[from] MathError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Configuration for the turntable window and scene.
#[derive(Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second the animation clock assumes.
    pub target_frame_rate: f32,
    pub mesh: MeshSource,
    /// Rotate the loaded mesh from Z-up to Y-up before display.
    pub z_up: bool,
    pub composer: FrameComposer,
    pub shading: Shading,
    pub clear_color: wgpu::Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Turntable".to_string(),
            width: 800,
            height: 600,
            target_frame_rate: 60.0,
            mesh: MeshSource::default(),
            z_up: false,
            composer: FrameComposer::default(),
            shading: Shading::default(),
            clear_color: wgpu::Color::BLACK,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn frame_rate(mut self, fps: f32) -> Self {
        self.target_frame_rate = fps;
        self
    }

    pub fn mesh(mut self, mesh: MeshSource) -> Self {
        self.mesh = mesh;
        self
    }

    pub fn z_up(mut self, z_up: bool) -> Self {
        self.z_up = z_up;
        self
    }

    pub fn composer(mut self, composer: FrameComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }
}

/// Opens a window and spins the configured mesh until it is closed.
///
/// # Errors
///
/// Returns the first fatal error: mesh loading, GPU setup, a degenerate
/// projection, GPU memory exhaustion, or the event loop itself.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = TurntableApp::Pending {
        config: Some(config),
    };
    event_loop.run_app(&mut app)?;

    match app {
        TurntableApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: Renderer,
    mesh: Mesh,
    composer: FrameComposer,
    clock: FrameClock,
}

enum TurntableApp {
    Pending { config: Option<AppConfig> },
    Running(Box<Running>),
    Failed(AppError),
}

impl TurntableApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        tracing::error!("{err}");
        *self = TurntableApp::Failed(err);
        event_loop.exit();
    }
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: AppConfig) -> Result<Self, AppError> {
        let mut mesh_data = config.mesh.load()?;
        if config.z_up {
            mesh_data.upright();
        }
        tracing::info!(
            source = %config.mesh,
            vertices = mesh_data.vertices.len(),
            triangles = mesh_data.triangle_count(),
            "mesh loaded"
        );

        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = GpuContext::new(window.clone())?;
        let renderer = Renderer::new(
            &gpu,
            &config.shading,
            config.composer.handedness,
            config.clear_color,
        )?;
        let mesh = mesh_data.upload(&gpu);

        // Surface a bad camera setup now rather than on the first frame.
        config.composer.transforms(0.0, gpu.aspect())?;

        Ok(Self {
            window,
            gpu,
            renderer,
            mesh,
            composer: config.composer,
            clock: FrameClock::new(config.target_frame_rate),
        })
    }

    fn redraw(&mut self) -> Result<(), AppError> {
        let elapsed = self.clock.advance();
        let uniforms =
            self.composer
                .compose(elapsed, self.gpu.aspect(), self.renderer.light_count())?;

        if self.renderer.draw(&self.gpu, &self.mesh, &uniforms)? == FrameOutcome::Skipped {
            tracing::trace!(frame = self.clock.frame_index(), "frame skipped");
        }
        Ok(())
    }
}

impl ApplicationHandler for TurntableApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let TurntableApp::Pending { config } = self else {
            return;
        };
        let Some(config) = config.take() else {
            return;
        };

        match Running::start(event_loop, config) {
            Ok(running) => {
                tracing::info!(
                    width = running.gpu.width(),
                    height = running.gpu.height(),
                    indices = running.mesh.index_count(),
                    "turntable running"
                );
                running.window.request_redraw();
                *self = TurntableApp::Running(Box::new(running));
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let TurntableApp::Running(running) = self else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(frames = running.clock.frame_index(), "closing");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = running.redraw() {
                    self.fail(event_loop, err);
                    return;
                }
                running.window.request_redraw();
            }
            _ => {}
        }
    }
}
