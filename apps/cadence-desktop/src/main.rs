use anyhow::Result;
use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use cadence_common::{FrameClock, FrameError};
use cadence_core::{
    CloseDecision, EngineHook, GameContext, GraphicsDevice, HostWindow, RenderInstance,
    SolidLoadingScreen, Splash, UpdateContext, WorldManager,
};
use cadence_driver::{BootstrapError, DriverConfig, FrameDriver, GameDefinition};
use cadence_render::{BasicPass, PassFlags, RenderPipeline};
use cadence_render_wgpu::WgpuDevice;
use cadence_world::{DriftWorld, StagedWorldManager};

#[derive(Parser)]
#[command(name = "cadence-desktop", about = "Cadence desktop host")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Driver configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured frame-skip count
    #[arg(long)]
    skip_frames: Option<u32>,
}

/// Retitles the host window whenever the FPS sample changes.
struct FpsTitleHook {
    base: String,
    shown: u32,
}

impl FpsTitleHook {
    fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            shown: u32::MAX,
        }
    }
}

impl EngineHook for FpsTitleHook {
    fn name(&self) -> &str {
        "fps-title"
    }

    fn update(
        &mut self,
        game: &mut GameContext,
        _ctx: &mut UpdateContext,
    ) -> Result<(), FrameError> {
        let fps = game.fps();
        if fps != self.shown {
            self.shown = fps;
            let title = format!("{} | {} fps", self.base, fps);
            game.window_mut().set_title(&title);
        }
        Ok(())
    }
}

/// The shipped demo: two drift worlds behind a staged pipeline.
struct DemoGame;

impl GameDefinition for DemoGame {
    fn name(&self) -> &str {
        "cadence-demo"
    }

    fn configure_window(&mut self, window: &mut dyn HostWindow) -> Result<(), BootstrapError> {
        window.set_title("cadence demo | loading");
        Ok(())
    }

    fn build_world_manager(&mut self) -> Result<Box<dyn WorldManager>, BootstrapError> {
        let mut manager = StagedWorldManager::new();
        manager.register(Box::new(DriftWorld::with_seed("main", 7, 48)));
        manager.register(Box::new(DriftWorld::with_seed("sparse", 11, 12)));
        Ok(Box::new(manager))
    }

    fn configure_pipeline(&mut self, pipeline: &mut RenderPipeline) {
        let grade = PassFlags {
            skip_world_below: true,
            skip_world_above: true,
            skip_entities: true,
            skip_engine_hooks: true,
            post_process: true,
        };
        pipeline.push(Box::new(BasicPass::new("grade", grade)));
    }

    fn engine_hooks(&mut self) -> Vec<Box<dyn EngineHook>> {
        vec![Box::new(FpsTitleHook::new("cadence demo"))]
    }

    fn initial_world(&self) -> &str {
        "main"
    }

    fn on_exiting(&mut self) {
        tracing::info!("demo exiting");
    }
}

struct WinitWindow(Arc<Window>);

impl HostWindow for WinitWindow {
    fn set_title(&mut self, title: &str) {
        self.0.set_title(title);
    }

    fn inner_size(&self) -> (u32, u32) {
        let size = self.0.inner_size();
        (size.width, size.height)
    }
}

/// Device handle shared between the driver and the input path, so mouse
/// events can steer the camera while the driver owns the draw calls.
#[derive(Clone)]
struct SharedGpu(Rc<RefCell<WgpuDevice>>);

impl GraphicsDevice for SharedGpu {
    fn clear(&mut self, color: [f32; 4]) {
        self.0.borrow_mut().clear(color);
    }

    fn draw_instances(&mut self, instances: &[RenderInstance]) {
        self.0.borrow_mut().draw_instances(instances);
    }

    fn present(&mut self) {
        self.0.borrow_mut().present();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().resize(width, height);
    }
}

struct DesktopApp {
    config: DriverConfig,
    driver: FrameDriver,
    window: Option<Arc<Window>>,
    gpu: Option<SharedGpu>,
    clock: FrameClock,
    mouse_captured: bool,
}

impl DesktopApp {
    fn new(config: DriverConfig) -> Self {
        let driver = FrameDriver::new(config.clone(), Box::new(DemoGame));
        Self {
            config,
            driver,
            window: None,
            gpu: None,
            clock: FrameClock::new(),
            mouse_captured: false,
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cadence_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        let gpu = SharedGpu(Rc::new(RefCell::new(WgpuDevice::new(
            device,
            queue,
            surface,
            surface_config,
        ))));

        self.driver.assign_host(
            Box::new(WinitWindow(window.clone())),
            Box::new(gpu.clone()),
            Box::new(SolidLoadingScreen),
            Splash {
                color: self.config.splash_color,
            },
        );
        if let Err(err) = self.driver.begin_load() {
            tracing::error!("failed to start loading: {err}");
            event_loop.exit();
            return;
        }

        self.window = Some(window);
        self.gpu = Some(gpu);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if self.driver.close_requested() == CloseDecision::Proceed {
                    self.driver.notify_exiting();
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                self.driver.resize_surface(new_size.width, new_size.height);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.mouse_captured = btn_state == ElementState::Pressed;
                if let Some(window) = &self.window {
                    window.set_cursor_visible(!self.mouse_captured);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 2.0,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                };
                if let Some(gpu) = &self.gpu {
                    gpu.0.borrow_mut().camera_mut().zoom(amount);
                }
            }
            WindowEvent::RedrawRequested => {
                let frame = self.clock.tick();
                if let Err(err) = self.driver.update(frame) {
                    tracing::error!("update failed: {err}");
                    event_loop.exit();
                    return;
                }
                if let Err(err) = self.driver.draw(frame) {
                    tracing::error!("draw failed: {err}");
                    event_loop.exit();
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.mouse_captured {
                if let Some(gpu) = &self.gpu {
                    gpu.0
                        .borrow_mut()
                        .camera_mut()
                        .orbit(delta.0 as f32, delta.1 as f32);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig::default(),
    };
    if let Some(skip) = cli.skip_frames {
        config.skip_frames = skip;
    }

    tracing::info!("cadence-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
