use cadence_common::{FpsCounter, FrameError, FramePhase, FrameTime};
use cadence_core::{
    AnalyticsSink, CloseDecision, EngineHook, GameContext, GraphicsDevice, HostWindow,
    LoadingScreen, RenderContext, Splash, TaskScheduler, TracingAnalytics, UpdateContext,
};
use cadence_sched::CoroutineScheduler;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::bootstrap::{BootstrapError, BootstrapPayload, StartupLoadCoordinator};
use crate::config::DriverConfig;
use crate::diagnostics::StartupTrace;
use crate::game::GameDefinition;

/// Driver-level failure surfaced to the host loop.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("host resources were not assigned before use")]
    HostNotAssigned,
}

/// Readiness as reported to hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    NotStarted,
    EarlyLoading,
    Ready,
}

/// Everything that exists only once the game is live.
struct LiveState {
    game: Box<dyn GameDefinition>,
    context: GameContext,
    update_ctx: UpdateContext,
    render_ctx: RenderContext,
    hooks: Vec<Box<dyn EngineHook>>,
    trace: StartupTrace,
}

enum Phase {
    NotStarted,
    EarlyLoading,
    Ready(Box<LiveState>),
}

/// Host-owned resources the driver draws with.
///
/// The window sits here only until `begin_load` hands it to the bootstrap
/// worker; afterwards it lives in GameContext.
struct HostBundle {
    device: Box<dyn GraphicsDevice>,
    loading_screen: Box<dyn LoadingScreen>,
    splash: Splash,
    window: Option<Box<dyn HostWindow>>,
}

/// Top-level state machine between the host tick and the game.
///
/// The host calls `assign_host` once, `begin_load` once, then
/// `update(frame_time)` and `draw(frame_time)` every tick.
pub struct FrameDriver {
    phase: Phase,
    config: DriverConfig,
    fps: FpsCounter,
    scheduler: Box<dyn TaskScheduler>,
    coordinator: StartupLoadCoordinator,
    host: Option<HostBundle>,
    game_slot: Option<Box<dyn GameDefinition>>,
    failure: Option<BootstrapError>,
    early_render_seen: bool,
    analytics: Box<dyn AnalyticsSink>,
}

impl FrameDriver {
    pub fn new(config: DriverConfig, game: Box<dyn GameDefinition>) -> Self {
        Self {
            phase: Phase::NotStarted,
            config,
            fps: FpsCounter::new(),
            scheduler: Box::new(CoroutineScheduler::new()),
            coordinator: StartupLoadCoordinator::new(),
            host: None,
            game_slot: Some(game),
            failure: None,
            early_render_seen: false,
            analytics: Box::new(TracingAnalytics),
        }
    }

    /// Replaces the default scheduler, usually with one preloaded with
    /// background tasks.
    pub fn with_scheduler(mut self, scheduler: Box<dyn TaskScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_analytics(mut self, analytics: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    /// Hands over the host resources. Must happen before `begin_load` and
    /// before any draw. A second call is ignored.
    pub fn assign_host(
        &mut self,
        window: Box<dyn HostWindow>,
        device: Box<dyn GraphicsDevice>,
        loading_screen: Box<dyn LoadingScreen>,
        splash: Splash,
    ) {
        if self.host.is_some() {
            warn!("host already assigned, ignoring");
            return;
        }
        self.host = Some(HostBundle {
            device,
            loading_screen,
            splash,
            window: Some(window),
        });
    }

    /// Starts the one-time bootstrap worker. Repeat calls are no-ops.
    pub fn begin_load(&mut self) -> Result<(), DriverError> {
        let Some(game) = self.game_slot.take() else {
            return Ok(());
        };
        let window = match self.host.as_mut().and_then(|h| h.window.take()) {
            Some(window) => window,
            None => {
                self.game_slot = Some(game);
                return Err(DriverError::HostNotAssigned);
            }
        };

        info!(game = game.name(), "bootstrap begin");
        self.phase = Phase::EarlyLoading;
        self.coordinator.begin(game, window);
        Ok(())
    }

    pub fn state(&self) -> DriverState {
        match self.phase {
            Phase::NotStarted => DriverState::NotStarted,
            Phase::EarlyLoading => DriverState::EarlyLoading,
            Phase::Ready(_) => DriverState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    /// Most recent FPS sample.
    pub fn fps(&self) -> u32 {
        self.fps.sample()
    }

    pub fn frame_count(&self) -> u64 {
        match &self.phase {
            Phase::Ready(live) => live.context.frame_count(),
            _ => 0,
        }
    }

    pub fn is_rendering(&self) -> bool {
        match &self.phase {
            Phase::Ready(live) => live.render_ctx.is_rendering(),
            _ => false,
        }
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// First half of the tick.
    pub fn update(&mut self, frame: FrameTime) -> Result<(), DriverError> {
        // A faulted bootstrap is fatal on this and every later update.
        if let Some(failure) = &self.failure {
            return Err(DriverError::Bootstrap(failure.clone()));
        }

        if matches!(self.phase, Phase::NotStarted) {
            return Ok(());
        }

        if matches!(self.phase, Phase::EarlyLoading) {
            match self.coordinator.poll() {
                None => {
                    // Rendering must happen at least once before pumping.
                    if self.early_render_seen {
                        self.scheduler.pump(None, None);
                    }
                    return Ok(());
                }
                Some(Err(err)) => {
                    error!(%err, "bootstrap failed");
                    self.failure = Some(err.clone());
                    return Err(DriverError::Bootstrap(err));
                }
                Some(Ok(payload)) => self.install(payload)?,
            }
        }

        let Phase::Ready(live) = &mut self.phase else {
            return Ok(());
        };

        live.trace.emit_once();

        self.fps.tick(frame.delta);
        if self.fps.frames() < self.config.skip_frames {
            debug!(frames = self.fps.frames(), "update skipped");
            return Ok(());
        }

        live.update_ctx.stamp(frame);
        live.context.begin_frame(frame, self.fps.sample());

        let LiveState { context, update_ctx, hooks, .. } = &mut **live;
        for hook in hooks.iter_mut() {
            hook.update(context, update_ctx)?;
        }

        let Some(mut manager) = context.take_world_manager() else {
            return Err(FrameError::ManagerDetached(FramePhase::Update).into());
        };
        let result = manager.update(context, update_ctx, self.scheduler.as_mut());
        context.put_world_manager(manager);
        result?;
        Ok(())
    }

    /// Second half of the tick.
    pub fn draw(&mut self, frame: FrameTime) -> Result<(), DriverError> {
        let Some(host) = self.host.as_mut() else {
            return Err(DriverError::HostNotAssigned);
        };

        match &mut self.phase {
            Phase::NotStarted | Phase::EarlyLoading => {
                host.loading_screen
                    .render_early(host.device.as_mut(), &host.splash);
                host.device.present();
                self.early_render_seen = true;
                Ok(())
            }
            Phase::Ready(live) => {
                live.render_ctx.set_rendering(true);
                let result = if self.fps.frames() < self.config.skip_frames {
                    host.device.clear(host.splash.color);
                    Ok(())
                } else {
                    Self::render_frame(live, host.device.as_mut(), frame)
                };
                // Cleared on every exit path, including skip and error.
                live.render_ctx.set_rendering(false);
                host.device.present();
                result?;
                Ok(())
            }
        }
    }

    fn render_frame(
        live: &mut LiveState,
        device: &mut dyn GraphicsDevice,
        frame: FrameTime,
    ) -> Result<(), FrameError> {
        live.context.stamp_time(frame);
        live.render_ctx.record_draw();

        let LiveState { context, render_ctx, hooks, .. } = live;
        if !render_ctx.pipeline_attached() {
            // No pipeline: the driver renders hooks itself. With one, the
            // manager's pipeline owns hook rendering.
            for hook in hooks.iter_mut() {
                hook.render(context, render_ctx)?;
            }
        }

        let Some(mut manager) = context.take_world_manager() else {
            return Err(FrameError::ManagerDetached(FramePhase::Render));
        };
        let result = manager.render(context, render_ctx, device, hooks);
        context.put_world_manager(manager);
        result
    }

    /// Installs a completed payload and flips readiness.
    fn install(&mut self, mut payload: BootstrapPayload) -> Result<(), DriverError> {
        let initial = payload.game.initial_world().to_string();

        let Some(manager) = payload.context.world_manager_mut() else {
            return Err(FrameError::ManagerDetached(FramePhase::Update).into());
        };
        if let Err(err) = manager.switch_to(&initial) {
            // World wiring is still construction; its failure is sticky.
            let failure = BootstrapError::step("switch initial world", err.to_string());
            self.failure = Some(failure.clone());
            return Err(DriverError::Bootstrap(failure));
        }
        payload.context.set_active_world(initial.clone());

        self.analytics.game_started(&initial);
        info!(world = %initial, hooks = payload.hooks.len(), "driver ready");

        self.phase = Phase::Ready(Box::new(LiveState {
            game: payload.game,
            context: payload.context,
            update_ctx: payload.update_ctx,
            render_ctx: payload.render_ctx,
            hooks: payload.hooks,
            trace: payload.trace,
        }));
        Ok(())
    }

    /// Forwards a host close request to the live game. Before readiness the
    /// answer is always Proceed.
    pub fn close_requested(&mut self) -> CloseDecision {
        match &mut self.phase {
            Phase::Ready(live) => live.game.close_requested(),
            _ => CloseDecision::Proceed,
        }
    }

    /// Tells the live game the host is tearing down.
    pub fn notify_exiting(&mut self) {
        if let Phase::Ready(live) = &mut self.phase {
            live.game.on_exiting();
        }
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if let Some(host) = self.host.as_mut() {
            host.device.resize(width, height);
        }
    }
}
