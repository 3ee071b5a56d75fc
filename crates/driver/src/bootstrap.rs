use std::sync::mpsc;
use std::thread;

use cadence_core::{EngineHook, GameContext, HostWindow, RenderContext, UpdateContext};
use thiserror::Error;
use tracing::{info, warn};

use crate::diagnostics::StartupTrace;
use crate::game::GameDefinition;

/// Failure in the asynchronous construction sequence.
///
/// Captured once on the worker, surfaced from the next update, never
/// retried. Variants carry owned strings so the error can be re-raised on
/// every later update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("bootstrap step '{step}' failed: {message}")]
    Step { step: String, message: String },

    #[error("bootstrap worker disconnected before completing")]
    Disconnected,
}

impl BootstrapError {
    pub fn step(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Step {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Everything the driver installs when the worker finishes.
///
/// Built completely on the worker thread; the channel receive is the
/// publication point, so the tick thread never observes a half-built game.
pub struct BootstrapPayload {
    pub game: Box<dyn GameDefinition>,
    pub context: GameContext,
    pub update_ctx: UpdateContext,
    pub render_ctx: RenderContext,
    pub hooks: Vec<Box<dyn EngineHook>>,
    pub trace: StartupTrace,
}

impl std::fmt::Debug for BootstrapPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapPayload")
            .field("hooks", &self.hooks.len())
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

/// Runs the construction sequence exactly once on a background thread.
pub struct StartupLoadCoordinator {
    receiver: Option<mpsc::Receiver<Result<BootstrapPayload, BootstrapError>>>,
    started: bool,
}

impl StartupLoadCoordinator {
    pub fn new() -> Self {
        Self {
            receiver: None,
            started: false,
        }
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Spawns the bootstrap worker. Repeat calls are no-ops.
    pub fn begin(&mut self, game: Box<dyn GameDefinition>, window: Box<dyn HostWindow>) {
        if self.started {
            warn!("bootstrap already started, ignoring");
            return;
        }
        self.started = true;

        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);
        thread::spawn(move || {
            let result = build(game, window);
            // A dropped receiver means the driver went away first.
            let _ = sender.send(result);
        });
    }

    /// Observes the one-shot completion channel without blocking.
    ///
    /// Returns None while the worker is still running (or was never
    /// started), and the final result exactly once.
    pub fn poll(&mut self) -> Option<Result<BootstrapPayload, BootstrapError>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(result) => {
                self.receiver = None;
                Some(result)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.receiver = None;
                Some(Err(BootstrapError::Disconnected))
            }
        }
    }
}

impl Default for StartupLoadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// The construction sequence. Each step feeds the next; the first error
/// aborts the whole task.
fn build(
    mut game: Box<dyn GameDefinition>,
    mut window: Box<dyn HostWindow>,
) -> Result<BootstrapPayload, BootstrapError> {
    let mut trace = StartupTrace::new();

    game.configure_window(window.as_mut())?;
    trace.mark("window configured");

    let manager = game.build_world_manager()?;
    trace.mark("world manager built");

    let mut context = GameContext::new(window, manager);
    trace.mark("game context built");

    let update_ctx = UpdateContext::new();
    let mut render_ctx = RenderContext::new();
    if let Some(pipeline) = context.world_manager_mut().and_then(|m| m.pipeline_mut()) {
        render_ctx.attach_pipeline();
        game.configure_pipeline(pipeline);
        trace.mark("pipeline configured");
    }

    let hooks = game.engine_hooks();
    trace.mark("hooks resolved");

    info!(game = game.name(), hooks = hooks.len(), "bootstrap complete");
    Ok(BootstrapPayload {
        game,
        context,
        update_ctx,
        render_ctx,
        hooks,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{HeadlessWindow, WorldManager};
    use cadence_world::{DirectWorldManager, DriftWorld, StagedWorldManager};
    use std::time::Duration;

    struct TestGame {
        fail_build: bool,
        use_pipeline: bool,
    }

    impl GameDefinition for TestGame {
        fn name(&self) -> &str {
            "test-game"
        }

        fn build_world_manager(&mut self) -> Result<Box<dyn WorldManager>, BootstrapError> {
            if self.fail_build {
                return Err(BootstrapError::step("build world manager", "forced"));
            }
            if self.use_pipeline {
                let mut manager = StagedWorldManager::new();
                manager.register(Box::new(DriftWorld::with_seed("main", 1, 4)));
                Ok(Box::new(manager))
            } else {
                let mut manager = DirectWorldManager::new();
                manager.register(Box::new(DriftWorld::with_seed("main", 1, 4)));
                Ok(Box::new(manager))
            }
        }

        fn initial_world(&self) -> &str {
            "main"
        }
    }

    fn poll_to_completion(
        coordinator: &mut StartupLoadCoordinator,
    ) -> Result<BootstrapPayload, BootstrapError> {
        for _ in 0..400 {
            if let Some(result) = coordinator.poll() {
                return result;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("bootstrap never completed");
    }

    #[test]
    fn successful_build_marks_pipeline_capability() {
        let mut coordinator = StartupLoadCoordinator::new();
        coordinator.begin(
            Box::new(TestGame { fail_build: false, use_pipeline: true }),
            Box::new(HeadlessWindow::new(320, 240)),
        );

        let payload = poll_to_completion(&mut coordinator).unwrap();
        assert!(payload.render_ctx.pipeline_attached());
        assert!(!payload.trace.entries().is_empty());
    }

    #[test]
    fn direct_manager_leaves_capability_unset() {
        let mut coordinator = StartupLoadCoordinator::new();
        coordinator.begin(
            Box::new(TestGame { fail_build: false, use_pipeline: false }),
            Box::new(HeadlessWindow::new(320, 240)),
        );

        let payload = poll_to_completion(&mut coordinator).unwrap();
        assert!(!payload.render_ctx.pipeline_attached());
    }

    #[test]
    fn build_failure_reaches_the_poller() {
        let mut coordinator = StartupLoadCoordinator::new();
        coordinator.begin(
            Box::new(TestGame { fail_build: true, use_pipeline: false }),
            Box::new(HeadlessWindow::new(320, 240)),
        );

        let err = poll_to_completion(&mut coordinator).unwrap_err();
        assert!(matches!(err, BootstrapError::Step { .. }));
    }

    #[test]
    fn poll_after_completion_returns_none() {
        let mut coordinator = StartupLoadCoordinator::new();
        coordinator.begin(
            Box::new(TestGame { fail_build: false, use_pipeline: false }),
            Box::new(HeadlessWindow::new(320, 240)),
        );

        poll_to_completion(&mut coordinator).unwrap();
        assert!(coordinator.poll().is_none());
    }

    #[test]
    fn repeat_begin_is_ignored() {
        let mut coordinator = StartupLoadCoordinator::new();
        coordinator.begin(
            Box::new(TestGame { fail_build: false, use_pipeline: false }),
            Box::new(HeadlessWindow::new(320, 240)),
        );
        coordinator.begin(
            Box::new(TestGame { fail_build: true, use_pipeline: false }),
            Box::new(HeadlessWindow::new(320, 240)),
        );

        // The surviving worker is the first one, which succeeds.
        poll_to_completion(&mut coordinator).unwrap();
        assert!(coordinator.started());
    }

    #[test]
    fn unstarted_coordinator_polls_none() {
        let mut coordinator = StartupLoadCoordinator::new();
        assert!(coordinator.poll().is_none());
        assert!(!coordinator.started());
    }
}
