use cadence_core::{CloseDecision, EngineHook, HostWindow, WorldManager};
use cadence_render::RenderPipeline;

use crate::bootstrap::BootstrapError;

/// The game being hosted.
///
/// The driver owns the definition and calls into it at fixed points: the
/// construction steps during bootstrap, then the advisory close/exit queries
/// while live. Everything heavyweight belongs in `build_world_manager`; it
/// runs off the tick thread.
pub trait GameDefinition: Send + 'static {
    /// Display name for logs and default window titles.
    fn name(&self) -> &str;

    /// Customizes the host window before the first ready frame.
    fn configure_window(&mut self, _window: &mut dyn HostWindow) -> Result<(), BootstrapError> {
        Ok(())
    }

    /// Builds the world manager with every world registered.
    fn build_world_manager(&mut self) -> Result<Box<dyn WorldManager>, BootstrapError>;

    /// Appends or inserts render passes before anything renders. Called only
    /// when the world manager exposes a pipeline.
    fn configure_pipeline(&mut self, _pipeline: &mut RenderPipeline) {}

    /// Engine hooks in dispatch order. Resolved once, frozen afterwards.
    fn engine_hooks(&mut self) -> Vec<Box<dyn EngineHook>> {
        Vec::new()
    }

    /// World made active when the game goes live.
    fn initial_world(&self) -> &str;

    /// Advisory answer to a host close request.
    fn close_requested(&mut self) -> CloseDecision {
        CloseDecision::Proceed
    }

    /// Called once when the host is tearing down.
    fn on_exiting(&mut self) {}
}
