use cadence_common::FrameError;

use crate::context::{GameContext, RenderContext, UpdateContext};

/// Per-frame engine extension.
///
/// Hooks are resolved once at bootstrap into an ordered sequence and frozen.
/// `update` runs once per ready tick in registration order. `render` runs
/// either directly from the driver (no pipeline attached) or through the
/// pipeline's hook content stage, never both.
pub trait EngineHook: Send {
    fn name(&self) -> &str;

    fn update(
        &mut self,
        _game: &mut GameContext,
        _ctx: &mut UpdateContext,
    ) -> Result<(), FrameError> {
        Ok(())
    }

    fn render(
        &mut self,
        _game: &mut GameContext,
        _ctx: &mut RenderContext,
    ) -> Result<(), FrameError> {
        Ok(())
    }
}
