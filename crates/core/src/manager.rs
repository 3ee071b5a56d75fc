use cadence_common::FrameError;
use cadence_render::RenderPipeline;

use crate::context::{GameContext, RenderContext, UpdateContext};
use crate::hook::EngineHook;
use crate::host::GraphicsDevice;
use crate::task::TaskScheduler;

/// Owner of the registered worlds, dispatched once per ready tick.
///
/// A manager that exposes a render pipeline takes over hook rendering; the
/// driver checks `pipeline_mut` exactly once at bootstrap and records the
/// answer in `RenderContext`.
pub trait WorldManager: Send {
    /// Advances the active world. Post-ready scheduler pumping happens here.
    fn update(
        &mut self,
        game: &mut GameContext,
        ctx: &mut UpdateContext,
        scheduler: &mut dyn TaskScheduler,
    ) -> Result<(), FrameError>;

    /// Draws the active world. `hooks` is the frozen hook sequence; a
    /// pipeline-backed manager renders them through its hook content stage.
    fn render(
        &mut self,
        game: &mut GameContext,
        ctx: &mut RenderContext,
        device: &mut dyn GraphicsDevice,
        hooks: &mut [Box<dyn EngineHook>],
    ) -> Result<(), FrameError>;

    /// Render pipeline, when this manager drives one.
    fn pipeline_mut(&mut self) -> Option<&mut RenderPipeline> {
        None
    }

    /// Makes the named world active.
    fn switch_to(&mut self, name: &str) -> Result<(), FrameError>;

    fn active_world(&self) -> Option<&str>;
}
