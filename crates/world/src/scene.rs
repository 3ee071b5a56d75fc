use cadence_common::{FrameError, WorldLayer};
use cadence_core::{EngineHook, GameContext, GraphicsDevice, RenderContext};
use cadence_render::SceneRenderer;
use tracing::trace;

use crate::world::World;

/// Adapts one draw of the active world to the pipeline's content callbacks.
///
/// Borrows everything for a single `RenderPipeline::execute` walk; hook
/// rendering happens here and nowhere else when a pipeline is attached.
pub struct StagedScene<'a> {
    pub world: &'a mut dyn World,
    pub game: &'a mut GameContext,
    pub ctx: &'a mut RenderContext,
    pub device: &'a mut dyn GraphicsDevice,
    pub hooks: &'a mut [Box<dyn EngineHook>],
}

impl SceneRenderer for StagedScene<'_> {
    fn world_layer(&mut self, layer: WorldLayer, technique: &str) -> Result<(), FrameError> {
        trace!(technique, %layer, "draw world layer");
        self.world.draw_layer(layer, self.device)
    }

    fn entities(&mut self, technique: &str) -> Result<(), FrameError> {
        trace!(technique, "draw entities");
        self.world.draw_entities(self.device)
    }

    fn engine_hooks(&mut self, technique: &str) -> Result<(), FrameError> {
        trace!(technique, "draw engine hooks");
        for hook in self.hooks.iter_mut() {
            hook.render(self.game, self.ctx)?;
        }
        Ok(())
    }
}
