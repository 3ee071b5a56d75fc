use cadence_common::{FrameError, WorldLayer};
use tracing::trace;

use crate::pass::{RenderPass, RenderTarget};

/// Receiver for the content categories a pass does not exclude.
///
/// The pipeline owns ordering; implementors own drawing. Each method is
/// called at most once per pass, in the fixed order world-below, entities,
/// world-above, engine hooks.
pub trait SceneRenderer {
    fn world_layer(&mut self, layer: WorldLayer, technique: &str) -> Result<(), FrameError>;
    fn entities(&mut self, technique: &str) -> Result<(), FrameError>;
    fn engine_hooks(&mut self, technique: &str) -> Result<(), FrameError>;
}

/// Ordered sequence of render passes.
///
/// Passes run strictly in append order. Each walk calls
/// `begin(previous, source)`, feeds non-excluded content to the scene
/// renderer, then calls `end(next)`. A post-processing pass receives the
/// previous pass's render target as `source`; every other pass receives none.
#[derive(Default)]
pub struct RenderPipeline {
    passes: Vec<Box<dyn RenderPass>>,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pass at the tail.
    pub fn push(&mut self, pass: Box<dyn RenderPass>) {
        self.passes.push(pass);
    }

    /// Inserts a pass at `index`, shifting later passes back.
    pub fn insert(&mut self, index: usize, pass: Box<dyn RenderPass>) {
        self.passes.insert(index, pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Technique identifiers in execution order.
    pub fn techniques(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.technique()).collect()
    }

    /// Walks every pass once. The first error aborts the walk.
    pub fn execute(&mut self, scene: &mut dyn SceneRenderer) -> Result<(), FrameError> {
        for index in 0..self.passes.len() {
            let (before, rest) = self.passes.split_at_mut(index);
            let Some((pass, after)) = rest.split_first_mut() else {
                break;
            };

            let previous: Option<&dyn RenderPass> = before.last().map(|p| p.as_ref());
            let source: Option<&RenderTarget> = if pass.flags().post_process {
                before.last().and_then(|p| p.target())
            } else {
                None
            };

            trace!(technique = pass.technique(), index, "pass begin");
            pass.begin(previous, source)?;

            let flags = pass.flags();
            let technique = pass.technique();
            if !flags.skip_world_below {
                scene.world_layer(WorldLayer::Below, technique)?;
            }
            if !flags.skip_entities {
                scene.entities(technique)?;
            }
            if !flags.skip_world_above {
                scene.world_layer(WorldLayer::Above, technique)?;
            }
            if !flags.skip_engine_hooks {
                scene.engine_hooks(technique)?;
            }

            let next: Option<&dyn RenderPass> = after.first().map(|p| p.as_ref());
            pass.end(next)?;
        }
        Ok(())
    }
}
