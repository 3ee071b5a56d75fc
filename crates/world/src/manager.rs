use std::collections::BTreeMap;

use cadence_common::FrameError;
use cadence_core::{
    EngineHook, GameContext, GraphicsDevice, RenderContext, TaskScheduler, UpdateContext,
    WorldManager,
};
use cadence_render::{BasicPass, PassFlags, RenderPipeline};
use tracing::{debug, info_span};

use crate::scene::StagedScene;
use crate::world::World;

const CLEAR_COLOR: [f32; 4] = [0.02, 0.03, 0.05, 1.0];

/// World manager that renders through an owned pass pipeline.
///
/// The default pipeline is a "world" pass (geometry and entities, no hooks)
/// followed by an "overlay" pass (hooks only). Because this manager exposes
/// a pipeline, hook rendering happens inside the overlay pass and the driver
/// leaves hooks alone.
pub struct StagedWorldManager {
    worlds: BTreeMap<String, Box<dyn World>>,
    active: Option<String>,
    pipeline: RenderPipeline,
    clear_color: [f32; 4],
}

impl StagedWorldManager {
    pub fn new() -> Self {
        let mut pipeline = RenderPipeline::new();
        pipeline.push(Box::new(BasicPass::new("world", PassFlags::world())));
        pipeline.push(Box::new(BasicPass::new("overlay", PassFlags::overlay())));
        Self {
            worlds: BTreeMap::new(),
            active: None,
            pipeline,
            clear_color: CLEAR_COLOR,
        }
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Registers a world under its own name.
    pub fn register(&mut self, world: Box<dyn World>) {
        debug!(world = world.name(), "world registered");
        self.worlds.insert(world.name().to_string(), world);
    }

    pub fn world_names(&self) -> Vec<&str> {
        self.worlds.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for StagedWorldManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldManager for StagedWorldManager {
    fn update(
        &mut self,
        game: &mut GameContext,
        ctx: &mut UpdateContext,
        scheduler: &mut dyn TaskScheduler,
    ) -> Result<(), FrameError> {
        scheduler.pump(Some(&mut *game), Some(&mut *ctx));

        let Some(name) = self.active.as_deref() else {
            return Ok(());
        };
        let Some(world) = self.worlds.get_mut(name) else {
            return Err(FrameError::UnknownWorld { name: name.to_string() });
        };
        let _span = info_span!("world_update", world = %name).entered();
        world.update(game.time())
    }

    fn render(
        &mut self,
        game: &mut GameContext,
        ctx: &mut RenderContext,
        device: &mut dyn GraphicsDevice,
        hooks: &mut [Box<dyn EngineHook>],
    ) -> Result<(), FrameError> {
        device.clear(self.clear_color);

        let Self { worlds, active, pipeline, .. } = self;
        let Some(name) = active.as_deref() else {
            return Ok(());
        };
        let Some(world) = worlds.get_mut(name) else {
            return Err(FrameError::UnknownWorld { name: name.to_string() });
        };

        let _span = info_span!("world_render", world = %name).entered();
        let mut scene = StagedScene {
            world: world.as_mut(),
            game,
            ctx,
            device,
            hooks,
        };
        pipeline.execute(&mut scene)
    }

    fn pipeline_mut(&mut self) -> Option<&mut RenderPipeline> {
        Some(&mut self.pipeline)
    }

    fn switch_to(&mut self, name: &str) -> Result<(), FrameError> {
        if !self.worlds.contains_key(name) {
            return Err(FrameError::UnknownWorld { name: name.to_string() });
        }
        debug!(world = name, "world switch");
        self.active = Some(name.to_string());
        Ok(())
    }

    fn active_world(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

/// World manager without a pipeline.
///
/// Draws the active world's layers and entities in fixed order; engine hooks
/// are not rendered here. The driver detects the missing pipeline at
/// bootstrap and dispatches hook rendering itself.
pub struct DirectWorldManager {
    worlds: BTreeMap<String, Box<dyn World>>,
    active: Option<String>,
    clear_color: [f32; 4],
}

impl DirectWorldManager {
    pub fn new() -> Self {
        Self {
            worlds: BTreeMap::new(),
            active: None,
            clear_color: CLEAR_COLOR,
        }
    }

    pub fn register(&mut self, world: Box<dyn World>) {
        self.worlds.insert(world.name().to_string(), world);
    }
}

impl Default for DirectWorldManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldManager for DirectWorldManager {
    fn update(
        &mut self,
        game: &mut GameContext,
        ctx: &mut UpdateContext,
        scheduler: &mut dyn TaskScheduler,
    ) -> Result<(), FrameError> {
        scheduler.pump(Some(&mut *game), Some(&mut *ctx));

        let Some(name) = self.active.as_deref() else {
            return Ok(());
        };
        let Some(world) = self.worlds.get_mut(name) else {
            return Err(FrameError::UnknownWorld { name: name.to_string() });
        };
        world.update(game.time())
    }

    fn render(
        &mut self,
        _game: &mut GameContext,
        _ctx: &mut RenderContext,
        device: &mut dyn GraphicsDevice,
        _hooks: &mut [Box<dyn EngineHook>],
    ) -> Result<(), FrameError> {
        device.clear(self.clear_color);

        let Some(name) = self.active.as_deref() else {
            return Ok(());
        };
        let Some(world) = self.worlds.get_mut(name) else {
            return Err(FrameError::UnknownWorld { name: name.to_string() });
        };

        use cadence_common::WorldLayer;
        world.draw_layer(WorldLayer::Below, device)?;
        world.draw_entities(device)?;
        world.draw_layer(WorldLayer::Above, device)
    }

    fn switch_to(&mut self, name: &str) -> Result<(), FrameError> {
        if !self.worlds.contains_key(name) {
            return Err(FrameError::UnknownWorld { name: name.to_string() });
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    fn active_world(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::DriftWorld;
    use cadence_core::{DeviceOp, HeadlessWindow, RecordingDevice};
    use std::sync::{Arc, Mutex};

    struct SpyScheduler {
        pumps: usize,
        saw: Vec<(bool, bool)>,
    }

    impl SpyScheduler {
        fn new() -> Self {
            Self { pumps: 0, saw: Vec::new() }
        }
    }

    impl TaskScheduler for SpyScheduler {
        fn pump(&mut self, game: Option<&mut GameContext>, ctx: Option<&mut UpdateContext>) {
            self.pumps += 1;
            self.saw.push((game.is_some(), ctx.is_some()));
        }

        fn pending(&self) -> usize {
            0
        }
    }

    struct SpyHook {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl EngineHook for SpyHook {
        fn name(&self) -> &str {
            "spy"
        }

        fn render(
            &mut self,
            _game: &mut GameContext,
            _ctx: &mut RenderContext,
        ) -> Result<(), FrameError> {
            self.log.lock().unwrap().push("render".into());
            Ok(())
        }
    }

    fn game() -> GameContext {
        GameContext::new(
            Box::new(HeadlessWindow::new(640, 480)),
            Box::new(DirectWorldManager::new()),
        )
    }

    fn staged_with_world(count: usize) -> StagedWorldManager {
        let mut manager = StagedWorldManager::new();
        manager.register(Box::new(DriftWorld::with_seed("main", 1, count)));
        manager.switch_to("main").unwrap();
        manager
    }

    #[test]
    fn default_pipeline_is_world_then_overlay() {
        let mut manager = StagedWorldManager::new();
        let pipeline = manager.pipeline_mut().unwrap();
        assert_eq!(pipeline.techniques(), vec!["world", "overlay"]);
    }

    #[test]
    fn switch_to_unknown_world_errors() {
        let mut manager = StagedWorldManager::new();
        let err = manager.switch_to("nowhere").unwrap_err();
        assert_eq!(err, FrameError::UnknownWorld { name: "nowhere".into() });
        assert_eq!(manager.active_world(), None);
    }

    #[test]
    fn update_pumps_with_both_contexts() {
        let mut manager = staged_with_world(3);
        let mut game = game();
        let mut ctx = UpdateContext::new();
        let mut sched = SpyScheduler::new();

        manager.update(&mut game, &mut ctx, &mut sched).unwrap();
        assert_eq!(sched.pumps, 1);
        assert_eq!(sched.saw, vec![(true, true)]);
    }

    #[test]
    fn staged_render_clears_then_draws_world_then_entities() {
        let mut manager = staged_with_world(3);
        let mut game = game();
        let mut ctx = RenderContext::new();
        let mut device = RecordingDevice::new();
        let mut hooks: Vec<Box<dyn EngineHook>> = Vec::new();

        manager
            .render(&mut game, &mut ctx, &mut device, &mut hooks)
            .unwrap();

        let ops = device.take_ops();
        assert_eq!(ops[0], DeviceOp::Clear(CLEAR_COLOR));
        assert_eq!(ops[1], DeviceOp::Instances(7));
        assert_eq!(ops[2], DeviceOp::Instances(3));
    }

    #[test]
    fn staged_render_runs_hooks_exactly_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = staged_with_world(2);
        let mut game = game();
        let mut ctx = RenderContext::new();
        let mut device = RecordingDevice::new();
        let mut hooks: Vec<Box<dyn EngineHook>> =
            vec![Box::new(SpyHook { log: log.clone() })];

        manager
            .render(&mut game, &mut ctx, &mut device, &mut hooks)
            .unwrap();

        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn direct_render_never_touches_hooks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut manager = DirectWorldManager::new();
        manager.register(Box::new(DriftWorld::with_seed("main", 1, 2)));
        manager.switch_to("main").unwrap();

        let mut game = game();
        let mut ctx = RenderContext::new();
        let mut device = RecordingDevice::new();
        let mut hooks: Vec<Box<dyn EngineHook>> =
            vec![Box::new(SpyHook { log: log.clone() })];

        manager
            .render(&mut game, &mut ctx, &mut device, &mut hooks)
            .unwrap();

        assert!(log.lock().unwrap().is_empty());
        assert!(manager.pipeline_mut().is_none());
    }

    #[test]
    fn update_without_active_world_is_a_no_op() {
        let mut manager = StagedWorldManager::new();
        let mut game = game();
        let mut ctx = UpdateContext::new();
        let mut sched = SpyScheduler::new();
        manager.update(&mut game, &mut ctx, &mut sched).unwrap();
        assert_eq!(sched.pumps, 1);
    }
}
