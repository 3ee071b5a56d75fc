use cadence_common::{FrameTime, GameTime};

use crate::host::HostWindow;
use crate::manager::WorldManager;

/// Per-game state threaded through every hook and world-manager call.
///
/// Owns the host window and the world-manager slot. The slot is taken out
/// for the duration of a manager dispatch and restored afterwards, so the
/// manager can itself receive `&mut GameContext`.
pub struct GameContext {
    frame_count: u64,
    fps: u32,
    time: GameTime,
    active_world: Option<String>,
    window: Box<dyn HostWindow>,
    world_manager: Option<Box<dyn WorldManager>>,
}

impl GameContext {
    pub fn new(window: Box<dyn HostWindow>, manager: Box<dyn WorldManager>) -> Self {
        Self {
            frame_count: 0,
            fps: 0,
            time: GameTime::default(),
            active_world: None,
            window,
            world_manager: Some(manager),
        }
    }

    /// Marks the start of a ready update: stamps game-time, publishes the
    /// current FPS sample, counts the frame.
    pub fn begin_frame(&mut self, frame: FrameTime, fps: u32) {
        self.time.stamp(frame);
        self.fps = fps;
        self.frame_count += 1;
    }

    /// Restamps game-time without counting a frame (draw path).
    pub fn stamp_time(&mut self, frame: FrameTime) {
        self.time.stamp(frame);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn time(&self) -> GameTime {
        self.time
    }

    pub fn active_world(&self) -> Option<&str> {
        self.active_world.as_deref()
    }

    pub fn set_active_world(&mut self, name: impl Into<String>) {
        self.active_world = Some(name.into());
    }

    pub fn window(&self) -> &dyn HostWindow {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> &mut dyn HostWindow {
        self.window.as_mut()
    }

    /// Removes the world manager from its slot for a dispatch.
    pub fn take_world_manager(&mut self) -> Option<Box<dyn WorldManager>> {
        self.world_manager.take()
    }

    /// Restores the world manager after a dispatch.
    pub fn put_world_manager(&mut self, manager: Box<dyn WorldManager>) {
        self.world_manager = Some(manager);
    }

    pub fn world_manager_mut(&mut self) -> Option<&mut (dyn WorldManager + 'static)> {
        self.world_manager.as_deref_mut()
    }
}

/// Per-process update bookkeeping.
#[derive(Debug, Default)]
pub struct UpdateContext {
    frame: FrameTime,
    updates: u64,
}

impl UpdateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&mut self, frame: FrameTime) {
        self.frame = frame;
        self.updates += 1;
    }

    pub fn frame(&self) -> FrameTime {
        self.frame
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

/// Per-process render bookkeeping.
///
/// `pipeline_attached` is the capability tag recorded once at bootstrap:
/// true when the world manager exposed a render pipeline, in which case
/// hooks render through the pipeline and never directly from the driver.
#[derive(Debug, Default)]
pub struct RenderContext {
    is_rendering: bool,
    pipeline_attached: bool,
    draws: u64,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rendering(&mut self, rendering: bool) {
        self.is_rendering = rendering;
    }

    pub fn is_rendering(&self) -> bool {
        self.is_rendering
    }

    pub fn attach_pipeline(&mut self) {
        self.pipeline_attached = true;
    }

    pub fn pipeline_attached(&self) -> bool {
        self.pipeline_attached
    }

    pub fn record_draw(&mut self) {
        self.draws += 1;
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessWindow;
    use crate::host::GraphicsDevice;
    use crate::hook::EngineHook;
    use crate::task::TaskScheduler;
    use cadence_common::FrameError;

    struct NullManager;

    impl WorldManager for NullManager {
        fn update(
            &mut self,
            _game: &mut GameContext,
            _ctx: &mut UpdateContext,
            _scheduler: &mut dyn TaskScheduler,
        ) -> Result<(), FrameError> {
            Ok(())
        }

        fn render(
            &mut self,
            _game: &mut GameContext,
            _ctx: &mut RenderContext,
            _device: &mut dyn GraphicsDevice,
            _hooks: &mut [Box<dyn EngineHook>],
        ) -> Result<(), FrameError> {
            Ok(())
        }

        fn switch_to(&mut self, _name: &str) -> Result<(), FrameError> {
            Ok(())
        }

        fn active_world(&self) -> Option<&str> {
            None
        }
    }

    fn context() -> GameContext {
        GameContext::new(Box::new(HeadlessWindow::new(640, 480)), Box::new(NullManager))
    }

    #[test]
    fn begin_frame_counts_and_stamps() {
        let mut game = context();
        game.begin_frame(FrameTime::from_millis(16, 16), 0);
        game.begin_frame(FrameTime::from_millis(16, 32), 60);
        assert_eq!(game.frame_count(), 2);
        assert_eq!(game.fps(), 60);
        assert_eq!(game.time().total.as_millis(), 32);
    }

    #[test]
    fn stamp_time_does_not_count_frames() {
        let mut game = context();
        game.stamp_time(FrameTime::from_millis(16, 16));
        assert_eq!(game.frame_count(), 0);
        assert_eq!(game.time().delta.as_millis(), 16);
    }

    #[test]
    fn manager_slot_round_trips() {
        let mut game = context();
        let manager = game.take_world_manager().unwrap();
        assert!(game.world_manager_mut().is_none());
        game.put_world_manager(manager);
        assert!(game.world_manager_mut().is_some());
    }

    #[test]
    fn render_context_capability_tag_sticks() {
        let mut ctx = RenderContext::new();
        assert!(!ctx.pipeline_attached());
        ctx.attach_pipeline();
        assert!(ctx.pipeline_attached());
    }

    #[test]
    fn update_context_counts_stamps() {
        let mut ctx = UpdateContext::new();
        ctx.stamp(FrameTime::from_millis(16, 16));
        ctx.stamp(FrameTime::from_millis(16, 32));
        assert_eq!(ctx.updates(), 2);
        assert_eq!(ctx.frame().total.as_millis(), 32);
    }
}
