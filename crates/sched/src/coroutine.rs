use cadence_core::{GameContext, TaskScheduler, UpdateContext};

/// Outcome of advancing a cooperative task one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Complete,
}

/// A suspended unit of cooperative work.
///
/// `advance` runs one step and returns whether more work remains. Contexts
/// are absent before the game is live and present afterwards; tasks must
/// handle both.
pub trait CoTask: Send {
    fn name(&self) -> &str {
        "task"
    }

    fn advance(
        &mut self,
        game: Option<&mut GameContext>,
        ctx: Option<&mut UpdateContext>,
    ) -> TaskState;
}

/// Closure-backed cooperative task.
pub struct FnTask<F> {
    name: String,
    step: F,
}

impl<F> FnTask<F>
where
    F: FnMut(Option<&mut GameContext>, Option<&mut UpdateContext>) -> TaskState + Send,
{
    pub fn new(name: impl Into<String>, step: F) -> Self {
        Self {
            name: name.into(),
            step,
        }
    }
}

impl<F> CoTask for FnTask<F>
where
    F: FnMut(Option<&mut GameContext>, Option<&mut UpdateContext>) -> TaskState + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn advance(
        &mut self,
        game: Option<&mut GameContext>,
        ctx: Option<&mut UpdateContext>,
    ) -> TaskState {
        (self.step)(game, ctx)
    }
}

/// Scheduler statistics for instrumentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PumpStats {
    pub pumps: u64,
    pub advanced_last_pump: usize,
    pub retired_total: usize,
}

/// Round-robin scheduler over boxed cooperative tasks.
#[derive(Default)]
pub struct CoroutineScheduler {
    tasks: Vec<Box<dyn CoTask>>,
    stats: PumpStats,
}

impl CoroutineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task at the tail of the round-robin order.
    pub fn spawn(&mut self, task: Box<dyn CoTask>) {
        tracing::debug!(task = task.name(), "task spawned");
        self.tasks.push(task);
    }

    pub fn stats(&self) -> PumpStats {
        self.stats
    }
}

impl TaskScheduler for CoroutineScheduler {
    fn pump(&mut self, mut game: Option<&mut GameContext>, mut ctx: Option<&mut UpdateContext>) {
        let _span = tracing::info_span!("task_pump").entered();
        self.stats.pumps += 1;

        let before = self.tasks.len();
        let mut advanced = 0;
        self.tasks.retain_mut(|task| {
            advanced += 1;
            match task.advance(game.as_deref_mut(), ctx.as_deref_mut()) {
                TaskState::Pending => true,
                TaskState::Complete => {
                    tracing::debug!(task = task.name(), "task complete");
                    false
                }
            }
        });

        self.stats.advanced_last_pump = advanced;
        self.stats.retired_total += before - self.tasks.len();
        tracing::trace!(
            advanced,
            pending = self.tasks.len(),
            "pump complete"
        );
    }

    fn pending(&self) -> usize {
        self.tasks.len()
    }
}
