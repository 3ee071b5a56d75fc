//! Cooperative task scheduling: suspended work advanced one step per pump.
//!
//! # Invariants
//! - The scheduler has no thread of its own; it only runs inside `pump`.
//! - Each pump advances every suspended task exactly once, in spawn order.
//! - A completed task is retired in place and never advanced again.

mod coroutine;

pub use coroutine::{CoTask, CoroutineScheduler, FnTask, PumpStats, TaskState};

pub fn crate_info() -> &'static str {
    "cadence-sched v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("sched"));
    }
}
