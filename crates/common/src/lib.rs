//! Shared timing and identity types for the cadence engine.
//!
//! # Invariants
//! - Everything here is plain data; only `FrameClock` reads the host clock.
//! - FPS samples are whole-frame counts over at-least-one-second windows,
//!   never smoothed.

mod error;
mod time;
mod types;

pub use error::{FrameError, FramePhase, PassStage};
pub use time::{FpsCounter, FrameClock, FrameTime, GameTime};
pub use types::{EntityId, WorldLayer};

pub fn crate_info() -> &'static str {
    "cadence-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
