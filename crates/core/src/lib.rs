//! Frame contexts and the seams the frame driver talks through.
//!
//! # Invariants
//! - One GameContext per running game; contexts are mutated only on the
//!   tick thread.
//! - `RenderContext.is_rendering` is true exactly for the duration of a
//!   ready draw.
//! - The pipeline capability tag is resolved once at bootstrap and never
//!   changes afterwards.

mod context;
mod headless;
mod hook;
mod host;
mod manager;
mod task;

pub use context::{GameContext, RenderContext, UpdateContext};
pub use headless::{DeviceOp, HeadlessWindow, RecordingDevice, SolidLoadingScreen, TracingAnalytics};
pub use hook::EngineHook;
pub use host::{
    AnalyticsSink, CloseDecision, GraphicsDevice, HostWindow, LoadingScreen, RenderInstance, Splash,
};
pub use manager::WorldManager;
pub use task::TaskScheduler;

pub fn crate_info() -> &'static str {
    "cadence-core v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("core"));
    }
}
