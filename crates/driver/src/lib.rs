//! Frame driver: the state machine between the host's tick and the game.
//!
//! The host calls `update(frame_time)` then `draw(frame_time)` once per tick
//! on one thread. Before the game is live the driver shows the splash screen
//! and pumps cooperative tasks; a single background thread runs the startup
//! construction sequence; once its payload arrives the driver installs it,
//! flips to Ready, and from then on dispatches hooks and the world manager.
//!
//! # Invariants
//! - `NotStarted -> EarlyLoading -> Ready` is monotonic and flips at most
//!   once, always on the driver's thread.
//! - The bootstrap worker runs at most once per process; its failure is
//!   sticky and surfaces from every later `update`.
//! - The scheduler is pumped at most once per pre-ready update, and only
//!   after at least one early draw.

mod bootstrap;
mod config;
mod diagnostics;
mod driver;
mod game;

pub use bootstrap::{BootstrapError, BootstrapPayload, StartupLoadCoordinator};
pub use config::{ConfigError, DriverConfig};
pub use diagnostics::{StartupTrace, TraceEntry};
pub use driver::{DriverError, DriverState, FrameDriver};
pub use game::GameDefinition;

pub fn crate_info() -> &'static str {
    "cadence-driver v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("driver"));
    }
}
