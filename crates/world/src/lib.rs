//! Worlds and world managers.
//!
//! A `World` owns simulation state and knows how to draw its own geometry
//! layers and entities. A `WorldManager` owns a set of named worlds, keeps
//! one active, and is dispatched by the frame driver once per ready tick.
//!
//! # Invariants
//! - Worlds are stored in name order; registration order does not matter.
//! - The staged manager renders everything through its pipeline; the direct
//!   manager never touches engine hooks (the driver renders them).

mod manager;
mod scene;
mod world;

pub use manager::{DirectWorldManager, StagedWorldManager};
pub use scene::StagedScene;
pub use world::{DriftEntity, DriftWorld, World};

pub fn crate_info() -> &'static str {
    "cadence-world v0.1.0"
}
