//! Render passes: ordered multi-pass frame composition.
//!
//! # Invariants
//! - Passes execute strictly in append order; there is no priority system.
//! - A pass only ever sees its immediate neighbours (previous in `begin`,
//!   next in `end`).
//! - Only a post-processing pass receives an upstream render target.

mod pass;
mod pipeline;

pub use pass::{BasicPass, PassFlags, RenderPass, RenderTarget};
pub use pipeline::{RenderPipeline, SceneRenderer};

pub fn crate_info() -> &'static str {
    "cadence-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
