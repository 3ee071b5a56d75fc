//! wgpu backend for the host graphics device.
//!
//! Draw calls batch into the current frame and flush as one render pass on
//! present. The orbit camera lives on the host side of the device seam.
//!
//! # Invariants
//! - The backend never mutates world or driver state.
//! - A lost or outdated surface drops the frame, never the process.
//! - Instance batches past the buffer capacity are truncated, not grown.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuDevice;
