//! wgpu render backend for the ray caster.
//!
//! Evaluates the scene per pixel in a fragment shader, or presents frames
//! produced by the CPU renderer through a textured fullscreen triangle.
//!
//! # Invariants
//! - The shader computes the same function as `raycast_render::evaluate`.
//! - The renderer never mutates camera state.
//! - Surface sizes of zero are never configured.

mod context;
mod gpu;
pub mod shaders;

pub use context::{GpuContext, GpuError};
pub use gpu::WgpuRenderer;

pub fn crate_info() -> &'static str {
    "raycast-render-wgpu v0.1.0"
}
