//! Ray Evaluator: analytic ray casting against a fixed sphere-and-cells scene.
//!
//! [`evaluate`] colors one pixel from a camera snapshot. [`CpuRenderer`] runs
//! it across a whole viewport on the rayon pool; the wgpu backend runs the same
//! algorithm in a fragment shader.
//!
//! # Invariants
//! - Evaluation is pure: no state is shared or mutated between pixels.
//! - Renderers never mutate camera state.
//! - Degenerate ray directions never produce non-finite colors.

mod evaluator;
mod ray;
mod renderer;
mod scene;
mod viewport;

pub use evaluator::{evaluate, primary_ray};
pub use ray::{Hit, RECIP_SATURATION, Ray, intersect_aabb, intersect_sphere};
pub use renderer::{AsciiRenderer, CpuRenderer, Frame, Renderer};
pub use scene::{Aabb, NormalColoring, Sample, Scene, Sphere};
pub use viewport::{Viewport, ViewportError};

pub fn crate_info() -> &'static str {
    "raycast-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
