//! Developer tooling: frame timing and camera inspection for overlays and logs.
//!
//! # Invariants
//! - Tools only read camera state.
//! - Frame time comes from a monotonic clock and is never negative.

pub mod clock;
pub mod inspector;

pub use clock::{FrameClock, FrameStats};
pub use inspector::{CameraInspector, CameraSummary};

pub fn crate_info() -> &'static str {
    "raycast-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
