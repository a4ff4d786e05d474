//! Camera controller for the raycast viewer.
//!
//! Consumes one [`raycast_input::InputFrame`] per frame and produces the next
//! [`raycast_common::CameraState`].
//!
//! # Invariants
//! - Pitch stays within `[-89, 89]` degrees so the basis never degenerates.
//! - Yaw stays within `[0, 360)` degrees.
//! - Degenerate frame times move nothing.
//! - Non-finite tunables never reach the pose.

mod controller;

pub use controller::{CameraConfig, CameraConfigError, CameraController};
pub use raycast_common::MAX_PITCH_DEGREES;

pub fn crate_info() -> &'static str {
    "raycast-camera v0.1.0"
}
