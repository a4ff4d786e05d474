//! Shared types for the raycast viewer.
//!
//! # Invariants
//! - `CameraState` stores only position, yaw and pitch; the basis is always derived.
//! - Constructed poses have yaw in `[0, 360)` and pitch in `[-89, 89]`.
//! - `CameraView` is an immutable snapshot; evaluators never write back to the camera.

pub mod types;

pub use types::{
    CameraBasis, CameraState, CameraView, MAX_PITCH_DEGREES, Rgba, clamp_pitch, unit, wrap_degrees,
};
