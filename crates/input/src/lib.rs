//! Input accumulation between frames.
//!
//! The platform layer writes raw events as they arrive; the camera controller
//! drains one [`InputFrame`] per frame.
//!
//! # Invariants
//! - Mouse deltas are consumed exactly once: a drain returns everything written
//!   since the previous drain and leaves zero behind.
//! - Both mouse axes are read and reset together, never one without the other.
//! - Keys are level-triggered and survive drains.

pub mod accumulator;
pub mod keys;

pub use accumulator::{InputAccumulator, InputFrame, MouseDelta};
pub use keys::{DirectionalKeys, ParseKeysError};

pub fn crate_info() -> &'static str {
    "raycast-input v0.1.0"
}
