use raycast_common::{CameraBasis, CameraState, clamp_pitch, wrap_degrees};
use raycast_input::{DirectionalKeys, InputAccumulator, InputFrame};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected camera tunables.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CameraConfigError {
    #[error("sensitivity must be finite and positive, got {0}")]
    Sensitivity(f32),
    #[error("speed must be finite and positive, got {0}")]
    Speed(f32),
}

/// Tunables for mouse look and movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Degrees of rotation per raw mouse unit.
    pub sensitivity: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.5,
            speed: 5.0,
        }
    }
}

impl CameraConfig {
    /// Validated constructor for values coming from the command line.
    pub fn new(sensitivity: f32, speed: f32) -> Result<Self, CameraConfigError> {
        if !is_positive(sensitivity) {
            return Err(CameraConfigError::Sensitivity(sensitivity));
        }
        if !is_positive(speed) {
            return Err(CameraConfigError::Speed(speed));
        }
        Ok(Self { sensitivity, speed })
    }
}

/// Integrates mouse look and key movement into a [`CameraState`].
///
/// Orientation is updated first and movement uses the new basis, so turning
/// and walking in the same frame walks in the new direction. Simultaneous keys
/// add up; a diagonal moves faster than a straight line.
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    config: CameraConfig,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config_mut(&mut self) -> &mut CameraConfig {
        &mut self.config
    }

    /// Compute the next camera state from one frame of input.
    ///
    /// Tunables that make a turn or step non-finite contribute nothing.
    pub fn update(&self, state: &CameraState, input: &InputFrame, dt_seconds: f32) -> CameraState {
        let turn = |delta: i32| finite_or_zero(delta as f32 * self.config.sensitivity);
        let yaw = wrap_degrees(state.yaw + turn(input.mouse.dx));
        let pitch = clamp_pitch(state.pitch + turn(input.mouse.dy));

        let basis = CameraBasis::from_yaw_pitch(yaw, pitch);
        let step = finite_or_zero(self.config.speed * sanitize_dt(dt_seconds));

        let mut position = state.position;
        let keys = input.keys;
        if keys.contains(DirectionalKeys::FORWARD) {
            position += basis.forward * step;
        }
        if keys.contains(DirectionalKeys::BACK) {
            position -= basis.forward * step;
        }
        if keys.contains(DirectionalKeys::LEFT) {
            position -= basis.right * step;
        }
        if keys.contains(DirectionalKeys::RIGHT) {
            position += basis.right * step;
        }
        if keys.contains(DirectionalKeys::UP) {
            position += basis.up * step;
        }
        if keys.contains(DirectionalKeys::DOWN) {
            position -= basis.up * step;
        }

        CameraState::new(position, yaw, pitch)
    }

    /// Drain `input` once and advance `state` in place.
    /// Returns the frame that was consumed.
    pub fn step(
        &self,
        state: &mut CameraState,
        input: &InputAccumulator,
        dt_seconds: f32,
    ) -> InputFrame {
        let frame = input.drain();
        *state = self.update(state, &frame, dt_seconds);
        tracing::trace!(
            yaw = state.yaw,
            pitch = state.pitch,
            x = state.position.x,
            y = state.position.y,
            z = state.position.z,
            "camera updated"
        );
        frame
    }
}

/// Paused or stalled frames can report zero, negative or garbage time.
fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
