use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Normalize `v`, asserting in debug builds that it has non-zero length.
///
/// Every caller feeds clamped or guarded inputs, so a zero-length vector here
/// is a broken invariant rather than a runtime condition.
#[inline]
pub fn unit(v: Vec3) -> Vec3 {
    debug_assert!(
        v.length_squared() > 0.0,
        "normalizing a zero-length vector: {v:?}"
    );
    v.normalize()
}

/// Pitch limit in degrees. The basis is undefined at exactly +-90.
pub const MAX_PITCH_DEGREES: f32 = 89.0;

/// Wrap an angle into `[0, 360)`. Non-finite angles map to 0.
pub fn wrap_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clamp a pitch into `[-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES]`. NaN maps to 0.
pub fn clamp_pitch(degrees: f32) -> f32 {
    if degrees.is_nan() {
        0.0
    } else {
        degrees.clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES)
    }
}

/// Orthonormal right-handed camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraBasis {
    /// Derive the frame from yaw and pitch in degrees.
    ///
    /// Forward comes first, right is `+Y x forward`, and up is `forward x right`.
    /// The triple degenerates only at the pitch poles, which callers clamp away.
    pub fn from_yaw_pitch(yaw_degrees: f32, pitch_degrees: f32) -> Self {
        let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = pitch_degrees.to_radians().sin_cos();

        let forward = unit(Vec3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch));
        let right = unit(Vec3::Y.cross(forward));
        let up = unit(forward.cross(right));

        Self { forward, right, up }
    }
}

/// Camera pose owned by the controller.
///
/// Yaw lives in `[0, 360)` and pitch in `[-89, 89]`, both in degrees.
/// [`CameraState::new`] enforces both ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl CameraState {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw: wrap_degrees(yaw),
            pitch: clamp_pitch(pitch),
        }
    }

    pub fn basis(&self) -> CameraBasis {
        CameraBasis::from_yaw_pitch(self.yaw, self.pitch)
    }

    /// Snapshot of position and basis for one frame of evaluation.
    pub fn view(&self) -> CameraView {
        let basis = self.basis();
        CameraView {
            position: self.position,
            forward: basis.forward,
            right: basis.right,
            up: basis.up,
        }
    }
}

/// The four vectors the per-pixel evaluator reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for CameraView {
    fn default() -> Self {
        CameraState::default().view()
    }
}

/// Linear RGBA color with channels nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(rgb: Vec3) -> Self {
        Self::new(rgb.x, rgb.y, rgb.z, 1.0)
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    /// Quantize to 8 bits per channel the way a UNORM render target does:
    /// values clamp to `[0, 1]` and round to nearest.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}
