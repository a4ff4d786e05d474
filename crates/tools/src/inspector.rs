use glam::Vec3;
use raycast_common::CameraState;

/// Camera inspector for developer tooling.
///
/// Provides read-only views of the camera pose for the overlay, logs and CLI.
pub struct CameraInspector;

impl CameraInspector {
    /// Produce a summary of the camera pose and its derived basis.
    pub fn summary(state: &CameraState) -> CameraSummary {
        let basis = state.basis();
        CameraSummary {
            position: state.position,
            yaw: state.yaw,
            pitch: state.pitch,
            forward: basis.forward,
            right: basis.right,
            up: basis.up,
        }
    }

    /// Largest deviation of the derived basis from orthonormality.
    /// Zero for a perfect frame.
    pub fn orthonormality_error(state: &CameraState) -> f32 {
        let b = state.basis();
        [
            b.forward.dot(b.right).abs(),
            b.forward.dot(b.up).abs(),
            b.right.dot(b.up).abs(),
            (b.forward.length() - 1.0).abs(),
            (b.right.length() - 1.0).abs(),
            (b.up.length() - 1.0).abs(),
        ]
        .into_iter()
        .fold(0.0, f32::max)
    }
}

/// Summary of the camera for the inspector.
#[derive(Debug, Clone)]
pub struct CameraSummary {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl std::fmt::Display for CameraSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Camera: pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} fwd=({:.3}, {:.3}, {:.3})",
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw,
            self.pitch,
            self.forward.x,
            self.forward.y,
            self.forward.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_default_camera() {
        let summary = CameraInspector::summary(&CameraState::default());
        assert_eq!(summary.position, Vec3::ZERO);
        assert!(summary.forward.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn orthonormality_error_is_small() {
        let state = CameraState::new(Vec3::ONE, 123.0, -45.0);
        assert!(CameraInspector::orthonormality_error(&state) < 1e-5);
    }

    #[test]
    fn summary_display() {
        let state = CameraState::new(Vec3::new(1.0, 2.0, 3.0), 90.0, 0.0);
        let s = format!("{}", CameraInspector::summary(&state));
        assert!(s.contains("pos=(1.00, 2.00, 3.00)"));
        assert!(s.contains("yaw=90.0"));
    }
}
