use crate::ray::Ray;
use crate::scene::Scene;
use glam::Vec2;
use raycast_common::{CameraView, Rgba, unit};

/// Primary ray through a normalized pixel coordinate.
///
/// `uv` is in `[0, 1]^2` with v growing upward. The horizontal screen axis is
/// scaled by `aspect` (width / height); the image plane sits one unit along
/// forward, which fixes the vertical field of view at 90 degrees.
pub fn primary_ray(view: &CameraView, uv: Vec2, aspect: f32) -> Ray {
    let screen = uv * 2.0 - Vec2::ONE;
    let direction = unit(view.right * screen.x * aspect + view.up * screen.y + view.forward);
    Ray::new(view.position, direction)
}

/// Color of one pixel. Pure: identical inputs give bitwise identical output,
/// so pixels may be evaluated in any order on any thread.
pub fn evaluate(view: &CameraView, scene: &Scene, uv: Vec2, aspect: f32) -> Rgba {
    scene.shade(&primary_ray(view, uv, aspect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use raycast_common::CameraState;

    #[test]
    fn image_center_looks_along_forward() {
        let view = CameraState::new(Vec3::new(1.0, 2.0, 3.0), 37.0, -12.0).view();
        let ray = primary_ray(&view, Vec2::splat(0.5), 1.7);
        assert_eq!(ray.origin, view.position);
        assert!(ray.direction.abs_diff_eq(view.forward, 1e-6));
    }

    #[test]
    fn edges_scale_with_aspect() {
        let view = CameraView::default();
        let right_edge = primary_ray(&view, Vec2::new(1.0, 0.5), 2.0);
        assert!(right_edge.direction.abs_diff_eq(Vec3::new(2.0, 0.0, 1.0).normalize(), 1e-6));

        let top_edge = primary_ray(&view, Vec2::new(0.5, 1.0), 2.0);
        assert!(top_edge.direction.abs_diff_eq(Vec3::new(0.0, 1.0, 1.0).normalize(), 1e-6));

        let bottom_left = primary_ray(&view, Vec2::ZERO, 1.0);
        assert!(bottom_left.direction.abs_diff_eq(Vec3::new(-1.0, -1.0, 1.0).normalize(), 1e-6));
    }

    #[test]
    fn center_pixel_shows_cell_front_face() {
        let view = CameraView::default();
        let color = evaluate(&view, &Scene::default(), Vec2::splat(0.5), 1.0);
        assert_eq!(color, Rgba::new(0.0, 0.0, -1.0, 1.0));
    }

    #[test]
    fn evaluation_is_bitwise_repeatable() {
        let view = CameraState::new(Vec3::new(0.3, -0.2, 1.0), 12.5, 7.25).view();
        let scene = Scene::default();
        for i in 0..64 {
            let uv = Vec2::new((i % 8) as f32 / 7.0, (i / 8) as f32 / 7.0);
            let a = evaluate(&view, &scene, uv, 1.5);
            let b = evaluate(&view, &scene, uv, 1.5);
            assert_eq!(a.r.to_bits(), b.r.to_bits());
            assert_eq!(a.g.to_bits(), b.g.to_bits());
            assert_eq!(a.b.to_bits(), b.b.to_bits());
            assert_eq!(a.a.to_bits(), b.a.to_bits());
        }
    }

    #[test]
    fn looking_away_shows_background() {
        let view = CameraState::new(Vec3::ZERO, 180.0, 0.0).view();
        let scene = Scene::default();
        let color = evaluate(&view, &scene, Vec2::splat(0.5), 1.0);
        assert_eq!(color, scene.background_color);
    }
}
