use glam::Vec3;

/// Magnitude substituted for the reciprocal of a zero (or denormal) direction
/// component in the slab test. Large enough to push that axis' slab distances
/// out of contention, small enough that `RECIP_SATURATION * extent` stays finite.
pub const RECIP_SATURATION: f32 = 1.0e20;

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest surface intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parametric distance along the (unit) ray direction.
    pub distance: f32,
    pub point: Vec3,
    /// Outward unit surface normal.
    pub normal: Vec3,
}

/// Intersect a ray with a sphere, returning the near hit in front of the origin.
///
/// The sphere center is projected onto the ray; if the perpendicular distance
/// is at least the radius the ray misses. A ray starting inside the sphere or
/// pointing away from it reports no hit.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<Hit> {
    let t = (center - ray.origin).dot(ray.direction);
    let closest = ray.at(t);
    let y = (center - closest).length();
    if y >= radius {
        return None;
    }

    let x = (radius * radius - y * y).sqrt();
    let distance = t - x;
    if distance < 0.0 {
        return None;
    }

    let point = ray.at(distance);
    Some(Hit {
        distance,
        point,
        normal: (point - center) / radius,
    })
}

/// Intersect a ray with an axis-aligned box using the slab method.
///
/// Misses when the slabs do not overlap, when the box is behind the ray, or
/// when the origin is inside the box. The normal is the face of the axis whose
/// entry distance is largest, facing against the ray; ties prefer x, then y.
pub fn intersect_aabb(ray: &Ray, center: Vec3, half_extents: Vec3) -> Option<Hit> {
    let m = saturating_recip(ray.direction);
    let n = m * (ray.origin - center);
    let k = m.abs() * half_extents;
    let t1 = -n - k;
    let t2 = -n + k;

    let t_near = t1.max_element();
    let t_far = t2.min_element();
    if t_near > t_far || t_far < 0.0 || t_near < 0.0 {
        return None;
    }

    let axis = if t1.x >= t1.y && t1.x >= t1.z {
        0
    } else if t1.y >= t1.z {
        1
    } else {
        2
    };
    let mut normal = Vec3::ZERO;
    normal[axis] = -ray.direction[axis].signum();

    Some(Hit {
        distance: t_near,
        point: ray.at(t_near),
        normal,
    })
}

/// Component-wise `1 / v` with infinities clamped to `+-RECIP_SATURATION`.
fn saturating_recip(v: Vec3) -> Vec3 {
    v.recip()
        .clamp(Vec3::splat(-RECIP_SATURATION), Vec3::splat(RECIP_SATURATION))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn sphere_hit_through_known_surface_point() {
        let center = Vec3::new(1.0, -2.0, 10.0);
        let radius = 3.0;
        let origin = Vec3::new(0.5, 0.5, -1.0);
        let surface = center + Vec3::new(-1.0, 2.0, -2.0).normalize() * radius;

        let ray = Ray::new(origin, (surface - origin).normalize());
        let hit = intersect_sphere(&ray, center, radius).expect("ray aims at the surface");

        assert!((hit.distance - (surface - origin).length()).abs() < EPS);
        assert!(hit.point.abs_diff_eq(surface, EPS));
        assert!((hit.normal.length() - 1.0).abs() < EPS);
        let expected = (hit.point - center).normalize();
        assert!(hit.normal.abs_diff_eq(expected, EPS));
    }

    #[test]
    fn sphere_head_on() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = intersect_sphere(&ray, Vec3::new(0.0, 0.0, 12.0), 10.0).unwrap();
        assert!((hit.distance - 2.0).abs() < EPS);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), EPS));
        assert!(hit.normal.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn sphere_miss_when_closest_approach_exceeds_radius() {
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::Z);
        assert!(intersect_sphere(&ray, Vec3::new(0.0, 0.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn sphere_tangent_is_a_miss() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z);
        assert!(intersect_sphere(&ray, Vec3::new(0.0, 0.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn sphere_behind_or_around_origin_is_a_miss() {
        let behind = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(intersect_sphere(&behind, Vec3::new(0.0, 0.0, 5.0), 1.0).is_none());

        let inside = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(intersect_sphere(&inside, Vec3::new(0.0, 0.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn aabb_on_axis_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = intersect_aabb(&ray, Vec3::ZERO, Vec3::splat(0.4)).unwrap();
        assert_eq!(hit.normal, Vec3::Z);
        assert!((hit.distance - 4.6).abs() < EPS);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, 0.4), EPS));
    }

    #[test]
    fn aabb_normal_faces_against_ray_on_every_axis() {
        let center = Vec3::new(3.0, -1.0, 2.0);
        let half = Vec3::new(0.5, 1.0, 0.25);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            for sign in [1.0, -1.0] {
                let dir = axis * sign;
                let ray = Ray::new(center - dir * 10.0, dir);
                let hit = intersect_aabb(&ray, center, half).unwrap();
                assert_eq!(hit.normal, -dir, "dir={dir}");
                let expected = 10.0 - (half * axis).length();
                assert!((hit.distance - expected).abs() < EPS, "dir={dir}");
                assert!(hit.distance.is_finite() && hit.point.is_finite());
            }
        }
    }

    #[test]
    fn aabb_oblique_entry_picks_entry_face() {
        // Enters through the -X face: x reaches -0.4 at t=1.6, y is still inside.
        let origin = Vec3::new(-2.0, 0.3, 0.0);
        let ray = Ray::new(origin, Vec3::new(1.0, -0.1, 0.0).normalize());
        let hit = intersect_aabb(&ray, Vec3::ZERO, Vec3::splat(0.4)).unwrap();
        assert_eq!(hit.normal, Vec3::NEG_X);
        assert!((hit.point.x + 0.4).abs() < EPS);
    }

    #[test]
    fn aabb_misses() {
        let half = Vec3::splat(0.4);
        // Parallel to z but outside the x slab.
        let beside = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::Z);
        assert!(intersect_aabb(&beside, Vec3::ZERO, half).is_none());
        // Box behind the origin.
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(intersect_aabb(&away, Vec3::ZERO, half).is_none());
        // Origin inside the box.
        let inside = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect_aabb(&inside, Vec3::ZERO, half).is_none());
    }

    #[test]
    fn zero_direction_components_stay_finite() {
        let r = saturating_recip(Vec3::new(0.0, -0.0, 2.0));
        assert_eq!(r, Vec3::new(RECIP_SATURATION, -RECIP_SATURATION, 0.5));

        let ray = Ray::new(Vec3::new(0.1, -0.2, -3.0), Vec3::Z);
        let hit = intersect_aabb(&ray, Vec3::ZERO, Vec3::splat(0.4)).unwrap();
        assert!(hit.distance.is_finite());
        assert!(hit.point.is_finite());
        assert_eq!(hit.normal, Vec3::NEG_Z);
    }
}
