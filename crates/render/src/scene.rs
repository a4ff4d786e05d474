use crate::ray::{Hit, Ray, intersect_aabb, intersect_sphere};
use glam::Vec3;
use raycast_common::Rgba;

/// How a surface normal becomes a pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalColoring {
    /// Write the normal's components straight into RGB. Negative components
    /// clamp to zero on an 8-bit target, so only faces pointing along +x, +y
    /// or +z show color.
    #[default]
    Clamped,
    /// Remap `[-1, 1]` into `[0, 1]` so every face is distinguishable.
    Biased,
}

impl NormalColoring {
    pub fn color(self, normal: Vec3) -> Rgba {
        match self {
            Self::Clamped => Rgba::opaque(normal),
            Self::Biased => Rgba::opaque(normal * 0.5 + Vec3::splat(0.5)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        intersect_sphere(ray, self.center, self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        intersect_aabb(ray, self.center, self.half_extents)
    }
}

/// What a primary ray found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Missed the sphere.
    Background,
    /// Hit the sphere but not the grid cell snapped to the hit point.
    Surface { surface: Hit },
    /// Hit the cell box around the rounded sphere hit point.
    Cell { surface: Hit, cell: Aabb, hit: Hit },
}

/// The fixed placeholder scene: one sphere, decorated with small boxes that
/// snap to the integer lattice point nearest to wherever the sphere is hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub sphere: Sphere,
    pub cell_half_extents: Vec3,
    /// Color where the sphere is hit but its cell box is not.
    pub surface_color: Rgba,
    /// Color where the sphere is missed.
    pub background_color: Rgba,
    pub normal_coloring: NormalColoring,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            sphere: Sphere {
                center: Vec3::new(0.0, 0.0, 12.0),
                radius: 10.0,
            },
            cell_half_extents: Vec3::splat(0.4),
            surface_color: Rgba::new(0.1, 0.1, 0.1, 1.0),
            background_color: Rgba::new(0.1, 0.1, 0.1, 1.0),
            normal_coloring: NormalColoring::Clamped,
        }
    }
}

impl Scene {
    /// Cast against the sphere, then against the cell box at the rounded hit point.
    pub fn cast(&self, ray: &Ray) -> Sample {
        let Some(surface) = self.sphere.intersect(ray) else {
            return Sample::Background;
        };

        let cell = Aabb {
            center: surface.point.round(),
            half_extents: self.cell_half_extents,
        };
        match cell.intersect(ray) {
            Some(hit) => Sample::Cell { surface, cell, hit },
            None => Sample::Surface { surface },
        }
    }

    pub fn shade(&self, ray: &Ray) -> Rgba {
        match self.cast(ray) {
            Sample::Background => self.background_color,
            Sample::Surface { .. } => self.surface_color,
            Sample::Cell { hit, .. } => self.normal_coloring.color(hit.normal),
        }
    }
}
