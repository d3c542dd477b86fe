use foundation::math::Vec3;

use crate::World;
use crate::entity::EntityId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
    /// Opaque sphere (center, radius) that hides markers behind it.
    pub occluder: Option<(Vec3, f64)>,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
            occluder: None,
        }
    }
}

/// Deterministic ray picking for marker entities.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - If multiple markers are hit at the same distance, the lower `EntityId::index()` wins.
///
/// Notes:
/// - Each marker is tested as a sphere of its drawable radius times its world scale,
///   so a hovered (enlarged) marker is easier to keep hovered.
/// - Markers farther than the occluder's entry point are ignored.
pub fn pick_ray(world: &World, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalize()?;
    let ray = Ray::new(ray.origin, dir);

    let limit = opts
        .occluder
        .and_then(|(center, radius)| ray_sphere_hit_t(ray, center, radius))
        .map_or(opts.max_distance, |t| t.min(opts.max_distance));

    let mut best: Option<(f64, EntityId)> = None;
    for entity in world.markers() {
        let Some(drawable) = world.drawable_3d(entity) else {
            continue;
        };
        let (Some(center), Some(scale)) = (world.world_position(entity), world.world_scale(entity))
        else {
            continue;
        };
        let Some(t) = ray_sphere_hit_t(ray, center, drawable.radius() * scale) else {
            continue;
        };
        if t > limit {
            continue;
        }

        best = match best {
            None => Some((t, entity)),
            Some((bt, be)) => {
                let ord = t.total_cmp(&bt).then_with(|| entity.index().cmp(&be.index()));
                if ord.is_lt() {
                    Some((t, entity))
                } else {
                    Some((bt, be))
                }
            }
        };
    }

    let (t, entity) = best?;
    Some(PickHit {
        entity,
        distance: t,
        point: ray.at(t),
    })
}

/// Entry distance of a normalized ray into a sphere; `Some(0.0)` if the
/// origin is inside.
pub(crate) fn ray_sphere_hit_t(ray: Ray, center: Vec3, radius: f64) -> Option<f64> {
    if radius <= 0.0 {
        return None;
    }
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, Ray, pick_ray};
    use crate::World;
    use crate::components::{Drawable3D, LocationId, Marker, Transform};
    use crate::entity::EntityId;
    use foundation::math::Vec3;

    fn marker_at(world: &mut World, position: Vec3, radius: f64) -> EntityId {
        let e = world.spawn();
        world.set_transform(e, Transform::translate(position));
        world.set_drawable_3d(e, Drawable3D::sphere(radius, 8));
        world.set_marker(e, Marker::new(LocationId(e.index())));
        e
    }

    #[test]
    fn ray_picks_nearest_hit() {
        let mut world = World::new();
        let a = marker_at(&mut world, Vec3::new(5.0, 0.0, 0.0), 1.0);
        let _b = marker_at(&mut world, Vec3::new(10.0, 0.0, 0.0), 1.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let hit = pick_ray(&world, ray, PickOptions::default()).expect("hit");
        assert_eq!(hit.entity, a);
        assert!((hit.distance - 4.0).abs() < 1e-12);
        assert_eq!(hit.point, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn tie_breaks_by_entity_index() {
        let mut world = World::new();
        let first = marker_at(&mut world, Vec3::new(5.0, 0.0, 0.0), 1.0);
        let _second = marker_at(&mut world, Vec3::new(5.0, 0.0, 0.0), 1.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let hit = pick_ray(&world, ray, PickOptions::default()).expect("hit");
        assert_eq!(hit.entity, first);
    }

    #[test]
    fn misses_return_none() {
        let mut world = World::new();
        marker_at(&mut world, Vec3::new(5.0, 3.0, 0.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert!(pick_ray(&world, ray, PickOptions::default()).is_none());
        let degenerate = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(pick_ray(&world, degenerate, PickOptions::default()).is_none());
    }

    #[test]
    fn occluder_hides_markers_behind_it() {
        let mut world = World::new();
        // Marker on the far side of a unit sphere seen from +Z.
        marker_at(&mut world, Vec3::new(0.0, 0.0, -1.02), 0.02);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));

        let opts = PickOptions {
            occluder: Some((Vec3::ZERO, 1.0)),
            ..PickOptions::default()
        };
        assert!(pick_ray(&world, ray, opts).is_none());
        assert!(pick_ray(&world, ray, PickOptions::default()).is_some());
    }
}
