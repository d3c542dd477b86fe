use formats::LocationRecord;
use foundation::handles::Handle;
use foundation::math::Vec3;

use crate::components::{Drawable3D, LocationId, Marker, Material, TextureId, Transform};
use crate::entity::EntityId;

/// Parent chains deeper than this are treated as broken.
const MAX_PARENT_DEPTH: usize = 16;

#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    transforms: Vec<Option<Transform>>,
    drawables_3d: Vec<Option<Drawable3D>>,
    materials: Vec<Option<Material>>,
    markers: Vec<Option<Marker>>,
    locations: Vec<LocationRecord>,
    textures: Vec<String>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index));
        self.next_index += 1;
        let idx = id.index() as usize;
        self.ensure_capacity(idx);
        id
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms.get(entity.index() as usize).and_then(|t| *t)
    }

    pub fn transform_mut(&mut self, entity: EntityId) -> Option<&mut Transform> {
        self.transforms
            .get_mut(entity.index() as usize)
            .and_then(|t| t.as_mut())
    }

    pub fn set_drawable_3d(&mut self, entity: EntityId, drawable: Drawable3D) {
        self.ensure_capacity(entity.index() as usize);
        self.drawables_3d[entity.index() as usize] = Some(drawable);
    }

    pub fn drawable_3d(&self, entity: EntityId) -> Option<Drawable3D> {
        self.drawables_3d.get(entity.index() as usize).and_then(|d| *d)
    }

    pub fn set_material(&mut self, entity: EntityId, material: Material) {
        self.ensure_capacity(entity.index() as usize);
        self.materials[entity.index() as usize] = Some(material);
    }

    pub fn material(&self, entity: EntityId) -> Option<Material> {
        self.materials.get(entity.index() as usize).and_then(|m| *m)
    }

    pub fn material_mut(&mut self, entity: EntityId) -> Option<&mut Material> {
        self.materials
            .get_mut(entity.index() as usize)
            .and_then(|m| m.as_mut())
    }

    pub fn add_location(&mut self, record: LocationRecord) -> LocationId {
        let id = LocationId(self.locations.len() as u32);
        self.locations.push(record);
        id
    }

    pub fn location(&self, id: LocationId) -> Option<&LocationRecord> {
        self.locations.get(id.0 as usize)
    }

    pub fn add_texture(&mut self, url: impl Into<String>) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(url.into());
        id
    }

    pub fn texture_url(&self, id: TextureId) -> Option<&str> {
        self.textures.get(id.0 as usize).map(String::as_str)
    }

    pub fn set_marker(&mut self, entity: EntityId, marker: Marker) {
        self.ensure_capacity(entity.index() as usize);
        self.markers[entity.index() as usize] = Some(marker);
    }

    pub fn marker(&self, entity: EntityId) -> Option<Marker> {
        self.markers.get(entity.index() as usize).and_then(|m| *m)
    }

    /// Record behind a marker entity.
    pub fn marker_location(&self, entity: EntityId) -> Option<&LocationRecord> {
        self.marker(entity).and_then(|m| self.location(m.location))
    }

    /// Marker entities in ascending index order.
    pub fn markers(&self) -> Vec<EntityId> {
        self.markers
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_some())
            .map(|(idx, _)| EntityId(Handle::new(idx as u32)))
            .collect()
    }

    pub fn drawables_3d(&self) -> Vec<(EntityId, Transform, Drawable3D)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables_3d.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            out.push((EntityId(Handle::new(idx as u32)), transform, *drawable));
        }
        out
    }

    /// Maps `local` (in `entity`'s space) to world space through the parent chain.
    pub fn to_world(&self, entity: EntityId, local: Vec3) -> Option<Vec3> {
        let mut point = local;
        let mut current = Some(entity);
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(e) = current else {
                return Some(point);
            };
            let transform = self.transform(e)?;
            point = transform.apply(point);
            current = transform.parent;
        }
        if current.is_none() {
            Some(point)
        } else {
            log::warn!("parent chain of entity {} is too deep", entity.index());
            None
        }
    }

    /// World-space origin of `entity`.
    pub fn world_position(&self, entity: EntityId) -> Option<Vec3> {
        self.to_world(entity, Vec3::ZERO)
    }

    /// Product of scales along the parent chain.
    pub fn world_scale(&self, entity: EntityId) -> Option<f64> {
        let mut scale = 1.0;
        let mut current = Some(entity);
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(e) = current else {
                return Some(scale);
            };
            let transform = self.transform(e)?;
            scale *= transform.scale;
            current = transform.parent;
        }
        current.is_none().then_some(scale)
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.transforms.resize(new_len, None);
            self.drawables_3d.resize(new_len, None);
            self.materials.resize(new_len, None);
            self.markers.resize(new_len, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::World;
    use crate::components::{Drawable3D, Transform};
    use foundation::math::Vec3;

    #[test]
    fn spawn_and_collect_drawables() {
        let mut world = World::new();
        let entity = world.spawn();
        world.set_transform(entity, Transform::identity());
        world.set_drawable_3d(entity, Drawable3D::sphere(1.0, 16));

        let drawables = world.drawables_3d();
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].0, entity);
    }

    #[test]
    fn entities_without_transform_are_skipped() {
        let mut world = World::new();
        let entity = world.spawn();
        world.set_drawable_3d(entity, Drawable3D::sphere(1.0, 16));
        assert!(world.drawables_3d().is_empty());
    }

    #[test]
    fn child_follows_parent_rotation() {
        let mut world = World::new();
        let parent = world.spawn();
        world.set_transform(parent, Transform::identity());
        let child = world.spawn();
        world.set_transform(
            child,
            Transform::translate(Vec3::new(1.0, 0.0, 0.0)).with_parent(parent),
        );

        world
            .transform_mut(parent)
            .expect("parent transform")
            .rotation_y = std::f64::consts::FRAC_PI_2;

        let p = world.world_position(child).expect("resolved");
        assert!(p.x.abs() < 1e-12);
        assert!((p.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn parent_cycles_do_not_hang() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        world.set_transform(a, Transform::identity().with_parent(b));
        world.set_transform(b, Transform::identity().with_parent(a));
        assert!(world.world_position(a).is_none());
        assert!(world.world_scale(a).is_none());
    }
}
