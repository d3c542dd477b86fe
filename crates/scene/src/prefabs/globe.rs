use formats::LocationRecord;
use foundation::color::Rgba;
use foundation::math::project;

use crate::World;
use crate::components::{Drawable3D, Marker, Material, Transform};
use crate::config::GlobeConfig;
use crate::entity::EntityId;

/// Spawns the textured earth sphere at the origin.
pub fn spawn_globe(world: &mut World, config: &GlobeConfig) -> EntityId {
    let map = world.add_texture(config.texture_url.clone());
    let borders = world.add_texture(config.borders_texture_url.clone());

    let entity = world.spawn();
    world.set_transform(entity, Transform::identity());
    world.set_drawable_3d(
        entity,
        Drawable3D::sphere(config.radius, config.sphere_segments),
    );
    world.set_material(
        entity,
        Material::textured(map)
            .with_emissive(Rgba::WHITE, config.borders_emissive_intensity)
            .with_emissive_map(borders),
    );
    entity
}

/// Spawns one pin as a child of `globe`, just above the surface at the
/// record's coordinates.
pub fn spawn_location_pin(
    world: &mut World,
    globe: EntityId,
    record: LocationRecord,
    config: &GlobeConfig,
) -> EntityId {
    let position = project(record.latitude, record.longitude, config.marker_altitude());
    let location = world.add_location(record);

    let entity = world.spawn();
    world.set_transform(entity, Transform::translate(position).with_parent(globe));
    world.set_drawable_3d(
        entity,
        Drawable3D::sphere(config.marker_radius, config.marker_segments),
    );
    world.set_material(
        entity,
        Material::solid(config.marker_color)
            .with_emissive(Rgba::BLACK, config.marker_emissive_intensity),
    );
    world.set_marker(entity, Marker::new(location));
    entity
}

#[cfg(test)]
mod tests {
    use super::{spawn_globe, spawn_location_pin};
    use crate::World;
    use crate::components::Shape3D;
    use crate::config::GlobeConfig;
    use formats::{LocationRecord, RecordId};
    use foundation::math::project;

    #[test]
    fn spawns_globe_drawable() {
        let mut world = World::new();
        let config = GlobeConfig::default();
        let entity = spawn_globe(&mut world, &config);

        let drawables = world.drawables_3d();
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].0, entity);
        assert!(matches!(drawables[0].2.shape, Shape3D::Sphere { radius, .. } if radius == 1.0));

        let material = world.material(entity).expect("material");
        let map = material.map.expect("earth map");
        assert_eq!(world.texture_url(map), Some(config.texture_url.as_str()));
        assert!(material.emissive_map.is_some());
    }

    #[test]
    fn pin_sits_above_surface() {
        let mut world = World::new();
        let config = GlobeConfig::default();
        let globe = spawn_globe(&mut world, &config);
        let record = LocationRecord {
            id: RecordId::Number(1),
            location_name: "HQ".to_string(),
            branch_url: "https://x".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        };
        let pin = spawn_location_pin(&mut world, globe, record, &config);

        assert_eq!(
            world.world_position(pin),
            Some(project(0.0, 0.0, config.marker_altitude()))
        );
        assert_eq!(world.marker_location(pin).map(|r| r.location_name.as_str()), Some("HQ"));
        assert_eq!(world.markers(), vec![pin]);
    }
}
