use std::f64::consts::TAU;
use std::fmt::Display;

use formats::LocationRecord;
use foundation::color::Rgba;
use foundation::math::{Vec3, unproject};
use foundation::time::Time;
use runtime::{Frame, FrameClock, LoadState};

use crate::World;
use crate::config::GlobeConfig;
use crate::entity::EntityId;
use crate::hover::HoverSet;
use crate::picking::{PickOptions, Ray, pick_ray, ray_sphere_hit_t};
use crate::prefabs::{spawn_globe, spawn_location_pin};

/// Everything a renderer or label overlay needs about one pin this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView<'a> {
    pub entity: EntityId,
    pub name: &'a str,
    pub url: &'a str,
    pub world_position: Vec3,
    pub radius: f64,
    pub scale: f64,
    pub color: Rgba,
    pub emissive: Rgba,
    /// `emissive` scaled by the material's intensity.
    pub emitted: Rgba,
    pub hovered: bool,
}

/// The globe component: scene, load state, rotation and hover.
///
/// State machine: `Loading -> Ready(markers)`, or `Loading -> Empty` when the
/// list is empty, or `Loading -> Failed` when the fetch failed. A failed
/// globe renders exactly like an empty one.
#[derive(Debug)]
pub struct GlobeScene {
    config: GlobeConfig,
    world: World,
    globe: EntityId,
    load: LoadState<Vec<EntityId>>,
    hover: HoverSet,
    clock: FrameClock,
}

impl GlobeScene {
    pub fn new(config: GlobeConfig) -> Self {
        let mut world = World::new();
        let globe = spawn_globe(&mut world, &config);
        Self {
            config,
            world,
            globe,
            load: LoadState::Loading,
            hover: HoverSet::new(),
            clock: FrameClock::default(),
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn globe(&self) -> EntityId {
        self.globe
    }

    pub fn load_state(&self) -> &LoadState<Vec<EntityId>> {
        &self.load
    }

    /// Placeholder text to overlay on the globe, if any.
    pub fn message(&self) -> Option<&str> {
        self.load
            .is_loading()
            .then_some(self.config.loading_text.as_str())
    }

    /// Applies the outcome of the one-shot locations fetch.
    ///
    /// Failures are logged once and leave the globe without pins. Outcomes
    /// arriving after the scene has settled are ignored.
    pub fn on_locations_loaded<E: Display>(
        &mut self,
        result: Result<Vec<LocationRecord>, E>,
    ) -> &LoadState<Vec<EntityId>> {
        if !self.load.is_loading() {
            log::warn!("globe: ignoring locations load after {}", self.load.label());
            return &self.load;
        }

        let next = match result {
            Ok(records) if records.is_empty() => LoadState::Empty,
            Ok(records) => {
                let markers: Vec<EntityId> = records
                    .into_iter()
                    .map(|r| spawn_location_pin(&mut self.world, self.globe, r, &self.config))
                    .collect();
                log::info!("globe: placed {} markers", markers.len());
                LoadState::Ready(markers)
            }
            Err(err) => {
                log::error!("Error fetching locations: {err}");
                LoadState::Failed(err.to_string())
            }
        };
        self.load.settle(next);
        &self.load
    }

    /// Marker entities; empty unless the load succeeded with data.
    pub fn markers(&self) -> &[EntityId] {
        self.load.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Advances the spin by elapsed wall-clock time.
    pub fn tick(&mut self, now: Time) -> Frame {
        let frame = self.clock.tick(now);
        let step = self.config.rotation_speed_rad_s * frame.dt_s;
        if let Some(t) = self.world.transform_mut(self.globe) {
            t.rotation_y = (t.rotation_y + step).rem_euclid(TAU);
        }
        frame
    }

    pub fn rotation_y(&self) -> f64 {
        self.world
            .transform(self.globe)
            .map_or(0.0, |t| t.rotation_y)
    }

    pub fn is_hovered(&self, marker: EntityId) -> bool {
        self.hover.contains(marker)
    }

    /// Sets one marker's hover flag and updates its scale and glow.
    /// Returns `true` if the flag changed.
    pub fn set_hovered(&mut self, marker: EntityId, hovered: bool) -> bool {
        if self.world.marker(marker).is_none() || !self.hover.set(marker, hovered) {
            return false;
        }

        let scale = if hovered { self.config.hover_scale } else { 1.0 };
        let emissive = if hovered {
            self.config.hover_emissive
        } else {
            Rgba::BLACK
        };
        if let Some(t) = self.world.transform_mut(marker) {
            t.scale = scale;
        }
        if let Some(m) = self.world.material_mut(marker) {
            m.emissive = emissive;
        }
        true
    }

    /// Marker under `ray`, ignoring pins hidden behind the globe.
    pub fn pick(&self, ray: Ray) -> Option<EntityId> {
        let opts = PickOptions {
            occluder: Some((Vec3::ZERO, self.config.radius)),
            ..PickOptions::default()
        };
        pick_ray(&self.world, ray, opts).map(|hit| hit.entity)
    }

    /// Pointer moved: the picked marker (if any) becomes the only hovered one.
    pub fn pointer_move(&mut self, ray: Ray) -> Option<EntityId> {
        let picked = self.pick(ray);
        let previous: Vec<EntityId> = self
            .hover
            .iter()
            .filter(|e| Some(*e) != picked)
            .collect();
        for marker in previous {
            self.set_hovered(marker, false);
        }
        if let Some(marker) = picked {
            self.set_hovered(marker, true);
        }
        picked
    }

    pub fn pointer_leave(&mut self) {
        let hovered: Vec<EntityId> = self.hover.iter().collect();
        for marker in hovered {
            self.set_hovered(marker, false);
        }
    }

    /// Latitude and longitude (degrees) of the globe surface under `ray`,
    /// undoing the current spin.
    pub fn surface_coordinates(&self, ray: Ray) -> Option<(f64, f64)> {
        let ray = Ray::new(ray.origin, ray.dir.normalize()?);
        let t = ray_sphere_hit_t(ray, Vec3::ZERO, self.config.radius)?;
        unproject(ray.at(t).rotate_y(-self.rotation_y()))
    }

    /// Hover text for `ray`: the pin's name, else the coordinates under it.
    pub fn tooltip(&self, ray: Ray) -> Option<String> {
        if let Some(view) = self.pick(ray).and_then(|m| self.marker_view(m)) {
            return Some(view.name.to_string());
        }
        let (lat, lon) = self.surface_coordinates(ray)?;
        Some(format_coordinates(lat, lon))
    }

    /// Branch URL of the marker under `ray`.
    pub fn pointer_click(&self, ray: Ray) -> Option<&str> {
        let marker = self.pick(ray)?;
        self.world
            .marker_location(marker)
            .map(|r| r.branch_url.as_str())
    }

    pub fn marker_view(&self, marker: EntityId) -> Option<MarkerView<'_>> {
        let record = self.world.marker_location(marker)?;
        let drawable = self.world.drawable_3d(marker)?;
        let material = self.world.material(marker)?;
        let transform = self.world.transform(marker)?;
        Some(MarkerView {
            entity: marker,
            name: &record.location_name,
            url: &record.branch_url,
            world_position: self.world.world_position(marker)?,
            radius: drawable.radius(),
            scale: transform.scale,
            color: material.color,
            emissive: material.emissive,
            emitted: material.emitted(),
            hovered: self.hover.contains(marker),
        })
    }

    pub fn marker_views(&self) -> Vec<MarkerView<'_>> {
        self.markers()
            .iter()
            .filter_map(|m| self.marker_view(*m))
            .collect()
    }
}

fn format_coordinates(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.2}°{ns}, {:.2}°{ew}", lat.abs(), lon.abs())
}
