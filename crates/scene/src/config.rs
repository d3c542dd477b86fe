use foundation::color::Rgba;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATIONS_URL: &str = "/data/locations.json";
pub const DEFAULT_EARTH_TEXTURE_URL: &str =
    "https://threejs.org/examples/textures/land_ocean_ice_cloud_2048.jpg";
pub const DEFAULT_BORDERS_TEXTURE_URL: &str =
    "https://cdn.jsdelivr.net/gh/planetarycomputer/world-geojson@main/earth-borders-map.png";

/// Globe presentation settings. Every field has a default, so a partial JSON
/// object (or none at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub locations_url: String,
    pub radius: f64,
    pub sphere_segments: u32,
    pub texture_url: String,
    pub borders_texture_url: String,
    pub borders_emissive_intensity: f32,
    /// Height of pins above the surface, in globe units.
    pub marker_offset: f64,
    pub marker_radius: f64,
    pub marker_segments: u32,
    pub marker_color: Rgba,
    pub marker_emissive_intensity: f32,
    pub hover_scale: f64,
    pub hover_emissive: Rgba,
    /// Globe spin around +Y, radians per second of wall-clock time.
    pub rotation_speed_rad_s: f64,
    pub camera_distance: f64,
    pub background: Rgba,
    /// Shown over the globe until the locations fetch settles.
    pub loading_text: String,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            locations_url: DEFAULT_LOCATIONS_URL.to_string(),
            radius: 1.0,
            sphere_segments: 64,
            texture_url: DEFAULT_EARTH_TEXTURE_URL.to_string(),
            borders_texture_url: DEFAULT_BORDERS_TEXTURE_URL.to_string(),
            borders_emissive_intensity: 0.15,
            marker_offset: 0.02,
            marker_radius: 0.02,
            marker_segments: 16,
            marker_color: Rgba::RED,
            marker_emissive_intensity: 0.5,
            hover_scale: 1.6,
            hover_emissive: Rgba::YELLOW,
            // 0.001 rad per frame at 60 Hz.
            rotation_speed_rad_s: 0.06,
            camera_distance: 2.0,
            background: Rgba::BLACK,
            loading_text: "Loading globe data...".to_string(),
        }
    }
}

impl GlobeConfig {
    /// Radius at which pins are placed.
    pub fn marker_altitude(&self) -> f64 {
        self.radius + self.marker_offset
    }
}
