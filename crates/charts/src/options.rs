use foundation::color::Rgba;
use serde::{Deserialize, Serialize};

use crate::animation::{Animation, Easing};

pub const TITLE_CITY_PLACEHOLDER: &str = "{city}";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            easing: Easing::EaseInOutQuart,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    pub display: bool,
    pub position: LegendPosition,
    pub label_color: Rgba,
    pub font_px: f64,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            display: true,
            position: LegendPosition::Top,
            label_color: Rgba::WHITE,
            font_px: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleOptions {
    pub display: bool,
    /// `{city}` is replaced with the selected city.
    pub template: String,
    pub color: Rgba,
    pub font_px: f64,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            display: true,
            template: format!("{TITLE_CITY_PLACEHOLDER} Performance Overview"),
            color: Rgba::WHITE,
            font_px: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialScaleOptions {
    pub begin_at_zero: bool,
    pub grid_color: Rgba,
    pub angle_line_color: Rgba,
    pub point_label_color: Rgba,
    pub point_label_font_px: f64,
    pub tick_color: Rgba,
    pub tick_backdrop: Rgba,
    pub max_ticks: u32,
}

impl Default for RadialScaleOptions {
    fn default() -> Self {
        Self {
            begin_at_zero: true,
            grid_color: Rgba::WHITE.with_alpha(0.1),
            angle_line_color: Rgba::WHITE.with_alpha(0.2),
            point_label_color: Rgba::WHITE,
            point_label_font_px: 12.0,
            // #9ca3af
            tick_color: Rgba::from_rgb8(156, 163, 175, 1.0),
            tick_backdrop: Rgba::TRANSPARENT,
            max_ticks: 5,
        }
    }
}

/// Radar presentation: dark theme, top legend, eased 1 s transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarOptions {
    pub animation: AnimationOptions,
    pub legend: LegendOptions,
    pub title: TitleOptions,
    pub scale: RadialScaleOptions,
}

impl RadarOptions {
    pub fn title_for(&self, city: &str) -> String {
        self.title.template.replace(TITLE_CITY_PLACEHOLDER, city)
    }

    pub fn animation(&self) -> Animation {
        Animation::new(self.animation.duration_ms / 1000.0, self.animation.easing)
    }
}

#[cfg(test)]
mod tests {
    use super::{LegendPosition, RadarOptions};
    use crate::animation::Easing;

    #[test]
    fn title_interpolates_city() {
        let options = RadarOptions::default();
        assert_eq!(options.title_for("Warsaw"), "Warsaw Performance Overview");
    }

    #[test]
    fn dark_theme_defaults() {
        let options = RadarOptions::default();
        assert!(options.scale.begin_at_zero);
        assert_eq!(options.scale.grid_color.to_css(), "rgba(255,255,255,0.1)");
        assert_eq!(options.scale.angle_line_color.to_css(), "rgba(255,255,255,0.2)");
        assert_eq!(options.scale.tick_color.to_css(), "rgba(156,163,175,1)");
        assert_eq!(options.legend.position, LegendPosition::Top);
        assert_eq!(options.animation.duration_ms, 1000.0);
        assert_eq!(options.animation.easing, Easing::EaseInOutQuart);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let payload = r#"{"legend":{"position":"bottom"},"title":{"template":"{city}!"}}"#;
        let options: RadarOptions = serde_json::from_str(payload).expect("parse");
        assert_eq!(options.legend.position, LegendPosition::Bottom);
        assert_eq!(options.title_for("Oslo"), "Oslo!");
        assert!(options.scale.begin_at_zero);
        assert_eq!(options.animation.duration_ms, 1000.0);
    }
}
