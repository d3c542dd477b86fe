#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 8-bit channels plus a `[0, 1]` alpha, as written in CSS `rgba()`.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn as_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_css(self) -> String {
        let r = (self.r.clamp(0.0, 1.0) * 255.0).round() as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0).round() as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0).round() as u32;
        let a = self.a.clamp(0.0, 1.0);
        format!("rgba({r},{g},{b},{a})")
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn css_round_trips_8bit_channels() {
        assert_eq!(Rgba::from_rgb8(59, 130, 246, 0.2).to_css(), "rgba(59,130,246,0.2)");
        assert_eq!(Rgba::WHITE.to_css(), "rgba(255,255,255,1)");
    }

    #[test]
    fn with_alpha_keeps_channels() {
        let c = Rgba::YELLOW.with_alpha(0.5);
        assert_eq!(c.as_array(), [1.0, 1.0, 0.0, 0.5]);
    }
}
