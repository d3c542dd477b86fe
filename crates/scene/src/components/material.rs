use foundation::color::Rgba;

/// Index into `World::texture_url`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Standard lit material: base color or map, plus an emissive term.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: Rgba,
    pub map: Option<TextureId>,
    pub emissive: Rgba,
    pub emissive_map: Option<TextureId>,
    pub emissive_intensity: f32,
}

impl Material {
    pub fn solid(color: Rgba) -> Self {
        Self {
            color,
            map: None,
            emissive: Rgba::BLACK,
            emissive_map: None,
            emissive_intensity: 1.0,
        }
    }

    pub fn textured(map: TextureId) -> Self {
        Self {
            color: Rgba::WHITE,
            map: Some(map),
            ..Self::solid(Rgba::WHITE)
        }
    }

    pub fn with_emissive(mut self, emissive: Rgba, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn with_emissive_map(mut self, map: TextureId) -> Self {
        self.emissive_map = Some(map);
        self
    }

    /// Emissive contribution actually added to the lit color.
    pub fn emitted(&self) -> Rgba {
        let k = self.emissive_intensity.max(0.0);
        Rgba::new(
            self.emissive.r * k,
            self.emissive.g * k,
            self.emissive.b * k,
            1.0,
        )
    }
}
