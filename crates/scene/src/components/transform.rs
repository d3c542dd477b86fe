use foundation::math::Vec3;

use crate::entity::EntityId;

/// Local transform: uniform scale, then rotation about +Y, then translation,
/// all relative to `parent` when set.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation_y: f64,
    pub scale: f64,
    pub parent: Option<EntityId>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
            parent: None,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Maps a point from this transform's local space into its parent's space.
    pub fn apply(&self, local: Vec3) -> Vec3 {
        local.scale(self.scale).rotate_y(self.rotation_y) + self.position
    }
}
