#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape3D {
    Sphere { radius: f64, segments: u32 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
}

impl Drawable3D {
    pub fn sphere(radius: f64, segments: u32) -> Self {
        Self {
            shape: Shape3D::Sphere {
                radius,
                segments: segments.max(3),
            },
        }
    }

    pub fn radius(&self) -> f64 {
        match self.shape {
            Shape3D::Sphere { radius, .. } => radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Drawable3D, Shape3D};

    #[test]
    fn create_sphere_drawable() {
        let drawable = Drawable3D::sphere(1.5, 2);
        assert_eq!(
            drawable.shape,
            Shape3D::Sphere {
                radius: 1.5,
                segments: 3
            }
        );
        assert_eq!(drawable.radius(), 1.5);
    }
}
