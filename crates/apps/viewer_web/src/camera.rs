use foundation::math::{Vec2, Vec3};
use scene::picking::Ray;

/// Fixed perspective camera looking at the globe center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
    /// Viewport size in CSS pixels.
    pub width: f64,
    pub height: f64,
}

const UP: Vec3 = Vec3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

impl Camera {
    pub fn looking_at_origin(distance: f64, width: f64, height: f64) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            fov_y_rad: 75f64.to_radians(),
            near: 0.1,
            far: 1000.0,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn aspect(&self) -> f64 {
        if self.height <= 0.0 {
            1.0
        } else {
            (self.width / self.height).max(1e-6)
        }
    }

    /// Right, up and forward unit vectors.
    fn basis(&self) -> Option<(Vec3, Vec3, Vec3)> {
        let f = (self.target - self.eye).normalize()?;
        let s = f.cross(UP).normalize()?;
        let u = s.cross(f);
        Some((s, u, f))
    }

    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        let view = mat4_look_at_rh(self.eye, self.target, UP);
        let proj = mat4_perspective_rh_z0(self.fov_y_rad, self.aspect(), self.near, self.far);
        mat4_mul(proj, view)
    }

    /// World-space ray through pixel `(x, y)` (origin top-left).
    pub fn screen_ray(&self, x: f64, y: f64) -> Option<Ray> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let (s, u, f) = self.basis()?;
        let tan_half = (0.5 * self.fov_y_rad).tan();
        let ndc_x = 2.0 * x / self.width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.height;
        let dir = s.scale(ndc_x * tan_half * self.aspect()) + u.scale(ndc_y * tan_half) + f;
        Some(Ray::new(self.eye, dir.normalize()?))
    }

    /// Pixel position of `point`, or `None` when it is behind the near plane.
    pub fn project_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let (s, u, f) = self.basis()?;
        let rel = point - self.eye;
        let depth = rel.dot(f);
        if depth <= self.near {
            return None;
        }
        let tan_half = (0.5 * self.fov_y_rad).tan();
        let ndc_x = rel.dot(s) / (depth * tan_half * self.aspect());
        let ndc_y = rel.dot(u) / (depth * tan_half);
        Some(Vec2::new(
            (ndc_x + 1.0) * 0.5 * self.width,
            (1.0 - ndc_y) * 0.5 * self.height,
        ))
    }

    /// Whether a sphere of `radius` at the origin hides `point` from the eye.
    pub fn is_occluded(&self, point: Vec3, radius: f64) -> bool {
        let to_point = point - self.eye;
        let dist = to_point.length();
        let Some(dir) = to_point.normalize() else {
            return false;
        };
        let oc = self.eye;
        let b = oc.dot(dir);
        let c = oc.dot(oc) - radius * radius;
        let disc = b * b - c;
        if c <= 0.0 || disc < 0.0 {
            return false;
        }
        let t_enter = -b - disc.sqrt();
        t_enter > 0.0 && t_enter < dist - 1e-9
    }
}

fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    // Column-major: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [[f32; 4]; 4] {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    // RH, depth range [0, 1].
    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> [[f32; 4]; 4] {
    let f = (target - eye).normalize().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(up).normalize().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}
