use super::Vec3;

/// Projects geographic coordinates (degrees) onto a sphere of `radius`
/// centred at the origin, +Y up.
///
/// Longitude is offset by 180° and the polar angle is measured from +Y, so
/// `(0°, 0°)` lands on `(+radius, 0, 0)`. Inputs are not validated:
/// out-of-range angles still produce a point on the sphere, just not the
/// one a map reader would expect.
pub fn project(latitude_deg: f64, longitude_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - latitude_deg).to_radians();
    let theta = (longitude_deg + 180.0).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`project`]: returns `(latitude_deg, longitude_deg)` with the
/// longitude wrapped into `[-180, 180)`.
///
/// Returns `None` for the origin. At the poles the longitude is arbitrary.
pub fn unproject(point: Vec3) -> Option<(f64, f64)> {
    let radius = point.length();
    if radius <= 0.0 || !radius.is_finite() {
        return None;
    }

    let phi = (point.y / radius).clamp(-1.0, 1.0).acos();
    let theta = point.z.atan2(-point.x);

    let lat = 90.0 - phi.to_degrees();
    let lon = wrap_lon_deg(theta.to_degrees() - 180.0);
    Some((lat, lon))
}

pub fn wrap_lon_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
