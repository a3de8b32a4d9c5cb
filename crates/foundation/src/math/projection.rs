//! Stereographic sky projection.
//!
//! Conventions:
//! - Input geometry is expressed in chart longitude/latitude, i.e. the
//!   right ascension is mirrored (`lon = -ra_deg`) so that east is on the left.
//! - `Rotation { lambda, phi }` rotates the sphere before projecting; the point
//!   at `(lon, lat) = (-lambda, -phi)` lands on the viewport center.
//! - The clip angle is fixed at 90 degrees: only the hemisphere around the
//!   center is projected, everything else is `None`.

use super::sphere::CelestialPoint;
use super::vec::{Vec2, Vec3};

/// Angular radius of the visible cap, in degrees.
pub const CLIP_ANGLE_DEG: f64 = 90.0;

// Tolerance on cos(c) so points sitting exactly on the horizon stay visible.
const CLIP_EPSILON: f64 = 1e-12;

/// Sphere rotation applied before projecting, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
}

impl Rotation {
    pub fn new(lambda: f64, phi: f64) -> Self {
        Self { lambda, phi }
    }

    /// Rotation that centers the projection on `point`.
    pub fn centered_on(point: CelestialPoint) -> Self {
        Self::new(point.ra_deg(), -point.dec)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StereographicProjection {
    scale: f64,
    translate: Vec2,
    rotation: Rotation,
    cos_phi: f64,
    sin_phi: f64,
}

impl StereographicProjection {
    pub fn new(scale: f64, translate: Vec2, rotation: Rotation) -> Self {
        let phi = rotation.phi.to_radians();
        Self {
            scale,
            translate,
            rotation,
            cos_phi: phi.cos(),
            sin_phi: phi.sin(),
        }
    }

    /// Projection for a viewport: disk radius is `width * chart_scale / 2`,
    /// centered in the viewport.
    pub fn for_viewport(viewport: Viewport, chart_scale: f64, rotation: Rotation) -> Self {
        Self::new(viewport.width * chart_scale / 2.0, viewport.center(), rotation)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Pixel radius of the projected hemisphere.
    pub fn disk_radius(&self) -> f64 {
        self.scale
    }

    /// Unit vector of chart `(lon, lat)` after rotation; `x` points at the center.
    fn rotated(&self, lon_deg: f64, lat_deg: f64) -> Vec3 {
        let lon = (lon_deg + self.rotation.lambda).to_radians();
        let lat = lat_deg.to_radians();

        let cos_lat = lat.cos();
        let x = lon.cos() * cos_lat;
        let y = lon.sin() * cos_lat;
        let z = lat.sin();
        Vec3::new(
            x * self.cos_phi - z * self.sin_phi,
            y,
            z * self.cos_phi + x * self.sin_phi,
        )
    }

    fn project_rotated(&self, v: Vec3) -> Vec2 {
        let k = 1.0 / (1.0 + v.x);
        Vec2::new(
            self.translate.x + self.scale * k * v.y,
            self.translate.y - self.scale * k * v.z,
        )
    }

    /// Projects chart `(lon, lat)` degrees; `None` behind the visible hemisphere.
    pub fn project_lon_lat(&self, lon_deg: f64, lat_deg: f64) -> Option<Vec2> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return None;
        }
        let v = self.rotated(lon_deg, lat_deg);
        is_visible(v).then(|| self.project_rotated(v))
    }

    pub fn project(&self, point: CelestialPoint) -> Option<Vec2> {
        self.project_lon_lat(-point.ra_deg(), point.dec)
    }

    /// Projects a polyline clipped to the visible hemisphere.
    ///
    /// A segment that crosses the horizon is cut where its great circle meets
    /// it, so visible runs start and end on the disk edge. Runs shorter than
    /// two vertices are dropped.
    pub fn project_line(&self, points: &[CelestialPoint]) -> Vec<Vec<Vec2>> {
        let mut runs = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        let mut prev: Option<Vec3> = None;
        for p in points {
            let (lon, lat) = (-p.ra_deg(), p.dec);
            if !lon.is_finite() || !lat.is_finite() {
                flush_run(&mut runs, &mut current);
                prev = None;
                continue;
            }
            let v = self.rotated(lon, lat);
            let visible = is_visible(v);
            if let Some(a) = prev
                && is_visible(a) != visible
            {
                // A vertex already on the horizon is its own crossing.
                let inside = if visible { v } else { a };
                if inside.x.abs() > CLIP_EPSILON
                    && let Some(c) = horizon_crossing(a, v)
                {
                    current.push(self.project_rotated(c));
                }
                if !visible {
                    flush_run(&mut runs, &mut current);
                }
            }
            if visible {
                current.push(self.project_rotated(v));
            }
            prev = Some(v);
        }
        flush_run(&mut runs, &mut current);
        runs
    }
}

fn is_visible(v: Vec3) -> bool {
    v.x >= -CLIP_EPSILON
}

/// Where the great-circle arc from `a` to `b` meets the horizon plane `x = 0`.
/// `None` when the endpoints are antipodal and the arc is undefined.
fn horizon_crossing(a: Vec3, b: Vec3) -> Option<Vec3> {
    let t = a.x / (a.x - b.x);
    let y = a.y + t * (b.y - a.y);
    let z = a.z + t * (b.z - a.z);
    let len = (y * y + z * z).sqrt();
    (len > CLIP_EPSILON).then(|| Vec3::new(0.0, y / len, z / len))
}

fn flush_run(runs: &mut Vec<Vec<Vec2>>, current: &mut Vec<Vec2>) {
    if current.len() >= 2 {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
