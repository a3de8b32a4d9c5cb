//! Decorative paths derived from the projection alone.

use foundation::math::{
    CelestialPoint, OBLIQUITY_J2000_DEG, StereographicProjection, Vec2, ecliptic_to_equatorial,
};

use crate::layer::{Layer, LayerGroup};

pub const GRATICULE_RA_STEP_HOURS: usize = 1;
pub const GRATICULE_DEC_STEP_DEG: i32 = 10;
/// Sampling interval along every overlay curve.
pub const CURVE_SAMPLE_DEG: usize = 2;
pub const ZENITH_MARKER_PX: f64 = 6.0;
pub const COMPASS_INSET_PX: f64 = 12.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    pub globe: bool,
    pub graticule: bool,
    pub ecliptic: bool,
    pub zenith: bool,
    pub compass: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            globe: true,
            graticule: true,
            ecliptic: true,
            zenith: true,
            compass: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GraticuleAxis {
    Ra,
    Dec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Globe { center: Vec2, r: f64 },
    Graticule { axis: GraticuleAxis, runs: Vec<Vec<Vec2>> },
    Ecliptic { runs: Vec<Vec<Vec2>> },
    Zenith { center: Vec2, arm: f64 },
    Compass { text: &'static str, at: Vec2 },
}

impl Overlay {
    pub fn class_name(&self) -> &'static str {
        match self {
            Overlay::Globe { .. } => "globe",
            Overlay::Graticule {
                axis: GraticuleAxis::Ra,
                ..
            } => "graticule ra",
            Overlay::Graticule {
                axis: GraticuleAxis::Dec,
                ..
            } => "graticule dec",
            Overlay::Ecliptic { .. } => "ecliptic",
            Overlay::Zenith { .. } => "zenith",
            Overlay::Compass { .. } => "compass",
        }
    }
}

fn sample_meridian(ra_hours: f64) -> Vec<CelestialPoint> {
    (-90..=90)
        .step_by(CURVE_SAMPLE_DEG)
        .map(|dec| CelestialPoint::new(ra_hours, dec as f64))
        .collect()
}

fn sample_parallel(dec: f64) -> Vec<CelestialPoint> {
    (0..=360)
        .step_by(CURVE_SAMPLE_DEG)
        .map(|deg| CelestialPoint::new(deg as f64 / 15.0, dec))
        .collect()
}

/// The ecliptic great circle in equatorial coordinates.
fn sample_ecliptic() -> Vec<CelestialPoint> {
    (0..=360)
        .step_by(CURVE_SAMPLE_DEG)
        .map(|lon| ecliptic_to_equatorial(lon as f64, 0.0, OBLIQUITY_J2000_DEG))
        .collect()
}

pub fn graticule(projection: &StereographicProjection) -> Vec<Overlay> {
    let mut out = Vec::new();
    for h in (0..24).step_by(GRATICULE_RA_STEP_HOURS) {
        let runs = projection.project_line(&sample_meridian(h as f64));
        if !runs.is_empty() {
            out.push(Overlay::Graticule {
                axis: GraticuleAxis::Ra,
                runs,
            });
        }
    }
    let mut dec = -90 + GRATICULE_DEC_STEP_DEG;
    while dec < 90 {
        let runs = projection.project_line(&sample_parallel(dec as f64));
        if !runs.is_empty() {
            out.push(Overlay::Graticule {
                axis: GraticuleAxis::Dec,
                runs,
            });
        }
        dec += GRATICULE_DEC_STEP_DEG;
    }
    out
}

pub fn ecliptic(projection: &StereographicProjection) -> Option<Overlay> {
    let runs = projection.project_line(&sample_ecliptic());
    (!runs.is_empty()).then_some(Overlay::Ecliptic { runs })
}

/// N/E/S/W just inside the disk edge; east is on the left.
pub fn compass(projection: &StereographicProjection) -> Vec<Overlay> {
    let c = projection.translate();
    let d = projection.disk_radius() - COMPASS_INSET_PX;
    [
        ("N", Vec2::new(c.x, c.y - d)),
        ("E", Vec2::new(c.x - d, c.y)),
        ("S", Vec2::new(c.x, c.y + d)),
        ("W", Vec2::new(c.x + d, c.y)),
    ]
    .into_iter()
    .map(|(text, at)| Overlay::Compass { text, at })
    .collect()
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayLayer {
    pub config: OverlayConfig,
}

impl OverlayLayer {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    pub fn extract(
        &self,
        projection: &StereographicProjection,
        zenith: CelestialPoint,
    ) -> Vec<Overlay> {
        let mut out = Vec::new();
        if self.config.globe {
            out.push(Overlay::Globe {
                center: projection.translate(),
                r: projection.disk_radius(),
            });
        }
        if self.config.graticule {
            out.extend(graticule(projection));
        }
        if self.config.ecliptic
            && let Some(e) = ecliptic(projection)
        {
            out.push(e);
        }
        if self.config.zenith
            && let Some(center) = projection.project(zenith)
        {
            out.push(Overlay::Zenith {
                center,
                arm: ZENITH_MARKER_PX,
            });
        }
        if self.config.compass {
            out.extend(compass(projection));
        }
        out
    }
}

impl Layer for OverlayLayer {
    fn group(&self) -> LayerGroup {
        LayerGroup::Lines
    }
}
