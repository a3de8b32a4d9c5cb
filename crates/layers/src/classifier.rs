//! Selection of drawable features and magnitude-driven sizing.

use catalog::Overrides;
use foundation::math::{StereographicProjection, Vec2};
use formats::{CatalogFeature, FeatureGeometry, ObjectType};

/// Screen-space geometry of a feature that survived hemisphere culling.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedGeometry {
    Point(Vec2),
    /// Visible runs of a polyline, each with at least two vertices.
    Lines(Vec<Vec<Vec2>>),
}

impl ProjectedGeometry {
    pub fn point(&self) -> Option<Vec2> {
        match self {
            ProjectedGeometry::Point(p) => Some(*p),
            ProjectedGeometry::Lines(_) => None,
        }
    }

    /// Mean of every visible vertex; the point itself for points.
    pub fn centroid(&self) -> Option<Vec2> {
        match self {
            ProjectedGeometry::Point(p) => Some(*p),
            ProjectedGeometry::Lines(runs) => {
                let mut sum = Vec2::ZERO;
                let mut count = 0usize;
                for p in runs.iter().flatten() {
                    sum = sum + *p;
                    count += 1;
                }
                (count > 0).then(|| sum.scale(1.0 / count as f64))
            }
        }
    }
}

pub fn project_geometry(
    geometry: &FeatureGeometry,
    projection: &StereographicProjection,
) -> Option<ProjectedGeometry> {
    match geometry {
        FeatureGeometry::Point(p) => projection.project(*p).map(ProjectedGeometry::Point),
        _ => {
            let runs: Vec<Vec<Vec2>> = geometry
                .lines()
                .into_iter()
                .flat_map(|line| projection.project_line(line))
                .collect();
            (!runs.is_empty()).then_some(ProjectedGeometry::Lines(runs))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFeature<'a> {
    pub feature: &'a CatalogFeature,
    pub geometry: ProjectedGeometry,
}

/// Features of `ty` that are bright enough (or forced visible by an override)
/// and lie on the visible hemisphere.
pub fn filter<'a>(
    features: impl IntoIterator<Item = &'a CatalogFeature>,
    ty: ObjectType,
    magnitude_threshold: f64,
    overrides: &Overrides,
    projection: &StereographicProjection,
) -> Vec<ClassifiedFeature<'a>> {
    features
        .into_iter()
        .filter(|f| f.object_type == ty)
        .filter(|f| f.magnitude <= magnitude_threshold || overrides.always_show(&f.id))
        .filter_map(|feature| {
            let geometry = project_geometry(&feature.geometry, projection)?;
            Some(ClassifiedFeature { feature, geometry })
        })
        .collect()
}

/// Linear map from an observed value extent onto an output size range.
///
/// Ranges may be descending (`[6, 0.25]` makes bright stars large). When the
/// domain collapses to a point, or is empty, every input maps to the midpoint
/// of the range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MagnitudeScale {
    domain: Option<[f64; 2]>,
    range: [f64; 2],
}

impl MagnitudeScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            domain: Some(domain),
            range,
        }
    }

    /// Domain is the extent of the finite values in `values`.
    pub fn from_values(values: impl IntoIterator<Item = f64>, range: [f64; 2]) -> Self {
        let domain = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<[f64; 2]>, v| match acc {
                None => Some([v, v]),
                Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
            });
        Self { domain, range }
    }

    pub fn domain(&self) -> Option<[f64; 2]> {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn is_degenerate(&self) -> bool {
        match self.domain {
            None => true,
            Some([lo, hi]) => (hi - lo).abs() <= f64::EPSILON,
        }
    }

    pub fn fallback(&self) -> f64 {
        (self.range[0] + self.range[1]) / 2.0
    }

    pub fn apply(&self, value: f64) -> f64 {
        let [r0, r1] = self.range;
        let Some([d0, d1]) = self.domain else {
            return self.fallback();
        };
        if self.is_degenerate() || !value.is_finite() {
            return self.fallback();
        }
        let t = (value - d0) / (d1 - d0);
        (r0 + t * (r1 - r0)).clamp(r0.min(r1), r0.max(r1))
    }
}

/// Per-type scales computed from one filtered set.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TypeScales {
    pub primary: MagnitudeScale,
    /// Minor axis; galaxies only.
    pub minor: Option<MagnitudeScale>,
}

impl TypeScales {
    /// Galaxies size their axes from the larger and smaller catalog size;
    /// every other type sizes from magnitude.
    pub fn for_features(
        ty: ObjectType,
        features: &[ClassifiedFeature<'_>],
        range: [f64; 2],
        minor_range: Option<[f64; 2]>,
    ) -> Self {
        if ty == ObjectType::Galaxy {
            let major = MagnitudeScale::from_values(
                features.iter().filter_map(|c| c.feature.size_major()),
                range,
            );
            let minor = MagnitudeScale::from_values(
                features.iter().filter_map(|c| c.feature.size_minor()),
                minor_range.unwrap_or(range),
            );
            return Self {
                primary: major,
                minor: Some(minor),
            };
        }
        Self {
            primary: MagnitudeScale::from_values(
                features.iter().map(|c| c.feature.magnitude),
                range,
            ),
            minor: None,
        }
    }
}
