use foundation::math::Vec2;
use formats::{CatalogFeature, ObjectType};
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifiedFeature, ProjectedGeometry, TypeScales};
use crate::layer::{Layer, LayerGroup};

pub const SUN_RADIUS_PX: f64 = 20.0;
pub const MOON_RADIUS_PX: f64 = 8.0;

/// Per-type drawing configuration.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeStyle {
    pub visible: bool,
    /// Faintest magnitude drawn.
    pub magnitude: f64,
    /// Output size range, `[for brightest/largest, for faintest/smallest]`.
    pub scale: [f64; 2],
    /// Separate range for the minor axis (galaxies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_scale: Option<[f64; 2]>,
    /// Labels appear only while the feature is hovered.
    pub label_hover: bool,
}

impl Default for TypeStyle {
    fn default() -> Self {
        Self::defaults_for(ObjectType::Star)
    }
}

impl TypeStyle {
    pub const fn new(magnitude: f64, scale: [f64; 2], label_hover: bool) -> Self {
        Self {
            visible: true,
            magnitude,
            scale,
            minor_scale: None,
            label_hover,
        }
    }

    pub fn defaults_for(ty: ObjectType) -> Self {
        match ty {
            ObjectType::Star => Self::new(5.0, [6.0, 0.25], false),
            ObjectType::Galaxy => Self::new(8.0, [3.0, 10.0], true),
            ObjectType::OpenCluster => Self::new(6.0, [6.0, 3.0], true),
            ObjectType::GlobularCluster => Self::new(8.0, [8.0, 4.0], true),
            ObjectType::PlanetaryNebula | ObjectType::BrightNebula => {
                Self::new(10.0, [12.0, 6.0], true)
            }
            ObjectType::Constellation | ObjectType::Sun | ObjectType::Moon => {
                Self::new(f64::MAX, [1.0, 1.0], false)
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Disk,
    Ellipse,
    Circle { dashed: bool },
    /// Outline circle with horizontal and vertical arms through the center.
    CrossedCircle { radius_factor: f64, arm_factor: f64 },
    /// Square whose top-left corner sits on the projected point.
    Square,
    Polyline,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Sizing {
    Magnitude,
    /// Major/minor axes from the catalog size.
    Axes,
    Fixed(f64),
    Unsized,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub object_type: ObjectType,
    pub shape: Shape,
    pub sizing: Sizing,
}

pub fn descriptor(ty: ObjectType) -> TypeDescriptor {
    let (shape, sizing) = match ty {
        ObjectType::Star => (Shape::Disk, Sizing::Magnitude),
        ObjectType::Galaxy => (Shape::Ellipse, Sizing::Axes),
        ObjectType::OpenCluster => (Shape::Circle { dashed: true }, Sizing::Magnitude),
        ObjectType::GlobularCluster => (
            Shape::CrossedCircle {
                radius_factor: 1.0,
                arm_factor: 1.0,
            },
            Sizing::Magnitude,
        ),
        ObjectType::PlanetaryNebula => (
            Shape::CrossedCircle {
                radius_factor: 0.5,
                arm_factor: 1.0,
            },
            Sizing::Magnitude,
        ),
        ObjectType::BrightNebula => (Shape::Square, Sizing::Magnitude),
        ObjectType::Sun => (Shape::Disk, Sizing::Fixed(SUN_RADIUS_PX)),
        ObjectType::Moon => (Shape::Disk, Sizing::Fixed(MOON_RADIUS_PX)),
        ObjectType::Constellation => (Shape::Polyline, Sizing::Unsized),
    };
    TypeDescriptor {
        object_type: ty,
        shape,
        sizing,
    }
}

/// Screen-space vector symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Disk {
        center: Vec2,
        r: f64,
    },
    Ellipse {
        center: Vec2,
        rx: f64,
        ry: f64,
        /// Rotation in degrees about `center`.
        angle: f64,
    },
    Circle {
        center: Vec2,
        r: f64,
        dashed: bool,
    },
    CrossedCircle {
        center: Vec2,
        r: f64,
        arm: f64,
    },
    Square {
        corner: Vec2,
        side: f64,
    },
    Polyline {
        runs: Vec<Vec<Vec2>>,
    },
}

impl Symbol {
    /// Distance from the anchor to the symbol's outer edge, for label offsets.
    pub fn extent(&self) -> f64 {
        match self {
            Symbol::Disk { r, .. } | Symbol::Circle { r, .. } => *r,
            Symbol::Ellipse { rx, ry, .. } => rx.max(*ry),
            Symbol::CrossedCircle { r, arm, .. } => r.max(*arm),
            Symbol::Square { side, .. } => *side,
            Symbol::Polyline { .. } => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSymbol {
    pub id: String,
    pub object_type: ObjectType,
    pub symbol: Symbol,
}

pub fn render_symbol(
    desc: &TypeDescriptor,
    classified: &ClassifiedFeature<'_>,
    scales: &TypeScales,
) -> Option<RenderedSymbol> {
    let feature = classified.feature;
    let size = match desc.sizing {
        Sizing::Magnitude => scales.primary.apply(feature.magnitude),
        Sizing::Axes => scales
            .primary
            .apply(feature.size_major().unwrap_or(f64::NAN)),
        Sizing::Fixed(r) => r,
        Sizing::Unsized => 0.0,
    };

    let symbol = match (desc.shape, &classified.geometry) {
        (Shape::Polyline, ProjectedGeometry::Lines(runs)) => Symbol::Polyline {
            runs: runs.clone(),
        },
        (Shape::Polyline, ProjectedGeometry::Point(_)) => return None,
        (shape, geometry) => {
            let center = geometry.point()?;
            match shape {
                Shape::Disk => Symbol::Disk { center, r: size },
                Shape::Ellipse => {
                    let minor = scales.minor.unwrap_or(scales.primary);
                    Symbol::Ellipse {
                        center,
                        rx: size,
                        ry: minor.apply(feature.size_minor().unwrap_or(f64::NAN)),
                        angle: feature.angle.unwrap_or(0.0),
                    }
                }
                Shape::Circle { dashed } => Symbol::Circle {
                    center,
                    r: size,
                    dashed,
                },
                Shape::CrossedCircle {
                    radius_factor,
                    arm_factor,
                } => Symbol::CrossedCircle {
                    center,
                    r: size * radius_factor,
                    arm: size * arm_factor,
                },
                Shape::Square => Symbol::Square {
                    corner: center,
                    side: size,
                },
                Shape::Polyline => return None,
            }
        }
    };

    Some(RenderedSymbol {
        id: feature.id.clone(),
        object_type: desc.object_type,
        symbol,
    })
}

/// Symbols for one object type.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SymbolLayer {
    descriptor: TypeDescriptor,
}

impl SymbolLayer {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            descriptor: descriptor(object_type),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.descriptor.object_type
    }

    /// One symbol per drawable feature, paired with the feature it came from.
    pub fn extract<'a>(
        &self,
        classified: &[ClassifiedFeature<'a>],
        scales: &TypeScales,
    ) -> Vec<(&'a CatalogFeature, RenderedSymbol)> {
        classified
            .iter()
            .filter_map(|c| Some((c.feature, render_symbol(&self.descriptor, c, scales)?)))
            .collect()
    }
}

impl Layer for SymbolLayer {
    fn group(&self) -> LayerGroup {
        LayerGroup::for_type(self.descriptor.object_type)
    }
}
