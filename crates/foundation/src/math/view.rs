use super::vec::Vec2;

/// Allowed zoom range for the view transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomExtent {
    pub min: f64,
    pub max: f64,
}

impl ZoomExtent {
    /// `[base, base * factor]`; a factor below 1 collapses to `[base, base]`.
    pub fn new(base: f64, factor: f64) -> Self {
        Self {
            min: base,
            max: base * factor.max(1.0),
        }
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

/// View-space pan/zoom applied after projection.
///
/// Screen position = `translate + projected * scale`. Changing the view never
/// re-projects anything.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewTransform {
    pub translate: Vec2,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        self.translate + p.scale(self.scale)
    }

    pub fn invert(&self, p: Vec2) -> Vec2 {
        (p - self.translate).scale(1.0 / self.scale)
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate = self.translate + delta;
    }

    /// Multiplies the zoom by `factor` keeping the screen point `focus` fixed.
    /// The resulting scale is clamped to `extent`.
    pub fn zoom_about(&mut self, factor: f64, focus: Vec2, extent: ZoomExtent) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor = self.invert(focus);
        self.scale = extent.clamp(self.scale * factor);
        self.translate = focus - anchor.scale(self.scale);
    }

    /// SVG/CSS transform attribute, e.g. `translate(10,20) scale(2)`.
    pub fn to_css(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}
