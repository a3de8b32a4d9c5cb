use std::collections::BTreeSet;

use catalog::Overrides;
use foundation::math::Vec2;
use formats::{CatalogFeature, ObjectType};
use runtime::{Generation, TickBudget};

use crate::layer::{Layer, LayerGroup};
use crate::symbology::{RenderedSymbol, Symbol};

/// Labels on the same side closer than this (vertically) are pushed apart.
pub const LABEL_SPACING_PX: f64 = 12.0;
/// Distance each label of a colliding pair moves per pass.
pub const LABEL_STEP_PX: f64 = 0.5;
/// Horizontal gap between a symbol's edge and its label.
pub const LABEL_GAP_PX: f64 = 4.0;
pub const CONSTELLATION_LABEL_DROP_PX: f64 = 12.0;
pub const DEFAULT_MAX_RELAX_PASSES: u32 = 500;

/// Text alignment of a label relative to its anchor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LabelSide {
    /// Text ends at the anchor.
    Left,
    /// Text starts at the anchor.
    Right,
    Center,
}

impl LabelSide {
    pub fn text_anchor(self) -> &'static str {
        match self {
            LabelSide::Left => "end",
            LabelSide::Right => "start",
            LabelSide::Center => "middle",
        }
    }

    /// Labels point away from the disk center so they stay on the chart.
    fn facing_inward(anchor: Vec2, disk_center: Vec2) -> Self {
        if anchor.x < disk_center.x {
            LabelSide::Right
        } else {
            LabelSide::Left
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    pub anchor_id: String,
    pub object_type: ObjectType,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub side: LabelSide,
    /// Shown only while the anchor is hovered.
    pub hover_only: bool,
}

/// Override name, then catalog name. `None` suppresses the label.
pub fn label_text<'a>(feature: &'a CatalogFeature, overrides: &'a Overrides) -> Option<&'a str> {
    overrides
        .name_for(&feature.id)
        .or(feature.name.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn symbol_anchor(symbol: &Symbol) -> Option<Vec2> {
    match symbol {
        Symbol::Disk { center, .. }
        | Symbol::Ellipse { center, .. }
        | Symbol::Circle { center, .. }
        | Symbol::CrossedCircle { center, .. } => Some(*center),
        Symbol::Square { corner, side } => Some(*corner + Vec2::new(side / 2.0, side / 2.0)),
        Symbol::Polyline { runs } => {
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

/// Positions the label for `feature` next to its rendered symbol.
///
/// Stars get their label above the disk by twice the radius, constellations
/// under the centroid of their visible vertices, everything else beside the
/// symbol.
pub fn place_label(
    feature: &CatalogFeature,
    rendered: &RenderedSymbol,
    overrides: &Overrides,
    disk_center: Vec2,
    hover_only: bool,
) -> Option<LabelEntry> {
    let text = label_text(feature, overrides)?;
    let at = symbol_anchor(&rendered.symbol)?;
    if !at.is_finite() {
        return None;
    }
    let extent = rendered.symbol.extent();

    let (x, y, side) = match rendered.object_type {
        ObjectType::Star => (
            at.x,
            at.y - 2.0 * extent,
            LabelSide::facing_inward(at, disk_center),
        ),
        ObjectType::Constellation => (at.x, at.y + CONSTELLATION_LABEL_DROP_PX, LabelSide::Center),
        _ => {
            let side = LabelSide::facing_inward(at, disk_center);
            let offset = extent + LABEL_GAP_PX;
            let x = match side {
                LabelSide::Right => at.x + offset,
                _ => at.x - offset,
            };
            (x, at.y, side)
        }
    };

    Some(LabelEntry {
        anchor_id: rendered.id.clone(),
        object_type: rendered.object_type,
        x,
        y,
        text: text.to_string(),
        side,
        hover_only,
    })
}

/// One pairwise pass. Returns whether any label moved.
pub fn relax_pass(labels: &mut [LabelEntry]) -> bool {
    let mut moved = false;
    for i in 0..labels.len() {
        for j in (i + 1)..labels.len() {
            if labels[i].side != labels[j].side {
                continue;
            }
            let dy = labels[i].y - labels[j].y;
            if dy.abs() >= LABEL_SPACING_PX {
                continue;
            }
            let sign = if dy > 0.0 { 1.0 } else { -1.0 };
            labels[i].y += sign * LABEL_STEP_PX;
            labels[j].y -= sign * LABEL_STEP_PX;
            moved = true;
        }
    }
    moved
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RelaxStatus {
    Running { passes: u32 },
    /// A full pass moved nothing.
    Converged { passes: u32 },
    /// Hit the pass cap while labels were still moving.
    Capped { passes: u32 },
    Cancelled,
}

impl RelaxStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, RelaxStatus::Running { .. })
    }
}

/// Relaxes synchronously, at most `max_passes` passes.
pub fn relax(labels: &mut [LabelEntry], max_passes: u32) -> RelaxStatus {
    let mut passes = 0;
    while passes < max_passes {
        passes += 1;
        if !relax_pass(labels) {
            return RelaxStatus::Converged { passes };
        }
    }
    RelaxStatus::Capped { passes }
}

/// Repeat-until-stable relaxation, time-sliced across ticks.
///
/// Each pass costs one budget unit. The task belongs to one redraw
/// generation; a newer redraw cancels it.
#[derive(Debug, Clone)]
pub struct RelaxationTask {
    generation: Generation,
    labels: Vec<LabelEntry>,
    max_passes: u32,
    status: RelaxStatus,
}

impl RelaxationTask {
    pub fn new(generation: Generation, labels: Vec<LabelEntry>, max_passes: u32) -> Self {
        Self {
            generation,
            labels,
            max_passes,
            status: RelaxStatus::Running { passes: 0 },
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn status(&self) -> RelaxStatus {
        self.status
    }

    pub fn labels(&self) -> &[LabelEntry] {
        &self.labels
    }

    pub fn cancel(&mut self) {
        if !self.status.is_finished() {
            self.status = RelaxStatus::Cancelled;
        }
    }

    pub fn step(&mut self, budget: &mut TickBudget) -> RelaxStatus {
        let RelaxStatus::Running { mut passes } = self.status else {
            return self.status;
        };
        while !budget.is_exhausted() {
            if passes >= self.max_passes {
                self.status = RelaxStatus::Capped { passes };
                return self.status;
            }
            if !budget.try_consume(1) {
                break;
            }
            passes += 1;
            if !relax_pass(&mut self.labels) {
                self.status = RelaxStatus::Converged { passes };
                return self.status;
            }
        }
        if passes >= self.max_passes {
            self.status = RelaxStatus::Capped { passes };
        } else {
            self.status = RelaxStatus::Running { passes };
        }
        self.status
    }
}

/// Decides which labels are on screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelsLayer;

impl LabelsLayer {

    /// Always-on labels plus hover-only labels whose anchor is hovered.
    pub fn visible<'a>(
        &self,
        labels: &'a [LabelEntry],
        hovered: &BTreeSet<String>,
    ) -> Vec<&'a LabelEntry> {
        labels
            .iter()
            .filter(|l| !l.hover_only || hovered.contains(&l.anchor_id))
            .collect()
    }
}

impl Layer for LabelsLayer {
    fn group(&self) -> LayerGroup {
        LayerGroup::Labels
    }
}
