use std::collections::BTreeMap;

use foundation::math::{CelestialPoint, Rotation, Viewport};
use layers::{LabelEntry, LayerGroup, Overlay, RelaxStatus, RenderedSymbol};
use runtime::Generation;

/// Everything one redraw produced, in screen space before the view transform.
///
/// A frame is rebuilt from scratch on every redraw; only label positions
/// change afterwards, while relaxation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub generation: Generation,
    pub viewport: Viewport,
    pub zenith: CelestialPoint,
    pub rotation: Rotation,
    pub overlays: Vec<Overlay>,
    pub symbols: BTreeMap<LayerGroup, Vec<RenderedSymbol>>,
    pub labels: Vec<LabelEntry>,
    pub relaxation: RelaxStatus,
}

impl ChartFrame {
    pub fn new(
        generation: Generation,
        viewport: Viewport,
        zenith: CelestialPoint,
        rotation: Rotation,
    ) -> Self {
        Self {
            generation,
            viewport,
            zenith,
            rotation,
            overlays: Vec::new(),
            symbols: BTreeMap::new(),
            labels: Vec::new(),
            relaxation: RelaxStatus::Converged { passes: 0 },
        }
    }

    pub fn push_symbols(&mut self, group: LayerGroup, symbols: Vec<RenderedSymbol>) {
        if symbols.is_empty() {
            return;
        }
        self.symbols.entry(group).or_default().extend(symbols);
    }

    pub fn symbols_in(&self, group: LayerGroup) -> &[RenderedSymbol] {
        self.symbols.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn symbol(&self, id: &str) -> Option<&RenderedSymbol> {
        self.symbols.values().flatten().find(|s| s.id == id)
    }

    pub fn label(&self, anchor_id: &str) -> Option<&LabelEntry> {
        self.labels.iter().find(|l| l.anchor_id == anchor_id)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.values().map(Vec::len).sum()
    }
}
