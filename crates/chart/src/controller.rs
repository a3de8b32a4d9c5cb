//! The chart's single owner of state: options, loaded catalogs, the current
//! frame and the interaction state layered on top of it.
//!
//! Everything runs on the caller's thread. Catalog loads and label
//! relaxation are queued work the embedder drives with [`ChartController::load_pending`]
//! (or [`ChartController::take_load_requests`] + [`ChartController::deliver`]) and
//! [`ChartController::tick`].

use std::collections::{BTreeMap, BTreeSet};

use catalog::{
    CatalogError, CatalogSet, CatalogSlot, CatalogSource, ObjectCatalog, parse_catalog,
};
use ephemeris::{moon_position_from, sun_position};
use formats::{CatalogFeature, ObjectType};
use foundation::math::{
    CelestialPoint, StereographicProjection, Vec2, ViewTransform, ZoomExtent,
};
use layers::{
    LabelEntry, LabelsLayer, Layer, OverlayLayer, RelaxStatus, RelaxationTask, SymbolLayer,
    TypeScales, filter, place_label,
};
use runtime::{
    Event, EventBus, EventKind, Generation, GenerationCounter, TickBudget, WorkId, WorkQueue,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::frame::ChartFrame;
use crate::observer::compute_zenith;
use crate::options::{ChartOptions, OptionsError};

/// Object types drawn from each catalog slot, in paint order.
fn slot_types(slot: CatalogSlot) -> &'static [ObjectType] {
    match slot {
        CatalogSlot::Constellations => &[ObjectType::Constellation],
        CatalogSlot::Objects => &ObjectType::DEEP_SKY,
        CatalogSlot::Stars => &[ObjectType::Star],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLoad {
    generation: Generation,
    slot: CatalogSlot,
    location: String,
}

/// One catalog fetch handed to the embedder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub id: WorkId,
    /// Redraw generation the load was requested under.
    pub generation: Generation,
    pub slot: CatalogSlot,
    pub location: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// New content; the chart was redrawn.
    Installed,
    /// Same bytes as the catalog already in the slot.
    Unchanged,
    /// A newer request for the slot superseded this one.
    Stale,
    Failed,
}

pub struct ChartController {
    options: ChartOptions,
    generations: GenerationCounter,
    catalogs: CatalogSet,
    queue: WorkQueue<PendingLoad>,
    /// Newest outstanding request per slot.
    requested: BTreeMap<CatalogSlot, WorkId>,
    projection: StereographicProjection,
    frame: ChartFrame,
    relaxation: Option<RelaxationTask>,
    view: ViewTransform,
    hovered: BTreeSet<String>,
    events: EventBus,
}

impl ChartController {
    /// Validates `options`, draws the catalog-free chart and queues every
    /// configured catalog.
    pub fn new(options: ChartOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        let viewport = options.size.viewport();
        let observer = options.observer();
        let rotation = compute_zenith(&observer);
        let mut chart = Self {
            projection: StereographicProjection::for_viewport(viewport, options.scale, rotation),
            frame: ChartFrame::new(Generation::default(), viewport, observer.zenith(), rotation),
            options,
            generations: GenerationCounter::new(),
            catalogs: CatalogSet::new(),
            queue: WorkQueue::new(),
            requested: BTreeMap::new(),
            relaxation: None,
            view: ViewTransform::identity(),
            hovered: BTreeSet::new(),
            events: EventBus::new(),
        };
        chart.redraw();
        for slot in CatalogSlot::ALL {
            chart.request_load(slot);
        }
        Ok(chart)
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    pub fn projection(&self) -> &StereographicProjection {
        &self.projection
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn generation(&self) -> Generation {
        self.generations.current()
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn pending_loads(&self) -> usize {
        self.queue.len()
    }

    /// Deep-merges `patch` into the options and redraws. A rejected patch
    /// leaves the chart exactly as it was.
    pub fn update(&mut self, patch: &Value) -> Result<(), OptionsError> {
        let next = match self.options.merged(patch) {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "options update rejected");
                self.events
                    .emit(self.generations.current(), EventKind::OptionsRejected, e.to_string());
                return Err(e);
            }
        };

        let reload: Vec<CatalogSlot> = CatalogSlot::ALL
            .into_iter()
            .filter(|slot| next.data.location(*slot) != self.options.data.location(*slot))
            .collect();
        let view_changed = next.zoom != self.options.zoom || next.size != self.options.size;
        self.options = next;

        if view_changed {
            self.reset_view();
        }
        for slot in &reload {
            if self.catalogs.remove(*slot).is_some() {
                debug!(%slot, "catalog slot invalidated");
            }
        }
        self.redraw();
        for slot in reload {
            self.request_load(slot);
        }
        Ok(())
    }

    /// Switches the deep-sky list; only the object slot reloads.
    pub fn select_object_catalog(&mut self, catalog: ObjectCatalog) -> Result<(), OptionsError> {
        self.update(&json!({ "data": { "objects": catalog.location() } }))
    }

    fn reset_view(&mut self) {
        if !self.options.zoom.enabled {
            self.view = ViewTransform::identity();
            return;
        }
        let center = self.options.size.viewport().center();
        self.view.zoom_about(1.0, center, self.zoom_extent());
    }

    fn zoom_extent(&self) -> ZoomExtent {
        ZoomExtent::new(1.0, self.options.zoom.max_factor)
    }

    /// Queues the slot's configured location, superseding any earlier request.
    fn request_load(&mut self, slot: CatalogSlot) {
        if let Some(previous) = self.requested.remove(&slot)
            && self.queue.cancel(previous)
        {
            debug!(%slot, "queued catalog load superseded");
        }
        let location = self.options.data.location(slot).to_string();
        if location.is_empty() {
            return;
        }
        let generation = self.generations.current();
        debug!(%slot, %location, %generation, "catalog load queued");
        let id = self.queue.push(
            slot.priority(),
            PendingLoad {
                generation,
                slot,
                location,
            },
        );
        self.requested.insert(slot, id);
    }

    /// Hands every queued load to the caller, in draw order.
    pub fn take_load_requests(&mut self) -> Vec<LoadTicket> {
        std::iter::from_fn(|| self.queue.pop_next())
            .map(|(id, p)| LoadTicket {
                id,
                generation: p.generation,
                slot: p.slot,
                location: p.location,
            })
            .collect()
    }

    /// Accepts the bytes (or failure) for a ticket. Only the newest request
    /// for a slot is honoured; a failure affects that slot alone.
    pub fn deliver(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<u8>, CatalogError>,
    ) -> DeliveryOutcome {
        let current = self.generations.current();
        if self.requested.get(&ticket.slot) != Some(&ticket.id) {
            debug!(
                slot = %ticket.slot,
                location = %ticket.location,
                requested = %ticket.generation,
                "stale catalog delivery dropped"
            );
            self.events.emit(
                current,
                EventKind::CatalogStale,
                format!("{} from {} was superseded", ticket.slot, ticket.location),
            );
            return DeliveryOutcome::Stale;
        }
        self.requested.remove(&ticket.slot);

        let loaded =
            result.and_then(|bytes| parse_catalog(ticket.slot, &ticket.location, &bytes));
        let loaded = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(
                    slot = %ticket.slot,
                    location = %ticket.location,
                    error = %e,
                    "catalog load failed"
                );
                self.events.emit(
                    current,
                    EventKind::CatalogFailed,
                    format!("{}: {e}", ticket.slot),
                );
                return DeliveryOutcome::Failed;
            }
        };

        info!(
            slot = %ticket.slot,
            location = %ticket.location,
            features = loaded.features.len(),
            skipped = loaded.features.skipped,
            "catalog delivered"
        );
        if !self.catalogs.install(loaded) {
            debug!(slot = %ticket.slot, "catalog content unchanged");
            return DeliveryOutcome::Unchanged;
        }
        self.events.emit(
            current,
            EventKind::CatalogLoaded,
            format!("{} from {}", ticket.slot, ticket.location),
        );
        self.redraw();
        DeliveryOutcome::Installed
    }

    /// Fetches queued catalogs from `source`, one budget unit each.
    pub fn load_pending(&mut self, source: &dyn CatalogSource, budget: &mut TickBudget) -> usize {
        let mut delivered = 0;
        while let Some((id, p)) = self.queue.pop_next_with_budget(budget) {
            let result = source.fetch(&p.location);
            let ticket = LoadTicket {
                id,
                generation: p.generation,
                slot: p.slot,
                location: p.location,
            };
            self.deliver(ticket, result);
            delivered += 1;
        }
        delivered
    }

    /// Advances label relaxation by up to `relaxation.passes_per_tick` passes.
    pub fn tick(&mut self) -> RelaxStatus {
        let current = self.generations.current();
        let Some(task) = self.relaxation.as_mut() else {
            return self.frame.relaxation;
        };
        if !self.generations.is_current(task.generation()) {
            task.cancel();
            self.relaxation = None;
            return self.frame.relaxation;
        }

        let mut budget = TickBudget::new(self.options.relaxation.passes_per_tick);
        let status = task.step(&mut budget);
        self.frame.labels = task.labels().to_vec();
        self.frame.relaxation = status;

        match status {
            RelaxStatus::Running { .. } => return status,
            RelaxStatus::Capped { passes } => {
                warn!(generation = %current, passes, "label relaxation stopped at its pass cap");
                self.events.emit(
                    current,
                    EventKind::RelaxationCapped,
                    format!("labels still overlapping after {passes} passes"),
                );
            }
            RelaxStatus::Converged { passes } => {
                debug!(generation = %current, passes, "labels relaxed");
            }
            RelaxStatus::Cancelled => {}
        }
        self.relaxation = None;
        status
    }

    /// Loads everything `source` has and relaxes labels to completion.
    pub fn run_until_idle(&mut self, source: &dyn CatalogSource) {
        self.load_pending(source, &mut TickBudget::unlimited());
        while !self.tick().is_finished() {}
    }

    /// Rebuilds the whole frame for the current options and catalogs.
    pub fn redraw(&mut self) {
        if let Some(task) = self.relaxation.as_mut() {
            task.cancel();
        }
        self.relaxation = None;

        let generation = self.generations.advance();
        let observer = self.options.observer();
        let zenith = observer.zenith();
        let rotation = compute_zenith(&observer);
        let viewport = self.options.size.viewport();
        let projection = StereographicProjection::for_viewport(viewport, self.options.scale, rotation);

        let mut frame = ChartFrame::new(generation, viewport, zenith, rotation);
        frame.overlays = OverlayLayer::new(self.options.overlay_config())
            .extract(&projection, zenith);

        let mut labels = Vec::new();
        for slot in CatalogSlot::ALL {
            let Some(catalog) = self.catalogs.get(slot) else {
                continue;
            };
            for ty in slot_types(slot) {
                draw_type(
                    &self.options,
                    *ty,
                    &catalog.features.features,
                    &projection,
                    &mut frame,
                    &mut labels,
                );
            }
        }

        let sun = sun_position(self.options.datetime);
        let solar = [sun.to_feature(), moon_position_from(&sun).to_feature()];
        for body in &solar {
            draw_type(
                &self.options,
                body.object_type,
                std::slice::from_ref(body),
                &projection,
                &mut frame,
                &mut labels,
            );
        }

        debug!(
            %generation,
            symbols = frame.symbol_count(),
            overlays = frame.overlays.len(),
            labels = labels.len(),
            "chart redrawn"
        );

        if !labels.is_empty() {
            let task =
                RelaxationTask::new(generation, labels.clone(), self.options.relaxation.max_passes);
            frame.relaxation = task.status();
            self.relaxation = Some(task);
        }
        frame.labels = labels;
        self.projection = projection;
        self.frame = frame;
    }

    /// Screen position before the view transform; `None` behind the horizon.
    pub fn project(&self, point: CelestialPoint) -> Option<Vec2> {
        self.projection.project(point)
    }

    /// Pans the view. Ignored unless zooming is enabled.
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        if !self.options.zoom.enabled {
            return false;
        }
        self.view.pan_by(delta);
        true
    }

    /// Zooms about a screen point, clamped to `[1, zoom.max_factor]`.
    pub fn zoom_about(&mut self, factor: f64, focus: Vec2) -> bool {
        if !self.options.zoom.enabled {
            return false;
        }
        let extent = self.zoom_extent();
        self.view.zoom_about(factor, focus, extent);
        true
    }

    /// Flips hover state for `id`; returns whether it is now hovered.
    pub fn toggle_hover(&mut self, id: &str) -> bool {
        if self.hovered.remove(id) {
            return false;
        }
        self.hovered.insert(id.to_string());
        true
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.contains(id)
    }

    /// Labels currently on screen.
    pub fn visible_labels(&self) -> Vec<&LabelEntry> {
        LabelsLayer.visible(&self.frame.labels, &self.hovered)
    }
}

/// Classifies, sizes and labels the features of one type into `frame`.
fn draw_type(
    options: &ChartOptions,
    ty: ObjectType,
    features: &[CatalogFeature],
    projection: &StereographicProjection,
    frame: &mut ChartFrame,
    labels: &mut Vec<LabelEntry>,
) {
    let style = options.style_for(ty);
    if !style.visible {
        return;
    }
    let classified = filter(features, ty, style.magnitude, &options.overrides, projection);
    if classified.is_empty() {
        return;
    }
    let scales = TypeScales::for_features(ty, &classified, style.scale, style.minor_scale);
    let layer = SymbolLayer::new(ty);
    let drawn = layer.extract(&classified, &scales);

    let labelled = ty != ObjectType::Constellation || options.constellations.label;
    let disk_center = projection.translate();
    let mut symbols = Vec::with_capacity(drawn.len());
    for (feature, symbol) in drawn {
        if labelled
            && let Some(label) =
                place_label(feature, &symbol, &options.overrides, disk_center, style.label_hover)
        {
            labels.push(label);
        }
        symbols.push(symbol);
    }
    frame.push_symbols(layer.group(), symbols);
}
