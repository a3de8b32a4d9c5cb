use crate::generation::Generation;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    CatalogLoaded,
    CatalogFailed,
    /// A delivery arrived for a superseded generation and was dropped.
    CatalogStale,
    OptionsRejected,
    RelaxationCapped,
}

/// Report surfaced to whoever embeds the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub generation: Generation,
    pub kind: EventKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, generation: Generation, kind: EventKind, message: impl Into<String>) {
        self.events.push(Event {
            generation,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
