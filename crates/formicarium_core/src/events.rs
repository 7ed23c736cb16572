//! Outbound event reporting.
//!
//! Every tick returns its events to the caller; in addition, a host may
//! register an [`EventSink`] that is invoked as events are recorded. The
//! core never depends on what the sink does with them.

use formicarium_data::SimEvent;

pub trait EventSink: Send {
    fn on_event(&mut self, tick: u64, event: &SimEvent);
}

/// Sink that drops everything; the default.
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _tick: u64, _event: &SimEvent) {}
}

/// Sink that retains events; used by tests and diagnostics.
#[derive(Default)]
pub struct VecSink {
    pub events: Vec<(u64, SimEvent)>,
}

impl EventSink for VecSink {
    fn on_event(&mut self, tick: u64, event: &SimEvent) {
        self.events.push((tick, event.clone()));
    }
}
