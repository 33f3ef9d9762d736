//! Completion gate: decides when a run may be finalized
//!
//! The report may only be written once discovery has finished AND every
//! accepted audit has been folded. The gate is a three-state machine driven
//! by two events; it never moves backwards and ignores events that do not
//! apply to its current state.

/// Where the run is in its lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GateState {
    /// The discoverer may still produce URLs
    #[default]
    Discovering,

    /// No more URLs will arrive; waiting for in-flight audits
    Draining,

    /// Everything has been folded; the run can be finalized
    Done,
}

/// Inputs to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateEvent {
    /// The discoverer has finished and its page channel is closed
    DiscoveryFinished,

    /// The dispatch queue has no pending or running audits
    QueueIdle,
}

impl GateState {
    /// Applies one event, returning the next state
    pub fn on(self, event: GateEvent) -> Self {
        match (self, event) {
            (Self::Discovering, GateEvent::DiscoveryFinished) => Self::Draining,
            (Self::Draining, GateEvent::QueueIdle) => Self::Done,
            (state, _) => state,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while new URLs may still be accepted
    pub fn accepts_urls(&self) -> bool {
        matches!(self, Self::Discovering)
    }
}
