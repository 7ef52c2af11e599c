//! Outbound application events.
//!
//! The scheduler and sequencer emit these through the
//! [`EventSink`](super::ports::EventSink) port.  The production adapter
//! writes them to the log; tests record them.

use super::model::{BrewStep, OrderId};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The scheduler loop has started.
    Started { hardware_id: String },

    /// A heartbeat was not acknowledged.
    HeartbeatMissed,

    /// A poll returned an order and a brew is about to start.
    OrderReceived { order_id: OrderId, drink_name: String },

    /// The sequencer entered a step (posted before the step's hold).
    StepEntered { order_id: OrderId, step: BrewStep },

    /// A status update was not acknowledged; brewing continues.
    StatusNotAcknowledged { order_id: OrderId, step: BrewStep },

    /// A brew cycle ended and the session was cleared.
    BrewFinished { order_id: OrderId, outcome: BrewOutcome },

    /// The scheduler loop left on a stop request or fault.
    Stopped,
}

/// How a brew cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewOutcome {
    /// All four steps ran.
    Completed,
    /// A step faulted; `message` is what was reported to the server.
    Failed { step: BrewStep, message: String },
}

impl BrewOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
