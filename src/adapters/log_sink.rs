//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one tagged line per application
//! event through the `log` facade.  The binary routes those records to the
//! console and, when configured, the agent's log file.

use log::{error, info, warn};

use crate::app::events::{AppEvent, BrewOutcome};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { hardware_id } => {
                info!("START | hardware_id={}", hardware_id);
            }
            AppEvent::HeartbeatMissed => {
                warn!("LINK  | heartbeat not acknowledged");
            }
            AppEvent::OrderReceived {
                order_id,
                drink_name,
            } => {
                info!("ORDER | id={} | drink={}", order_id, drink_name);
            }
            AppEvent::StepEntered { order_id, step } => {
                info!("STEP  | id={} | {}", order_id, step);
            }
            AppEvent::StatusNotAcknowledged { order_id, step } => {
                warn!("STEP  | id={} | {} update not acknowledged", order_id, step);
            }
            AppEvent::BrewFinished { order_id, outcome } => match outcome {
                BrewOutcome::Completed => info!("BREW  | id={} | completed", order_id),
                BrewOutcome::Failed { step, message } => {
                    error!("BREW  | id={} | failed at {} | {}", order_id, step, message);
                }
            },
            AppEvent::Stopped => {
                info!("STOP  | scheduler stopped");
            }
        }
    }
}
