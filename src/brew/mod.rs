//! Brew sequencer: runs the fixed script for one order.
//!
//! ```text
//!  idle ─▶ preparing_cup ─▶ adding_toppings ─▶ adding_ice ─▶ brewing_drink ─▶ completed
//!              │                  │                 │               │
//!              └──────────────────┴── step fault ───┴───────────────┴─▶ completed (error)
//! ```
//!
//! Each step posts its status update, then performs its hold.  A post that
//! is not acknowledged is logged and the sequence carries on: stopping
//! halfway through a physical pour is worse than a stale status on the
//! server.  A step that fails to drive a line short-circuits to the error
//! completion.
//!
//! Whatever the outcome, the exit path is the same: final update, every
//! actuator off, session cleared, five-blink completion signal.  A last
//! all-off after the blink leaves the indicator dark even if a blink
//! write failed halfway.

pub mod script;

use log::{debug, error, info, warn};

use crate::app::events::{AppEvent, BrewOutcome};
use crate::app::model::{ActuatorLine, BrewStatus, BrewStep, Order, OrderId, StatusUpdate};
use crate::app::ports::{ClockPort, EventSink, LinePort, RemotePort};
use crate::app::session::HardwareSession;
use crate::error::{Error, HardwareError};

use script::{BLINK_COUNT, BLINK_PHASE, BREW_SCRIPT, COMPLETED_LABEL, StepDescriptor};

/// Summary of one brew cycle, returned to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewReport {
    pub order_id: OrderId,
    pub outcome: BrewOutcome,
    /// Status updates attempted, including the final one.
    pub updates_posted: usize,
    /// Of those, how many the server acknowledged.
    pub updates_acknowledged: usize,
    /// Completion blinks that reached the indicator.
    pub blinks: u32,
    /// Whether both teardown and the post-blink all-off drove every
    /// actuator off.
    pub actuators_safe: bool,
}

/// A line write that aborted the script.
struct StepFault {
    step: BrewStep,
    error: HardwareError,
}

#[derive(Default)]
struct PostTally {
    posted: usize,
    acknowledged: usize,
}

pub struct BrewSequencer {
    hardware_id: String,
}

impl BrewSequencer {
    pub fn new(hardware_id: impl Into<String>) -> Self {
        Self {
            hardware_id: hardware_id.into(),
        }
    }

    /// Run the full brew cycle for `order`, blocking until it is done.
    ///
    /// Fails only with [`Error::Busy`] if the session already holds an
    /// order; in that case nothing is posted and no line is touched.
    pub fn run(
        &self,
        order: &Order,
        session: &mut HardwareSession,
        hw: &mut impl LinePort,
        remote: &mut impl RemotePort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<BrewReport, Error> {
        let active = session.begin(order.id.clone())?;
        let order_id = active.order_id().clone();
        info!("Starting brewing process for order: {}", order_id);

        let mut tally = PostTally::default();
        let outcome = match self.run_script(&order_id, hw, remote, clock, sink, &mut tally) {
            Ok(()) => {
                self.post(
                    &order_id,
                    BrewStatus::Completed,
                    BrewStep::Completed,
                    COMPLETED_LABEL,
                    false,
                    remote,
                    sink,
                    &mut tally,
                );
                info!("Brewing completed for order: {}", order_id);
                BrewOutcome::Completed
            }
            Err(StepFault { step, error }) => {
                error!("Error during brewing ({}): {}", step, error);
                let message = format!("error: {error}");
                self.post(
                    &order_id,
                    BrewStatus::Completed,
                    BrewStep::Completed,
                    &message,
                    true,
                    remote,
                    sink,
                    &mut tally,
                );
                BrewOutcome::Failed { step, message }
            }
        };

        let teardown_safe = settle(hw, &order_id, "Teardown");

        active.release();

        let blinks = blink_completion(hw, clock);
        let actuators_safe = settle(hw, &order_id, "Completion signal") && teardown_safe;

        sink.emit(&AppEvent::BrewFinished {
            order_id: order_id.clone(),
            outcome: outcome.clone(),
        });

        Ok(BrewReport {
            order_id,
            outcome,
            updates_posted: tally.posted,
            updates_acknowledged: tally.acknowledged,
            blinks,
            actuators_safe,
        })
    }

    fn run_script(
        &self,
        order_id: &OrderId,
        hw: &mut impl LinePort,
        remote: &mut impl RemotePort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
        tally: &mut PostTally,
    ) -> Result<(), StepFault> {
        hw.set_line(ActuatorLine::Indicator, true)
            .map_err(|error| StepFault {
                step: BrewStep::PreparingCup,
                error,
            })?;

        for desc in &BREW_SCRIPT {
            sink.emit(&AppEvent::StepEntered {
                order_id: order_id.clone(),
                step: desc.step,
            });
            self.post(
                order_id,
                desc.status,
                desc.step,
                desc.label,
                false,
                remote,
                sink,
                tally,
            );
            execute_step(desc, hw, clock).map_err(|error| StepFault {
                step: desc.step,
                error,
            })?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn post(
        &self,
        order_id: &OrderId,
        status: BrewStatus,
        step: BrewStep,
        message: &str,
        error: bool,
        remote: &mut impl RemotePort,
        sink: &mut impl EventSink,
        tally: &mut PostTally,
    ) {
        let update = StatusUpdate {
            order_id: order_id.clone(),
            status,
            step,
            message: message.to_string(),
            hardware_id: self.hardware_id.clone(),
            error,
        };

        tally.posted += 1;
        if remote.post_status(&update) {
            tally.acknowledged += 1;
            info!("Status updated: {}", message);
        } else {
            warn!("Failed to update status: {}", message);
            sink.emit(&AppEvent::StatusNotAcknowledged {
                order_id: order_id.clone(),
                step,
            });
        }
    }
}

/// Perform one step's actuation and hold.
fn execute_step(
    desc: &StepDescriptor,
    hw: &mut impl LinePort,
    clock: &mut impl ClockPort,
) -> Result<(), HardwareError> {
    match desc.actuator {
        Some(line) => {
            debug!("{}: {} on for {:?}", desc.step, line, desc.hold);
            hw.set_line(line, true)?;
            clock.sleep(desc.hold);
            hw.set_line(line, false)
        }
        None => {
            clock.sleep(desc.hold);
            Ok(())
        }
    }
}

/// Drive every actuator off.  `false` if any line may still be energised.
fn settle(hw: &mut impl LinePort, order_id: &OrderId, phase: &str) -> bool {
    match hw.all_off() {
        Ok(()) => true,
        Err(e) => {
            error!("{} for order {} left an actuator energised: {}", phase, order_id, e);
            false
        }
    }
}

/// Blink the indicator to signal the cup is ready (or the brew gave up).
/// Returns how many blinks were driven without error.
fn blink_completion(hw: &mut impl LinePort, clock: &mut impl ClockPort) -> u32 {
    let mut blinks = 0;
    for _ in 0..BLINK_COUNT {
        let lit = hw.set_line(ActuatorLine::Indicator, true);
        clock.sleep(BLINK_PHASE);
        let dark = hw.set_line(ActuatorLine::Indicator, false);
        clock.sleep(BLINK_PHASE);
        match lit.and(dark) {
            Ok(()) => blinks += 1,
            Err(e) => warn!("Completion blink failed: {}", e),
        }
    }
    blinks
}
