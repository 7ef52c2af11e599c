//! The fixed brew script.
//!
//! One row per physical step, in execution order.  The sequencer posts the
//! row's status, then runs its actuation: either a plain hold, or
//! line ON → hold → line OFF.  The closing `completed` update has no row.

use core::time::Duration;

use crate::app::model::{ActuatorLine, BrewStatus, BrewStep};

/// Static descriptor for a single brew step.
#[derive(Debug, Clone, Copy)]
pub struct StepDescriptor {
    pub step: BrewStep,
    pub status: BrewStatus,
    /// Human-readable text posted with the update.
    pub label: &'static str,
    /// Line energised for the duration of the hold, if any.
    pub actuator: Option<ActuatorLine>,
    pub hold: Duration,
}

pub const BREW_SCRIPT: [StepDescriptor; 4] = [
    StepDescriptor {
        step: BrewStep::PreparingCup,
        status: BrewStatus::Preparing,
        label: "preparing cup",
        actuator: None,
        hold: Duration::from_millis(3_000),
    },
    StepDescriptor {
        step: BrewStep::AddingToppings,
        status: BrewStatus::Brewing,
        label: "adding toppings",
        actuator: Some(ActuatorLine::Valve),
        hold: Duration::from_millis(4_000),
    },
    StepDescriptor {
        step: BrewStep::AddingIce,
        status: BrewStatus::Brewing,
        label: "adding ice",
        actuator: None,
        hold: Duration::from_millis(3_500),
    },
    StepDescriptor {
        step: BrewStep::BrewingDrink,
        status: BrewStatus::Brewing,
        label: "brewing drink",
        actuator: Some(ActuatorLine::Pump),
        hold: Duration::from_millis(5_000),
    },
];

/// Message of the final update on a clean run.
pub const COMPLETED_LABEL: &str = "completed";

/// Completion signal: this many on/off blinks of the indicator...
pub const BLINK_COUNT: u32 = 5;
/// ...each phase (on, then off) lasting this long.
pub const BLINK_PHASE: Duration = Duration::from_millis(200);
