//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Scheduler / BrewSequencer (domain)
//! ```
//!
//! Driven adapters (GPIO lines, the order API, the clock, event sinks)
//! implement these traits.  The domain consumes them via generics injected
//! at call sites, so the control loop never touches hardware or sockets
//! directly and runs unchanged against the mocks in `tests/`.

use core::time::Duration;

use crate::error::HardwareError;

use super::events::AppEvent;
use super::model::{ActuatorLine, Order, StatusUpdate};

// ───────────────────────────────────────────────────────────────
// Line port (driven adapter: domain ↔ GPIO)
// ───────────────────────────────────────────────────────────────

/// Discrete I/O for the dispenser: three actuator outputs and one sensor.
///
/// Initialisation and release belong to the concrete adapter (constructor
/// and `Drop`); the domain only drives lines that are already configured.
pub trait LinePort {
    /// Drive an actuator output.  `true` = energised.
    fn set_line(&mut self, line: ActuatorLine, active: bool) -> Result<(), HardwareError>;

    /// Raw level of the sensor input.
    fn read_sensor(&mut self) -> Result<bool, HardwareError>;

    /// Drive every actuator low.  Attempts all lines even if one fails and
    /// returns the first failure.
    fn all_off(&mut self) -> Result<(), HardwareError>;
}

// ───────────────────────────────────────────────────────────────
// Remote port (driven adapter: domain ↔ order API)
// ───────────────────────────────────────────────────────────────

/// The three request shapes of the order API.
///
/// Every call is a single best-effort attempt.  Implementations log and
/// swallow their own failures: the domain only ever sees "no order" or
/// "not acknowledged", and must tolerate missed calls.
pub trait RemotePort {
    /// Next pending order for this device, or `None` if there is none or
    /// the call failed.
    fn fetch_order(&mut self, hardware_id: &str) -> Option<Order>;

    /// Report brew progress.  Returns whether the server acknowledged it.
    fn post_status(&mut self, update: &StatusUpdate) -> bool;

    /// Liveness ping.  Returns whether the server acknowledged it.
    fn heartbeat(&mut self, hardware_id: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus blocking waits.
pub trait ClockPort {
    /// Time since the clock was created.  Never goes backwards.
    fn uptime(&self) -> Duration;

    /// Block the calling thread for `duration`.
    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
