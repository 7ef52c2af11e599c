//! Default GPIO line assignments for the Odroid dispenser board.
//!
//! Single source of truth for the factory wiring.  Deployments override
//! these through [`LineMapping`](crate::config::LineMapping); nothing else
//! hard-codes a line number.

/// Status LED, lit for the whole brew and blinked on completion.
pub const INDICATOR_LINE: u32 = 18;

/// Drink pump relay (active HIGH).
pub const PUMP_LINE: u32 = 24;

/// Topping valve relay (active HIGH).
pub const VALVE_LINE: u32 = 25;

/// Cup/level sensor input, wired with an external pull-up.
pub const SENSOR_LINE: u32 = 23;
