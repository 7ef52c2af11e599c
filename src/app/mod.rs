//! Application core: domain types and the port boundary, zero I/O.
//!
//! The brew sequencer and the scheduler loop build on these.  All
//! interaction with GPIO, the network, and time happens through the
//! **port traits** in [`ports`], keeping this layer testable without real
//! peripherals.

pub mod events;
pub mod model;
pub mod ports;
pub mod session;
