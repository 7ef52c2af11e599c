//! TotoBin hardware agent library.
//!
//! Exposes the domain (session, brew sequencer, scheduler) and the
//! adapters so the binary and the integration tests share one code path.
//! The sysfs GPIO backend is compiled only with the `linux-gpio` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod brew;
pub mod config;
pub mod error;
pub mod pins;
pub mod scheduler;
