//! Error types for the TotoBin hardware agent.
//!
//! [`Error`] covers the two ways the domain itself can fail: a second
//! order while one is active, and a brew that could not make the machine
//! safe.  Adapter failures have their own enums.  Network failures never
//! reach the domain: the remote client classifies them with
//! [`RemoteError`], logs them, and reports "no data" to its caller.
//! Hardware and config failures at startup surface in the binary through
//! `anyhow`.

use core::fmt;

use crate::app::model::{ActuatorLine, OrderId};

// ---------------------------------------------------------------------------
// Top-level agent error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A brew was requested while another order is still active.
    Busy(OrderId),
    /// Teardown after this order could not drive every actuator off.
    UnsafeTeardown(OrderId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy(id) => write!(f, "order {id} is still brewing"),
            Self::UnsafeTeardown(id) => write!(f, "actuators not confirmed off after order {id}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardwareError {
    /// Exporting or configuring a line failed during initialisation.
    Setup { line: u32, detail: String },
    /// Driving an actuator output failed.
    Write { role: ActuatorLine, detail: String },
    /// Reading the sensor input failed.
    Read { detail: String },
    /// The controller has already released its lines.
    Released,
}

impl fmt::Display for HardwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup { line, detail } => write!(f, "line {line} setup failed: {detail}"),
            Self::Write { role, detail } => write!(f, "{role} write failed: {detail}"),
            Self::Read { detail } => write!(f, "sensor read failed: {detail}"),
            Self::Released => write!(f, "GPIO already released"),
        }
    }
}

impl std::error::Error for HardwareError {}

// ---------------------------------------------------------------------------
// Remote API errors
// ---------------------------------------------------------------------------

/// Classification of a failed order-API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Connection, DNS, or TLS failure.
    Transport(String),
    /// The server did not answer within the request timeout.
    Timeout,
    /// Non-2xx HTTP status.
    Status(u16),
    /// Body was not the expected JSON shape.
    Malformed(String),
    /// Well-formed reply with `success: false`.
    Rejected,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
            Self::Rejected => write!(f, "server reported success=false"),
        }
    }
}

impl std::error::Error for RemoteError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The config file is not valid JSON for [`AgentConfig`](crate::config::AgentConfig).
    Corrupted(String),
    /// A field failed validation.  The `&'static str` names the field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
