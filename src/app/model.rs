//! Domain types shared by the sequencer, scheduler, and adapters.

use core::fmt;

use serde::{Deserialize, Serialize};

// ───────────────────────────────────────────────────────────────
// Orders
// ───────────────────────────────────────────────────────────────

/// Server-issued order identifier.
///
/// The API sends either a string or a number; adapters normalise both to
/// the string form before an `Order` reaches the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One drink to prepare.  Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub drink_name: String,
    pub toppings: Vec<String>,
    pub size: Option<String>,
    pub queue_position: Option<u32>,
}

impl Order {
    pub fn new(id: impl Into<OrderId>, drink_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            drink_name: drink_name.into(),
            toppings: Vec::new(),
            size: None,
            queue_position: None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Status reporting
// ───────────────────────────────────────────────────────────────

/// Order status as the server's queue understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrewStatus {
    Preparing,
    Brewing,
    Completed,
}

/// Position in the brew script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrewStep {
    PreparingCup,
    AddingToppings,
    AddingIce,
    BrewingDrink,
    Completed,
}

impl BrewStep {
    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreparingCup => "preparing_cup",
            Self::AddingToppings => "adding_toppings",
            Self::AddingIce => "adding_ice",
            Self::BrewingDrink => "brewing_drink",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for BrewStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress record posted to the server at every brew transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_id: OrderId,
    pub status: BrewStatus,
    pub step: BrewStep,
    pub message: String,
    pub hardware_id: String,
    pub error: bool,
}

// ───────────────────────────────────────────────────────────────
// Hardware roles
// ───────────────────────────────────────────────────────────────

/// Logical output line.  The sensor input is not an actuator and has no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorLine {
    Indicator,
    Pump,
    Valve,
}

impl ActuatorLine {
    pub const ALL: [Self; 3] = [Self::Indicator, Self::Pump, Self::Valve];
}

impl fmt::Display for ActuatorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indicator => f.write_str("indicator"),
            Self::Pump => f.write_str("pump"),
            Self::Valve => f.write_str("valve"),
        }
    }
}
