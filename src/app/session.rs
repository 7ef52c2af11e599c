//! Run state of the agent: which order, if any, is on the machine.
//!
//! `is_brewing` is derived from the active order id rather than stored
//! separately, so "brewing implies an order id" and its converse hold by
//! construction.  An order becomes active only through
//! [`HardwareSession::begin`], which hands back an [`ActiveOrder`] guard;
//! dropping the guard clears the session on every exit path, including
//! unwinding.

use crate::error::Error;

use super::model::OrderId;

#[derive(Debug, Default)]
pub struct HardwareSession {
    current_order_id: Option<OrderId>,
}

impl HardwareSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_brewing(&self) -> bool {
        self.current_order_id.is_some()
    }

    pub fn current_order_id(&self) -> Option<&OrderId> {
        self.current_order_id.as_ref()
    }

    /// Mark `order_id` as the single active order.
    ///
    /// Fails with [`Error::Busy`] if another order is already active.
    pub fn begin(&mut self, order_id: OrderId) -> Result<ActiveOrder<'_>, Error> {
        if let Some(active) = &self.current_order_id {
            return Err(Error::Busy(active.clone()));
        }
        self.current_order_id = Some(order_id.clone());
        Ok(ActiveOrder {
            session: self,
            order_id,
        })
    }
}

/// Exclusive hold on the session for one brew cycle.
pub struct ActiveOrder<'a> {
    session: &'a mut HardwareSession,
    order_id: OrderId,
}

impl ActiveOrder<'_> {
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Read-only view of the session while the guard is held.
    pub fn session(&self) -> &HardwareSession {
        self.session
    }

    /// Clear the session now instead of at end of scope.
    pub fn release(self) {}
}

impl Drop for ActiveOrder<'_> {
    fn drop(&mut self) {
        self.session.current_order_id = None;
    }
}
