//! Order API client over blocking HTTP.
//!
//! One `ureq` agent shared by every call, with a hard per-request timeout.
//! Each call is a single attempt.  Failures are classified into
//! [`RemoteError`], logged, and flattened to "no order" or "not
//! acknowledged" at the [`RemotePort`] boundary.

use std::io;
use std::time::Duration;

use log::{info, warn};

use crate::app::model::{Order, StatusUpdate};
use crate::app::ports::RemotePort;
use crate::error::RemoteError;

use super::wire;

/// Hard limit on each request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const API_KEY_HEADER: &str = "X-API-Key";

pub struct HttpRemote {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_timeout(base_url, api_key, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &self.url(path))
            .set(API_KEY_HEADER, &self.api_key)
            .set("Content-Type", "application/json")
    }

    /// `GET /hardware/orders?hardwareId=…`
    pub fn try_fetch_order(&self, hardware_id: &str) -> Result<Option<Order>, RemoteError> {
        let response = self
            .request("GET", "/hardware/orders")
            .query("hardwareId", hardware_id)
            .call()
            .map_err(classify)?;
        wire::parse_order_response(&read_body(response)?)
    }

    /// `POST /hardware/status`
    pub fn try_post_status(&self, update: &StatusUpdate) -> Result<(), RemoteError> {
        let body = serde_json::to_string(update).map_err(|e| RemoteError::Malformed(e.to_string()))?;
        let response = self
            .request("POST", "/hardware/status")
            .send_string(&body)
            .map_err(classify)?;
        wire::parse_ack(&read_body(response)?)
    }

    /// `GET /hardware/status?hardwareId=…`
    pub fn try_heartbeat(&self, hardware_id: &str) -> Result<(), RemoteError> {
        let response = self
            .request("GET", "/hardware/status")
            .query("hardwareId", hardware_id)
            .call()
            .map_err(classify)?;
        wire::parse_ack(&read_body(response)?)
    }
}

impl RemotePort for HttpRemote {
    fn fetch_order(&mut self, hardware_id: &str) -> Option<Order> {
        match self.try_fetch_order(hardware_id) {
            Ok(Some(order)) => {
                info!("New order received: {}", order.id);
                info!("Drink: {}", order.drink_name);
                if !order.toppings.is_empty() {
                    info!("Toppings: {}", order.toppings.join(", "));
                }
                if let Some(size) = &order.size {
                    info!("Size: {}", size);
                }
                if let Some(pos) = order.queue_position {
                    info!("Queue position: {}", pos);
                }
                Some(order)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to poll orders: {}", e);
                None
            }
        }
    }

    fn post_status(&mut self, update: &StatusUpdate) -> bool {
        match self.try_post_status(update) {
            Ok(()) => true,
            Err(e) => {
                warn!("Status post for order {} failed: {}", update.order_id, e);
                false
            }
        }
    }

    fn heartbeat(&mut self, hardware_id: &str) -> bool {
        match self.try_heartbeat(hardware_id) {
            Ok(()) => true,
            Err(e) => {
                warn!("Heartbeat failed: {}", e);
                false
            }
        }
    }
}

fn read_body(response: ureq::Response) -> Result<String, RemoteError> {
    response.into_string().map_err(|e| match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => RemoteError::Timeout,
        _ => RemoteError::Transport(e.to_string()),
    })
}

fn classify(err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(code, _) => RemoteError::Status(code),
        ureq::Error::Transport(transport) => {
            let timed_out = std::error::Error::source(&transport)
                .and_then(|src| src.downcast_ref::<io::Error>())
                .is_some_and(|io_err| {
                    matches!(io_err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
                });
            if timed_out {
                RemoteError::Timeout
            } else {
                RemoteError::Transport(transport.to_string())
            }
        }
    }
}
